//! Display elements driven by the submission handlers.
//!
//! Handlers never print directly. They update a status element, a response container, a
//! submit control, and an optional loading indicator through [`UploadView`] and [`QueryView`].
//! The in-memory panels here keep that state for inspection; the terminal view in
//! [`crate::console`] draws it.

use std::fmt;

/// Class token carried by the upload status element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusClass {
    /// Request in flight.
    Loading,
    /// Server accepted the upload.
    Success,
    /// Validation, server, or transport failure.
    Error,
}

impl StatusClass {
    /// CSS-style class name of this state.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome tone of the response container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    /// Rendered answer.
    Success,
    /// Validation, server, or transport failure.
    Error,
}

/// Class tokens of the response container, e.g. `"success fade-in"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContainerClass {
    /// Success or error styling.
    pub tone: Tone,
    /// Whether the content animates in (set for every server-driven outcome).
    pub fade_in: bool,
}

impl ContainerClass {
    /// Inline validation error shown without animation.
    pub const INLINE_ERROR: Self = Self {
        tone: Tone::Error,
        fade_in: false,
    };
    /// Answer rendered from a successful response.
    pub const SUCCESS: Self = Self {
        tone: Tone::Success,
        fade_in: true,
    };
    /// Failure reported after a request was attempted.
    pub const ERROR: Self = Self {
        tone: Tone::Error,
        fade_in: true,
    };

    /// Space separated class list.
    pub fn class_name(self) -> String {
        let tone = match self.tone {
            Tone::Success => "success",
            Tone::Error => "error",
        };
        if self.fade_in {
            format!("{tone} fade-in")
        } else {
            tone.to_string()
        }
    }
}

/// Payload placed in the response container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Content {
    /// Literal text, never interpreted.
    Text(String),
    /// Output of the configured renderer.
    Rendered(String),
}

impl Content {
    /// Displayable text regardless of origin.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) | Self::Rendered(text) => text,
        }
    }
}

/// Elements touched by the upload handler.
pub trait UploadView {
    /// Replace the status element's class and text.
    fn set_status(&mut self, class: StatusClass, text: &str);

    /// Enable or disable the upload submit control.
    fn set_submit_enabled(&mut self, enabled: bool);
}

/// Elements touched by the query handler.
pub trait QueryView {
    /// Replace the response container's content and class.
    fn set_content(&mut self, content: Content, class: ContainerClass);

    /// Show or hide the response container.
    fn set_response_visible(&mut self, visible: bool);

    /// Show or hide the loading indicator. Views without one ignore this.
    fn set_loading_visible(&mut self, _visible: bool) {}

    /// Enable or disable the query submit control.
    fn set_submit_enabled(&mut self, enabled: bool);
}

/// In-memory upload form: status element plus submit control.
#[derive(Debug, Clone)]
pub struct UploadPanel {
    /// Current status text.
    pub status_text: String,
    /// Current status class, if any has been set.
    pub status_class: Option<StatusClass>,
    /// Whether the submit control accepts clicks.
    pub submit_enabled: bool,
    /// Every status change in order.
    pub status_history: Vec<(StatusClass, String)>,
    /// Every enable/disable of the submit control in order.
    pub submit_history: Vec<bool>,
}

impl Default for UploadPanel {
    fn default() -> Self {
        Self {
            status_text: String::new(),
            status_class: None,
            submit_enabled: true,
            status_history: Vec::new(),
            submit_history: Vec::new(),
        }
    }
}

impl UploadView for UploadPanel {
    fn set_status(&mut self, class: StatusClass, text: &str) {
        self.status_text = text.to_string();
        self.status_class = Some(class);
        self.status_history.push((class, text.to_string()));
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
        self.submit_history.push(enabled);
    }
}

/// In-memory query form: response container, loading indicator, and submit control.
#[derive(Debug, Clone)]
pub struct QueryPanel {
    /// Current container content, if any has been set.
    pub content: Option<Content>,
    /// Current container class, if any has been set.
    pub class: Option<ContainerClass>,
    /// Whether the container is displayed.
    pub response_visible: bool,
    /// Whether the loading indicator is displayed.
    pub loading_visible: bool,
    /// Whether the submit control accepts clicks.
    pub submit_enabled: bool,
    /// Every enable/disable of the submit control in order.
    pub submit_history: Vec<bool>,
    /// Every show/hide of the loading indicator in order.
    pub loading_history: Vec<bool>,
}

impl Default for QueryPanel {
    fn default() -> Self {
        Self {
            content: None,
            class: None,
            response_visible: true,
            loading_visible: false,
            submit_enabled: true,
            submit_history: Vec::new(),
            loading_history: Vec::new(),
        }
    }
}

impl QueryPanel {
    /// Displayed text, or an empty string when nothing was set.
    pub fn text(&self) -> &str {
        self.content.as_ref().map(Content::as_str).unwrap_or_default()
    }

    /// Class list of the container, or an empty string when nothing was set.
    pub fn class_name(&self) -> String {
        self.class.map(ContainerClass::class_name).unwrap_or_default()
    }
}

impl QueryView for QueryPanel {
    fn set_content(&mut self, content: Content, class: ContainerClass) {
        self.content = Some(content);
        self.class = Some(class);
    }

    fn set_response_visible(&mut self, visible: bool) {
        self.response_visible = visible;
    }

    fn set_loading_visible(&mut self, visible: bool) {
        self.loading_visible = visible;
        self.loading_history.push(visible);
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
        self.submit_history.push(enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_class_names_match_page_tokens() {
        assert_eq!(ContainerClass::SUCCESS.class_name(), "success fade-in");
        assert_eq!(ContainerClass::ERROR.class_name(), "error fade-in");
        assert_eq!(ContainerClass::INLINE_ERROR.class_name(), "error");
        assert_eq!(StatusClass::Loading.to_string(), "loading");
    }

    #[test]
    fn panels_record_submit_transitions() {
        let mut panel = UploadPanel::default();
        panel.set_submit_enabled(false);
        panel.set_submit_enabled(true);
        assert_eq!(panel.submit_history, vec![false, true]);
        assert!(panel.submit_enabled);

        let mut panel = QueryPanel::default();
        assert_eq!(panel.text(), "");
        panel.set_content(Content::Text("hi".into()), ContainerClass::ERROR);
        assert_eq!(panel.text(), "hi");
        assert_eq!(panel.class_name(), "error fade-in");
    }
}
