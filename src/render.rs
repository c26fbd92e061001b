//! Rendering of query answers for display.
//!
//! Answers arrive as Markdown. The default mode lays Markdown out as plain terminal text;
//! `preformatted` shows the answer literally (turning escaped `\n` sequences into line breaks),
//! and `html` produces the same markup a browser would inject into the page.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::fmt;
use std::str::FromStr;

const RULE_WIDTH: usize = 40;

/// Presentation used for successful query responses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Markdown laid out as terminal text.
    #[default]
    Markdown,
    /// Literal text with escaped newlines expanded.
    Preformatted,
    /// Markdown converted to an HTML fragment.
    Html,
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "preformatted" | "pre" | "plain" => Ok(Self::Preformatted),
            "html" => Ok(Self::Html),
            other => Err(format!(
                "unknown render mode '{other}' (expected markdown, preformatted or html)"
            )),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Markdown => "markdown",
            Self::Preformatted => "preformatted",
            Self::Html => "html",
        };
        f.write_str(label)
    }
}

/// Turns raw answer text into displayable output.
#[derive(Clone, Copy, Debug, Default)]
pub struct Renderer {
    mode: RenderMode,
}

impl Renderer {
    /// Build a renderer for the given mode.
    pub const fn new(mode: RenderMode) -> Self {
        Self { mode }
    }

    /// Mode this renderer was built with.
    pub const fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Render answer text according to the configured mode.
    pub fn render(&self, text: &str) -> String {
        match self.mode {
            RenderMode::Markdown => markdown_to_terminal(text),
            RenderMode::Preformatted => unescape_newlines(text),
            RenderMode::Html => markdown_to_html(text),
        }
    }
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Convert Markdown into an HTML fragment.
pub fn markdown_to_html(text: &str) -> String {
    let mut html = String::with_capacity(text.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut html, Parser::new_ext(text, parser_options()));
    html
}

/// Expand literal `\n` escape sequences into real line breaks.
pub fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

/// Lay Markdown out as plain text suitable for a terminal.
pub fn markdown_to_terminal(text: &str) -> String {
    let mut writer = TerminalWriter::default();
    for event in Parser::new_ext(text, parser_options()) {
        writer.handle(event);
    }
    writer.finish()
}

/// Accumulates terminal text while tracking block nesting.
///
/// `prefixes` are written at the start of every line: block quote markers, list continuation
/// indentation, and code block indentation.
struct TerminalWriter {
    out: String,
    at_line_start: bool,
    prefixes: Vec<String>,
    lists: Vec<Option<u64>>,
    item_fresh: bool,
    heading_width: Option<usize>,
    links: Vec<(usize, String)>,
    table_cell: usize,
    table_line_start: usize,
}

impl Default for TerminalWriter {
    fn default() -> Self {
        Self {
            out: String::new(),
            at_line_start: true,
            prefixes: Vec::new(),
            lists: Vec::new(),
            item_fresh: false,
            heading_width: None,
            links: Vec::new(),
            table_cell: 0,
            table_line_start: 0,
        }
    }
}

impl TerminalWriter {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.write(&text),
            Event::Code(code) => {
                self.write("`");
                self.write(&code);
                self.write("`");
            }
            Event::Html(html) | Event::InlineHtml(html) => self.write(&html),
            Event::SoftBreak => self.write(" "),
            Event::HardBreak => self.write("\n"),
            Event::Rule => {
                self.blank_line();
                self.write(&"─".repeat(RULE_WIDTH));
                self.blank_line();
            }
            Event::TaskListMarker(checked) => self.write(if checked { "[x] " } else { "[ ] " }),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if !self.item_fresh {
                    self.newline();
                }
            }
            Tag::Heading { .. } => {
                self.blank_line();
                self.heading_width = Some(0);
            }
            Tag::BlockQuote { .. } => {
                self.newline();
                self.prefixes.push("> ".into());
            }
            Tag::CodeBlock(_) => {
                self.blank_line();
                self.prefixes.push("    ".into());
            }
            Tag::List(start) => {
                self.newline();
                self.lists.push(start);
            }
            Tag::Item => {
                self.newline();
                let marker = match self.lists.last_mut() {
                    Some(Some(number)) => {
                        let marker = format!("{number}. ");
                        *number += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.write(&marker);
                self.item_fresh = true;
                self.prefixes.push(" ".repeat(marker.chars().count()));
            }
            Tag::Table(_) => self.blank_line(),
            Tag::TableHead | Tag::TableRow => {
                self.newline();
                self.table_cell = 0;
                self.table_line_start = self.out.len();
            }
            Tag::TableCell => {
                if self.table_cell > 0 {
                    self.write(" | ");
                }
                self.table_cell += 1;
            }
            Tag::Link { dest_url, .. } => {
                self.links.push((self.out.len(), dest_url.to_string()));
            }
            Tag::Image { .. } => self.write("[image: "),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if self.lists.is_empty() {
                    self.blank_line();
                } else {
                    self.newline();
                }
            }
            TagEnd::Heading(level) => {
                let width = self.heading_width.take().unwrap_or(0).max(1);
                let underline = if level == HeadingLevel::H1 { "=" } else { "-" };
                self.newline();
                self.write(&underline.repeat(width));
                self.blank_line();
            }
            TagEnd::BlockQuote { .. } => {
                self.prefixes.pop();
                self.blank_line();
            }
            TagEnd::CodeBlock => {
                self.prefixes.pop();
                self.blank_line();
            }
            TagEnd::List(_) => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank_line();
                } else {
                    self.newline();
                }
            }
            TagEnd::Item => {
                self.prefixes.pop();
                self.item_fresh = false;
                self.newline();
            }
            TagEnd::TableHead => {
                let width = self.out[self.table_line_start..].chars().count();
                self.newline();
                self.write(&"-".repeat(width.max(1)));
                self.newline();
            }
            TagEnd::TableRow => self.newline(),
            TagEnd::Table => self.blank_line(),
            TagEnd::Link => {
                if let Some((start, url)) = self.links.pop() {
                    let label = &self.out[start..];
                    if !url.is_empty() && label != url {
                        self.write(&format!(" ({url})"));
                    }
                }
            }
            TagEnd::Image => self.write("]"),
            _ => {}
        }
    }

    fn write(&mut self, text: &str) {
        self.item_fresh = false;
        for ch in text.chars() {
            if ch == '\n' {
                self.out.push('\n');
                self.at_line_start = true;
                continue;
            }
            if self.at_line_start {
                for prefix in &self.prefixes {
                    self.out.push_str(prefix);
                }
                self.at_line_start = false;
            }
            self.out.push(ch);
            if let Some(width) = self.heading_width.as_mut() {
                *width += 1;
            }
        }
    }

    fn newline(&mut self) {
        if !self.at_line_start {
            self.out.push('\n');
            self.at_line_start = true;
        }
    }

    fn blank_line(&mut self) {
        self.newline();
        if !self.out.is_empty() && !self.out.ends_with("\n\n") {
            self.out.push('\n');
        }
    }

    fn finish(self) -> String {
        self.out.trim_end().to_string()
    }
}
