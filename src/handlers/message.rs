//! Extraction of user-facing failure text from error replies.

use serde_json::Value;

/// Fields consulted for a failure message, highest precedence first.
const MESSAGE_FIELDS: [&str; 2] = ["detail", "error"];

/// Pick the message shown for an error reply: `detail`, then `error`, then `fallback`.
///
/// Empty strings, `null`, `false`, and zero are skipped the same way a browser's `||` chain
/// skips them. Structured values (for example a list of validation errors) are shown as compact
/// JSON.
pub fn failure_message(body: &Value, fallback: &str) -> String {
    MESSAGE_FIELDS
        .iter()
        .find_map(|field| body.get(field).and_then(truthy_text))
        .unwrap_or_else(|| fallback.to_string())
}

fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detail_wins_over_error() {
        let body = json!({ "detail": "Invalid file type", "error": "bad request" });
        assert_eq!(failure_message(&body, "Upload failed"), "Invalid file type");
    }

    #[test]
    fn error_is_used_without_detail() {
        let body = json!({ "error": "quota exceeded" });
        assert_eq!(failure_message(&body, "Upload failed"), "quota exceeded");
    }

    #[test]
    fn falsy_values_fall_through() {
        let body = json!({ "detail": "", "error": null });
        assert_eq!(failure_message(&body, "Query failed"), "Query failed");

        let body = json!({ "detail": false, "error": 0 });
        assert_eq!(failure_message(&body, "Query failed"), "Query failed");

        assert_eq!(failure_message(&json!([]), "Upload failed"), "Upload failed");
    }

    #[test]
    fn structured_detail_is_shown_as_json() {
        let body = json!({ "detail": [{ "loc": ["body", "query"], "msg": "field required" }] });
        assert_eq!(
            failure_message(&body, "Query failed"),
            r#"[{"loc":["body","query"],"msg":"field required"}]"#
        );
    }
}
