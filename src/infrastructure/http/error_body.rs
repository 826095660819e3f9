//! User-facing message extraction from non-2xx response bodies.

use serde_json::{Map, Value};

pub const UNHANDLED_MESSAGE: &str = "Unhandled Exception: Contact the administrator";

/// Longest non-JSON body passed through as a message.
const MAX_PLAIN_MESSAGE_CHARS: usize = 200;

/// Pulls the most specific message out of an error body.
///
/// Checked in order: a `data`-wrapped body's `message`, a plain string
/// body, the first entry of an `errors` map, an `error` field, then a
/// `message` field. Short non-JSON text is passed through; markup and
/// anything else yields [`UNHANDLED_MESSAGE`].
pub fn extract_message(body: &str) -> String {
    let trimmed = body.trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => from_object(&map).unwrap_or_else(|| UNHANDLED_MESSAGE.to_string()),
        Ok(Value::String(s)) if !s.is_empty() => s,
        Ok(_) => UNHANDLED_MESSAGE.to_string(),
        Err(_) if trimmed.is_empty() || trimmed.starts_with('<') => UNHANDLED_MESSAGE.to_string(),
        Err(_) => plain_text(trimmed),
    }
}

fn plain_text(body: &str) -> String {
    if body.chars().count() <= MAX_PLAIN_MESSAGE_CHARS {
        return body.to_string();
    }
    let mut cut: String = body.chars().take(MAX_PLAIN_MESSAGE_CHARS).collect();
    cut.push_str("...");
    cut
}

fn from_object(map: &Map<String, Value>) -> Option<String> {
    if let Some(data) = map.get("data") {
        if let Some(message) = text(map.get("message")).or_else(|| text(data.get("message"))) {
            return Some(message);
        }
    }
    if let Some(errors) = map.get("errors") {
        if let Some(message) = first_error(errors) {
            return Some(message);
        }
    }
    if let Some(error) = map.get("error") {
        if let Some(message) = text(Some(error)).or_else(|| text(error.get("message"))) {
            return Some(message);
        }
    }
    text(map.get("message"))
}

fn first_error(errors: &Value) -> Option<String> {
    let first = match errors {
        Value::Object(map) => map.values().next()?,
        Value::Array(items) => items.first()?,
        other => other,
    };
    match first {
        Value::Array(messages) => text(messages.first()),
        Value::Object(_) => text(first.get("message")),
        other => text(Some(other)),
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_wrapped_message() {
        let body = r#"{"data": null, "message": "Recommendation already archived"}"#;
        assert_eq!(extract_message(body), "Recommendation already archived");
    }

    #[test]
    fn test_message_inside_data() {
        let body = r#"{"data": {"message": "Tenant suspended"}}"#;
        assert_eq!(extract_message(body), "Tenant suspended");
    }

    #[test]
    fn test_plain_string_body() {
        assert_eq!(extract_message(r#""Too many requests""#), "Too many requests");
        assert_eq!(extract_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_errors_map_first_entry() {
        let body = r#"{"errors": {"email": ["Email is invalid", "Email taken"], "password": ["Too short"]}}"#;
        assert_eq!(extract_message(body), "Email is invalid");
    }

    #[test]
    fn test_error_field() {
        assert_eq!(extract_message(r#"{"error": "Invalid credentials"}"#), "Invalid credentials");
    }

    #[test]
    fn test_message_field() {
        assert_eq!(extract_message(r#"{"message": "Unauthorized"}"#), "Unauthorized");
    }

    #[test]
    fn test_error_beats_message() {
        let body = r#"{"error": "Forbidden", "message": "ignored"}"#;
        assert_eq!(extract_message(body), "Forbidden");
    }

    #[test]
    fn test_unrecognized_shapes() {
        assert_eq!(extract_message(r#"{"code": 500}"#), UNHANDLED_MESSAGE);
        assert_eq!(extract_message(""), UNHANDLED_MESSAGE);
        assert_eq!(extract_message("[1,2]"), UNHANDLED_MESSAGE);
    }

    #[test]
    fn test_proxy_html_page_is_not_shown() {
        let body = "<html><head><title>502 Bad Gateway</title></head><body>nginx</body></html>";
        assert_eq!(extract_message(body), UNHANDLED_MESSAGE);
    }

    #[test]
    fn test_long_plain_text_is_truncated() {
        let body = "x".repeat(5000);
        let message = extract_message(&body);
        assert_eq!(message.chars().count(), MAX_PLAIN_MESSAGE_CHARS + 3);
        assert!(message.ends_with("..."));
    }
}
