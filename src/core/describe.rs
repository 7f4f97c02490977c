//! Purpose: Short descriptions of dynamic values for error messages.
//! Exports: `type_name`, `describe`, `MAX_PREVIEW_CHARS`.
//! Invariants: Previews are compact JSON capped at `MAX_PREVIEW_CHARS` characters.

use serde_json::Value;

pub const MAX_PREVIEW_CHARS: usize = 64;

pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(num) if num.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// `string "42"`, `array [1,2,3]`, `object {"a":{"b":...`
pub fn describe(value: &Value) -> String {
    let rendered = value.to_string();
    format!("{} {}", type_name(value), truncate_chars(&rendered))
}

fn truncate_chars(text: &str) -> String {
    match text.char_indices().nth(MAX_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_PREVIEW_CHARS, describe, type_name};
    use serde_json::json;

    #[test]
    fn type_names_cover_every_variant() {
        assert_eq!(type_name(&json!(null)), "null");
        assert_eq!(type_name(&json!(true)), "bool");
        assert_eq!(type_name(&json!(3)), "integer");
        assert_eq!(type_name(&json!(-3)), "integer");
        assert_eq!(type_name(&json!(3.5)), "float");
        assert_eq!(type_name(&json!("x")), "string");
        assert_eq!(type_name(&json!([1])), "array");
        assert_eq!(type_name(&json!({"a": 1})), "object");
    }

    #[test]
    fn describe_renders_compact_json() {
        assert_eq!(describe(&json!("42")), "string \"42\"");
        assert_eq!(describe(&json!([1, 2, 3])), "array [1,2,3]");
    }

    #[test]
    fn describe_caps_long_values() {
        let long = "é".repeat(MAX_PREVIEW_CHARS * 2);
        let text = describe(&json!(long));
        assert!(text.ends_with("..."));
        assert!(text.chars().count() < MAX_PREVIEW_CHARS + 16);
    }
}
