//! Flattening of selection-style parameters.
//!
//! `select`, `by` and `order` all accept a single token, a pipe-delimited
//! string, or a sequence whose elements may themselves be pipe-delimited.

use serde_json::Value;

pub const TOKEN_SEPARATOR: char = '|';

/// Flattens `raw` into its non-empty tokens, in caller order.
pub fn flatten(raw: Option<&Value>) -> Vec<String> {
    let mut tokens = Vec::new();
    if let Some(raw) = raw {
        collect(raw, &mut tokens, true);
    }
    tokens
}

fn collect(raw: &Value, tokens: &mut Vec<String>, top_level: bool) {
    match raw {
        Value::String(s) => split_into(s, tokens),
        Value::Number(n) => split_into(&n.to_string(), tokens),
        // nested sequences are not part of the accepted shapes
        Value::Array(items) if top_level => {
            for item in items {
                collect(item, tokens, false);
            }
        }
        _ => {}
    }
}

fn split_into(s: &str, tokens: &mut Vec<String>) {
    tokens.extend(
        s.split(TOKEN_SEPARATOR)
            .filter(|token| !token.is_empty())
            .map(str::to_owned),
    );
}

/// Reads a scalar parameter as text; sequences, mappings, booleans and nulls
/// have no scalar form.
pub fn scalar(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn splits_pipe_delimited_strings() {
        assert_eq!(flatten(Some(&json!("a|b||c"))), vec!["a", "b", "c"]);
    }

    #[test]
    fn flattens_sequences_of_delimited_strings() {
        assert_eq!(flatten(Some(&json!(["a|b", "c"]))), vec!["a", "b", "c"]);
    }

    #[test]
    fn ignores_unsupported_shapes() {
        assert!(flatten(None).is_empty());
        assert!(flatten(Some(&json!({"a": "b"}))).is_empty());
        assert!(flatten(Some(&json!(true))).is_empty());
        assert!(flatten(Some(&json!([["a"]]))).is_empty());
    }

    #[test]
    fn numbers_read_as_text() {
        assert_eq!(flatten(Some(&json!([1, "x"]))), vec!["1", "x"]);
        assert_eq!(scalar(&json!(20)).as_deref(), Some("20"));
        assert_eq!(scalar(&json!(null)), None);
    }
}
