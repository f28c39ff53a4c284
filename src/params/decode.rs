//! Builds the raw parameter bag from bracket-notation query strings.
//!
//! `select[]=a&select[]=b&where[page_views.gt]=1&limit=10` becomes
//! `{"select": ["a", "b"], "where": {"page_views.gt": "1"}, "limit": "10"}`.

use serde_json::{Map, Value};

enum Path<'a> {
    Scalar(&'a str),
    Sequence(&'a str),
    Nested(&'a str, &'a str),
    NestedSequence(&'a str, &'a str),
}

fn parse_path(key: &str) -> Path<'_> {
    if let Some(name) = key.strip_suffix("[]") {
        return match nested(name) {
            Some((name, sub)) => Path::NestedSequence(name, sub),
            None => Path::Sequence(name),
        };
    }
    match nested(key) {
        Some((name, sub)) => Path::Nested(name, sub),
        None => Path::Scalar(key),
    }
}

/// Splits `name[sub]` with a non-empty `name`; `sub` may not contain brackets.
fn nested(key: &str) -> Option<(&str, &str)> {
    let inner = key.strip_suffix(']')?;
    let (name, sub) = inner.split_once('[')?;
    if name.is_empty() || sub.contains(['[', ']']) {
        return None;
    }
    Some((name, sub))
}

fn push(slot: &mut Value, value: String) {
    match slot {
        Value::Array(items) => items.push(Value::String(value)),
        other => *other = Value::Array(vec![Value::String(value)]),
    }
}

/// Runs `f` on the mapping stored under `name`, replacing any other shape.
fn with_mapping(
    params: &mut Map<String, Value>,
    name: &str,
    f: impl FnOnce(&mut Map<String, Value>),
) {
    let slot = params.entry(name.to_owned()).or_insert(Value::Null);
    let mut map = match slot.take() {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    f(&mut map);
    *slot = Value::Object(map);
}

/// Folds already percent-decoded `(key, value)` pairs into a parameter bag.
/// Later pairs win on conflicting shapes.
pub fn decode_pairs<I, K, V>(pairs: I) -> Map<String, Value>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut params = Map::new();
    for (key, value) in pairs {
        let value = value.into();
        match parse_path(key.as_ref()) {
            Path::Scalar(name) => {
                params.insert(name.to_owned(), Value::String(value));
            }
            Path::Sequence(name) => {
                push(params.entry(name.to_owned()).or_insert(Value::Null), value);
            }
            Path::Nested(name, sub) => with_mapping(&mut params, name, |nested| {
                nested.insert(sub.to_owned(), Value::String(value));
            }),
            Path::NestedSequence(name, sub) => with_mapping(&mut params, name, |nested| {
                push(nested.entry(sub.to_owned()).or_insert(Value::Null), value);
            }),
        }
    }
    params
}
