use super::tokens;
use serde_json::{Map, Value};

pub const DEFAULT_LIMIT: u64 = 100;

/// Reads `key` as an integer, accepting JSON numbers and numeric strings.
fn integer(params: &Map<String, Value>, key: &str) -> Option<i64> {
    let raw = tokens::scalar(params.get(key)?)?;
    raw.trim().parse().ok()
}

fn positive(params: &Map<String, Value>, key: &str) -> Option<u64> {
    integer(params, key)
        .filter(|n| *n > 0)
        .and_then(|n| u64::try_from(n).ok())
}

fn non_negative(params: &Map<String, Value>, key: &str) -> Option<u64> {
    integer(params, key).and_then(|n| u64::try_from(n).ok())
}

/// `limit`, then `per_page`, then [`DEFAULT_LIMIT`].
pub fn resolve_limit(params: &Map<String, Value>) -> u64 {
    positive(params, "limit")
        .or_else(|| positive(params, "per_page"))
        .unwrap_or(DEFAULT_LIMIT)
}

/// An explicit `offset` always wins. Otherwise a `page` is turned into an
/// offset using `per_page`, falling back to the `limit` chain for the page
/// size.
pub fn resolve_offset(params: &Map<String, Value>) -> u64 {
    if let Some(offset) = non_negative(params, "offset") {
        return offset;
    }
    let Some(page) = positive(params, "page") else {
        return 0;
    };
    let page_size = positive(params, "per_page")
        .or_else(|| positive(params, "limit"))
        .unwrap_or(DEFAULT_LIMIT);
    (page - 1).saturating_mul(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn limit_precedence() {
        assert_eq!(resolve_limit(&params(json!({}))), 100);
        assert_eq!(resolve_limit(&params(json!({"limit": "30"}))), 30);
        assert_eq!(resolve_limit(&params(json!({"per_page": "30"}))), 30);
        assert_eq!(resolve_limit(&params(json!({"limit": 20, "per_page": "30"}))), 20);
    }

    #[test]
    fn invalid_limits_fall_through() {
        assert_eq!(resolve_limit(&params(json!({"limit": "abc", "per_page": "30"}))), 30);
        assert_eq!(resolve_limit(&params(json!({"limit": "0"}))), 100);
        assert_eq!(resolve_limit(&params(json!({"limit": -5}))), 100);
        assert_eq!(resolve_limit(&params(json!({"limit": "2.5"}))), 100);
        assert_eq!(resolve_limit(&params(json!({"limit": [10]}))), 100);
        assert_eq!(resolve_limit(&params(json!({"limit": " 15 "}))), 15);
    }

    #[test]
    fn offset_precedence() {
        assert_eq!(resolve_offset(&params(json!({}))), 0);
        assert_eq!(resolve_offset(&params(json!({"offset": "200"}))), 200);
        assert_eq!(resolve_offset(&params(json!({"page": "2", "per_page": 30}))), 30);
        assert_eq!(
            resolve_offset(&params(json!({"offset": "200", "page": 3, "per_page": "30"}))),
            200
        );
    }

    #[test]
    fn page_without_per_page_uses_limit_chain() {
        assert_eq!(resolve_offset(&params(json!({"page": 3}))), 200);
        assert_eq!(resolve_offset(&params(json!({"page": 3, "limit": "10"}))), 20);
    }

    #[test]
    fn invalid_offsets_fall_through() {
        assert_eq!(resolve_offset(&params(json!({"offset": "x", "page": 2, "per_page": 5}))), 5);
        assert_eq!(resolve_offset(&params(json!({"offset": -1}))), 0);
        assert_eq!(resolve_offset(&params(json!({"page": 0, "per_page": 5}))), 0);
        assert_eq!(resolve_offset(&params(json!({"page": "first"}))), 0);
    }

    #[test]
    fn huge_pages_saturate() {
        let huge = params(json!({"page": i64::MAX, "per_page": i64::MAX}));
        assert_eq!(resolve_offset(&huge), u64::MAX);
    }
}
