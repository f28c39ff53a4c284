use super::tokens;
use crate::schema::Field;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

pub const DIRECTION_SEPARATOR: char = '.';

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    /// `desc`, `d` and `1` (any case) sort descending; everything else,
    /// including a missing direction, sorts ascending.
    pub fn parse(token: &str) -> Self {
        let token = token.to_ascii_lowercase();
        match token.as_str() {
            "desc" | "d" | "1" => Self::Desc,
            _ => Self::Asc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub field: String,
    pub direction: Direction,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.direction.as_sql())
    }
}

/// Parses `field` / `field.direction` tokens, dropping those whose field is
/// neither a measure nor a dimension. Caller order and duplicates are kept.
pub fn parse_orders(
    raw: Option<&Value>,
    measures: &[Field],
    dimensions: &[Field],
) -> Vec<SortOrder> {
    tokens::flatten(raw)
        .iter()
        .filter_map(|token| parse_order(token, measures, dimensions))
        .collect()
}

fn parse_order(token: &str, measures: &[Field], dimensions: &[Field]) -> Option<SortOrder> {
    let (name, direction) = token
        .split_once(DIRECTION_SEPARATOR)
        .unwrap_or((token, ""));
    let field = measures.iter().chain(dimensions).find(|f| f.name == name)?;
    Some(SortOrder {
        field: field.name.clone(),
        direction: Direction::parse(direction),
    })
}
