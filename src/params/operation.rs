//! Filter parsing for the `where` parameter.
//!
//! Each entry of the `where` mapping is keyed `field.operator` (or
//! `field__operator`) and carries a raw value. An entry becomes an
//! [`Operation`] only when the block declares a [`Constraint`] for that field
//! and operator and every argument coerces under the constraint's data type;
//! anything else is left out of the result.

use super::tokens;
use crate::schema::{Constraint, DataType};
use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Separates the bounds of a `between` value, e.g. `-30..-1`.
pub const RANGE_SEPARATOR: &str = "..";

/// Accepted between field and operator in filter keys, in lookup order.
const KEY_SEPARATORS: [&str; 2] = [".", "__"];

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
    Between,
    In,
    NotIn,
}

enum Arity {
    One,
    Two,
    Many,
}

impl Operator {
    pub const ALL: [Operator; 9] = [
        Self::Eq,
        Self::NotEq,
        Self::Gt,
        Self::Gte,
        Self::Lt,
        Self::Lte,
        Self::Between,
        Self::In,
        Self::NotIn,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::NotEq => "not_eq",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Between => "between",
            Self::In => "in",
            Self::NotIn => "not_in",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.code() == code)
    }

    fn arity(self) -> Arity {
        match self {
            Self::Between => Arity::Two,
            Self::In | Self::NotIn => Arity::Many,
            _ => Arity::One,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A coerced filter argument.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Argument {
    Integer(i64),
    Text(String),
    Date(NaiveDate),
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Operation {
    /// `field.operator`, whichever separator the caller used.
    pub key: String,
    pub field: String,
    pub operator: Operator,
    pub args: Vec<Argument>,
}

/// Parses every valid entry of a `where` mapping, in mapping order.
/// Relative dates resolve against `today`.
pub fn parse_operations(
    raw: Option<&Value>,
    constraints: &[Constraint],
    today: NaiveDate,
) -> Vec<Operation> {
    let Some(Value::Object(filters)) = raw else {
        return Vec::new();
    };
    filters
        .iter()
        .filter_map(|(key, value)| parse_operation(key, value, constraints, today))
        .collect()
}

fn parse_operation(
    key: &str,
    value: &Value,
    constraints: &[Constraint],
    today: NaiveDate,
) -> Option<Operation> {
    let (field, operator) = split_key(key)?;
    let constraint = constraints.iter().find(|c| c.allows(field, operator))?;
    let args = raw_parts(value, operator)?
        .iter()
        .map(|part| coerce(part, constraint.data_type, today))
        .collect::<Option<Vec<_>>>()?;

    Some(Operation {
        key: format!("{field}.{operator}"),
        field: field.to_owned(),
        operator,
        args,
    })
}

fn split_key(key: &str) -> Option<(&str, Operator)> {
    KEY_SEPARATORS.iter().find_map(|sep| {
        let (field, code) = key.rsplit_once(*sep)?;
        Some((field, Operator::from_code(code)?))
    })
}

fn raw_parts(value: &Value, operator: Operator) -> Option<Vec<String>> {
    match operator.arity() {
        Arity::One => Some(vec![tokens::scalar(value)?]),
        Arity::Two => {
            let raw = tokens::scalar(value)?;
            let parts: Vec<String> = raw.split(RANGE_SEPARATOR).map(str::to_owned).collect();
            (parts.len() == 2).then_some(parts)
        }
        Arity::Many => {
            let parts = tokens::flatten(Some(value));
            (!parts.is_empty()).then_some(parts)
        }
    }
}

fn coerce(raw: &str, data_type: DataType, today: NaiveDate) -> Option<Argument> {
    match data_type {
        DataType::Number => raw.trim().parse().ok().map(Argument::Integer),
        DataType::String | DataType::Enum => Some(Argument::Text(raw.to_owned())),
        DataType::Date => {
            let days: i64 = raw.trim().parse().ok()?;
            today
                .checked_add_signed(TimeDelta::try_days(days)?)
                .map(Argument::Date)
        }
    }
}
