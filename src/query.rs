use crate::params::{Operation, SortOrder};
use crate::schema::Field;
use serde::Serialize;
use serde_json::{Map, Value};

/// The parsed form of one request's parameters.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct QuerySpecification {
    pub measures: Vec<Field>,
    pub dimensions: Vec<Field>,
    pub operations: Vec<Operation>,
    pub orders: Vec<SortOrder>,
    pub limit: u64,
    pub offset: u64,
}

impl QuerySpecification {
    /// Keyed by `operations`, `dimensions`, `limit`, `measures`, `offset`
    /// and `orders`.
    pub fn to_map(&self) -> serde_json::Result<Map<String, Value>> {
        serde_json::from_value(serde_json::to_value(self)?)
    }
}
