//! Shared helpers for integration tests

use block_query::{Blocks, FixedClock, ParamParser, schema};
use chrono::NaiveDate;
use serde_json::{Map, Value};

pub fn load_fixture(name: &str) -> Blocks {
    let path = format!("tests/test_data/{}", name);
    schema::load_blocks(&path).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

/// Parser for the `stats` fixture block with a fixed clock.
pub fn build(params: Value) -> ParamParser {
    let params = match params {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    ParamParser::with_clock(&load_fixture("stats.toml"), "stats", params, &FixedClock(today()))
        .expect("stats block exists")
}
