//! Forgiving query-parameter parsing for analytical blocks.
//!
//! A block (cube) declares measures, dimensions and filter constraints in
//! `schema.toml`. [`params::ParamParser`] turns a request's loosely shaped
//! parameters into a [`query::QuerySpecification`]: unknown fields,
//! disallowed operators and wrong-typed values are dropped instead of
//! rejected.

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod params;
pub mod query;
pub mod schema;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CatalogError, ConfigError, SchemaError};
pub use params::ParamParser;
pub use query::QuerySpecification;
pub use schema::{Block, Blocks, Catalog, Constraint, DataType, Field, FieldKind};
