//! Forgiving parsing of request parameters into a query specification.
//!
//! Recognised keys: `select`, `by`, `order`, `where`, `limit`, `per_page`,
//! `offset` and `page`. Invalid entries are dropped, never reported.

pub mod decode;
pub mod operation;
pub mod order;
pub mod pagination;
pub mod parser;
pub mod select;
pub mod tokens;

pub use decode::decode_pairs;
pub use operation::{Argument, Operation, Operator};
pub use order::{Direction, SortOrder};
pub use parser::ParamParser;
