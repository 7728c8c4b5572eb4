//! # Query Module
//!
//! Composable, deferred queries and their inspection:
//! - `QueryExpr`: immutable operator tree
//! - `Query<T>`: typed builder handle
//! - `is_ordered`: ordering detection used by paging
//! - `QueryEngine`: evaluation over JSON documents

pub mod builder;
pub mod engine;
pub mod errors;
pub mod expr;
pub mod ordering;
pub mod predicate;

pub use builder::Query;
pub use engine::{DocumentSource, QueryEngine};
pub use errors::{QueryError, QueryResult};
pub use expr::{OperatorKind, OrderOp, QueryExpr};
pub use ordering::{contains_ordering, is_ordered};
pub use predicate::{compare_values, CompareOp, Predicate};
