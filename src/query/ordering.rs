//! Query ordering detection
//!
//! Decides whether an ordering operator has already been applied anywhere in
//! a composed query, without executing it. Paging relies on this to decide
//! whether a default sort must be injected before `skip`/`take`.
//!
//! The whole tree is searched, sub-queries nested in filter predicates
//! included. An ordering that only appears inside such a sub-query therefore
//! also counts.

use super::builder::Query;
use super::errors::{QueryError, QueryResult};
use super::expr::QueryExpr;

/// Returns whether `query` contains any ordering operator.
///
/// # Errors
///
/// Returns `QueryError::InvalidArgument` when `query` is absent.
pub fn is_ordered<T>(query: Option<&Query<T>>) -> QueryResult<bool> {
    let query = query.ok_or(QueryError::InvalidArgument("query must not be absent"))?;
    Ok(contains_ordering(query.expr()))
}

/// Expression-level form of [`is_ordered`]
pub fn contains_ordering(expr: &QueryExpr) -> bool {
    expr.any_node(|node| node.kind().is_ordering())
}

impl<T> Query<T> {
    /// Returns whether an ordering operator exists anywhere in this query
    pub fn is_ordered(&self) -> bool {
        contains_ordering(self.expr())
    }
}
