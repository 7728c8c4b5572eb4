//! # Typed Query Handle
//!
//! `Query<T>` wraps a shared, immutable expression tree. Every builder method
//! returns a new handle; the receiver and its tree are never modified.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;

use super::expr::{OrderOp, QueryExpr};
use super::predicate::Predicate;

/// A composed, not yet executed query over records of type `T`
pub struct Query<T> {
    expr: Arc<QueryExpr>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            expr: Arc::clone(&self.expr),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Query").field(&self.expr.explain()).finish()
    }
}

impl<T> PartialEq for Query<T> {
    fn eq(&self, other: &Self) -> bool {
        self.expr == other.expr
    }
}

impl<T> Query<T> {
    /// A raw query over a whole collection
    pub fn from_collection(collection: impl Into<String>) -> Self {
        Self::from_expr(Arc::new(QueryExpr::source(collection)))
    }

    pub fn from_expr(expr: Arc<QueryExpr>) -> Self {
        Self {
            expr,
            _marker: PhantomData,
        }
    }

    pub fn expr(&self) -> &Arc<QueryExpr> {
        &self.expr
    }

    fn wrap<U>(&self, node: QueryExpr) -> Query<U> {
        Query::from_expr(Arc::new(node))
    }

    pub fn filter(&self, predicate: Predicate) -> Query<T> {
        self.wrap(QueryExpr::Filter {
            input: Arc::clone(&self.expr),
            predicate,
        })
    }

    /// Projects onto `fields`; the result is no longer a `T`
    pub fn select<I, S>(&self, fields: I) -> Query<Value>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.wrap(QueryExpr::Select {
            input: Arc::clone(&self.expr),
            fields: fields.into_iter().map(Into::into).collect(),
        })
    }

    fn order(&self, op: OrderOp, key: impl Into<String>) -> Query<T> {
        self.wrap(QueryExpr::Order {
            input: Arc::clone(&self.expr),
            op,
            key: key.into(),
        })
    }

    pub fn order_by(&self, key: impl Into<String>) -> Query<T> {
        self.order(OrderOp::OrderByAscending, key)
    }

    pub fn order_by_descending(&self, key: impl Into<String>) -> Query<T> {
        self.order(OrderOp::OrderByDescending, key)
    }

    pub fn then_by(&self, key: impl Into<String>) -> Query<T> {
        self.order(OrderOp::ThenByAscending, key)
    }

    pub fn then_by_descending(&self, key: impl Into<String>) -> Query<T> {
        self.order(OrderOp::ThenByDescending, key)
    }

    pub fn skip(&self, count: usize) -> Query<T> {
        self.wrap(QueryExpr::Skip {
            input: Arc::clone(&self.expr),
            count,
        })
    }

    pub fn take(&self, count: usize) -> Query<T> {
        self.wrap(QueryExpr::Take {
            input: Arc::clone(&self.expr),
            count,
        })
    }

    pub fn collection(&self) -> &str {
        self.expr.collection()
    }

    pub fn explain(&self) -> String {
        self.expr.explain()
    }
}
