//! # Query Expression Tree
//!
//! A deferred query is an immutable chain of operator nodes. Every operator
//! wraps its upstream expression; the chain bottoms out in a `Source` node.
//! Filter predicates may embed sub-queries, which are children of the filter
//! node and are visited by every traversal.

use std::fmt;
use std::sync::{Arc, OnceLock};

use super::predicate::Predicate;

/// Ordering operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderOp {
    OrderByAscending,
    OrderByDescending,
    ThenByAscending,
    ThenByDescending,
}

impl OrderOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderOp::OrderByAscending => "order_by",
            OrderOp::OrderByDescending => "order_by_descending",
            OrderOp::ThenByAscending => "then_by",
            OrderOp::ThenByDescending => "then_by_descending",
        }
    }

    /// True for `ThenBy*`, which refine the nearest upstream ordering
    pub fn is_secondary(&self) -> bool {
        matches!(self, OrderOp::ThenByAscending | OrderOp::ThenByDescending)
    }

    pub fn is_descending(&self) -> bool {
        matches!(self, OrderOp::OrderByDescending | OrderOp::ThenByDescending)
    }
}

/// Node tag, independent of the node's payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Source,
    Filter,
    Select,
    Order(OrderOp),
    Skip,
    Take,
}

impl OperatorKind {
    pub fn is_ordering(&self) -> bool {
        matches!(self, OperatorKind::Order(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorKind::Source => "source",
            OperatorKind::Filter => "filter",
            OperatorKind::Select => "select",
            OperatorKind::Order(op) => op.as_str(),
            OperatorKind::Skip => "skip",
            OperatorKind::Take => "take",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable query expression node
#[derive(Debug, Clone, PartialEq)]
pub enum QueryExpr {
    /// The raw, unfiltered collection
    Source { collection: String },
    Filter {
        input: Arc<QueryExpr>,
        predicate: Predicate,
    },
    /// Projection onto a list of fields
    Select {
        input: Arc<QueryExpr>,
        fields: Vec<String>,
    },
    Order {
        input: Arc<QueryExpr>,
        op: OrderOp,
        key: String,
    },
    Skip {
        input: Arc<QueryExpr>,
        count: usize,
    },
    Take {
        input: Arc<QueryExpr>,
        count: usize,
    },
}

impl QueryExpr {
    pub fn source(collection: impl Into<String>) -> Self {
        QueryExpr::Source {
            collection: collection.into(),
        }
    }

    pub fn kind(&self) -> OperatorKind {
        match self {
            QueryExpr::Source { .. } => OperatorKind::Source,
            QueryExpr::Filter { .. } => OperatorKind::Filter,
            QueryExpr::Select { .. } => OperatorKind::Select,
            QueryExpr::Order { op, .. } => OperatorKind::Order(*op),
            QueryExpr::Skip { .. } => OperatorKind::Skip,
            QueryExpr::Take { .. } => OperatorKind::Take,
        }
    }

    /// The upstream expression, `None` for a source
    pub fn input(&self) -> Option<&QueryExpr> {
        match self {
            QueryExpr::Source { .. } => None,
            QueryExpr::Filter { input, .. }
            | QueryExpr::Select { input, .. }
            | QueryExpr::Order { input, .. }
            | QueryExpr::Skip { input, .. }
            | QueryExpr::Take { input, .. } => Some(input),
        }
    }

    /// Direct children: the upstream input plus any predicate sub-queries
    pub fn children(&self) -> Vec<&QueryExpr> {
        let mut children = Vec::new();
        if let Some(input) = self.input() {
            children.push(input);
        }
        if let QueryExpr::Filter { predicate, .. } = self {
            children.extend(predicate.subqueries());
        }
        children
    }

    /// The collection at the bottom of the outer operator chain
    pub fn collection(&self) -> &str {
        let mut node = self;
        loop {
            match node {
                QueryExpr::Source { collection } => return collection,
                other => match other.input() {
                    Some(input) => node = input,
                    None => unreachable!("only sources lack an input"),
                },
            }
        }
    }

    /// Visits every node of the tree in pre-order.
    ///
    /// Uses an explicit stack, so arbitrarily deep chains are safe.
    pub fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(&QueryExpr),
    {
        let mut stack: Vec<&QueryExpr> = vec![self];
        while let Some(node) = stack.pop() {
            visit(node);
            let children = node.children();
            stack.extend(children.into_iter().rev());
        }
    }

    /// True if any node in the tree satisfies `pred`; stops at the first match
    pub fn any_node<F>(&self, mut pred: F) -> bool
    where
        F: FnMut(&QueryExpr) -> bool,
    {
        let mut stack: Vec<&QueryExpr> = vec![self];
        while let Some(node) = stack.pop() {
            if pred(node) {
                return true;
            }
            stack.extend(node.children());
        }
        false
    }

    /// Number of nodes in the tree, sub-queries included
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(|_| count += 1);
        count
    }

    /// Operator kinds of the outer chain, source first
    pub fn operator_chain(&self) -> Vec<OperatorKind> {
        let mut chain = Vec::new();
        let mut node = Some(self);
        while let Some(n) = node {
            chain.push(n.kind());
            node = n.input();
        }
        chain.reverse();
        chain
    }

    /// One-line description of the outer chain
    pub fn explain(&self) -> String {
        let mut parts = Vec::new();
        let mut node = Some(self);
        while let Some(n) = node {
            parts.push(match n {
                QueryExpr::Source { collection } => collection.clone(),
                QueryExpr::Filter { predicate, .. } => format!("filter({})", predicate.describe()),
                QueryExpr::Select { fields, .. } => format!("select({})", fields.join(",")),
                QueryExpr::Order { op, key, .. } => format!("{}({})", op.as_str(), key),
                QueryExpr::Skip { count, .. } => format!("skip({})", count),
                QueryExpr::Take { count, .. } => format!("take({})", count),
            });
            node = n.input();
        }
        parts.reverse();
        parts.join(" -> ")
    }
}

/// Shared leaf swapped in for inputs detached during drop
pub(crate) fn detached() -> Arc<QueryExpr> {
    static DETACHED: OnceLock<Arc<QueryExpr>> = OnceLock::new();
    DETACHED
        .get_or_init(|| Arc::new(QueryExpr::source(String::new())))
        .clone()
}

impl QueryExpr {
    /// Move this node's inputs and sub-queries into `out`, leaving leaves behind
    fn detach_children(&mut self, out: &mut Vec<Arc<QueryExpr>>) {
        match self {
            QueryExpr::Source { .. } => {}
            QueryExpr::Filter { input, predicate } => {
                out.push(std::mem::replace(input, detached()));
                predicate.detach_subqueries(out);
            }
            QueryExpr::Select { input, .. }
            | QueryExpr::Order { input, .. }
            | QueryExpr::Skip { input, .. }
            | QueryExpr::Take { input, .. } => {
                out.push(std::mem::replace(input, detached()));
            }
        }
    }
}

// Dropping a long chain through the default glue recurses once per node.
// Unlink uniquely owned children onto a heap stack instead.
impl Drop for QueryExpr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(child) = pending.pop() {
            if let Some(mut node) = Arc::into_inner(child) {
                node.detach_children(&mut pending);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chain() -> QueryExpr {
        let source = Arc::new(QueryExpr::source("items"));
        let filtered = Arc::new(QueryExpr::Filter {
            input: source,
            predicate: Predicate::gt("id", json!(4)),
        });
        QueryExpr::Order {
            input: filtered,
            op: OrderOp::OrderByAscending,
            key: "name".to_string(),
        }
    }

    #[test]
    fn test_operator_chain() {
        assert_eq!(
            chain().operator_chain(),
            vec![
                OperatorKind::Source,
                OperatorKind::Filter,
                OperatorKind::Order(OrderOp::OrderByAscending)
            ]
        );
    }

    #[test]
    fn test_collection() {
        assert_eq!(chain().collection(), "items");
    }

    #[test]
    fn test_walk_visits_subqueries() {
        let sub = Arc::new(QueryExpr::source("tags"));
        let expr = QueryExpr::Filter {
            input: Arc::new(QueryExpr::source("items")),
            predicate: Predicate::in_query("id", "item_id", sub),
        };

        let mut seen = Vec::new();
        expr.walk(|n| seen.push(n.kind()));
        assert_eq!(seen.len(), 3);
        assert_eq!(expr.node_count(), 3);
    }

    #[test]
    fn test_any_node_stops_at_first_match() {
        let mut visited = 0;
        assert!(chain().any_node(|n| {
            visited += 1;
            n.kind().is_ordering()
        }));
        assert_eq!(visited, 1);

        let mut visited = 0;
        assert!(!chain().any_node(|n| {
            visited += 1;
            n.kind() == OperatorKind::Skip
        }));
        assert_eq!(visited, 3);
    }

    #[test]
    fn test_drop_leaves_shared_inputs_intact() {
        let shared = Arc::new(chain());
        let outer = QueryExpr::Filter {
            input: shared.clone(),
            predicate: Predicate::in_query("id", "id", shared.clone()),
        };
        drop(outer);
        assert_eq!(shared.explain(), "items -> filter(id gt 4) -> order_by(name)");
        assert_eq!(Arc::strong_count(&shared), 1);
    }

    #[test]
    fn test_explain() {
        assert_eq!(chain().explain(), "items -> filter(id gt 4) -> order_by(name)");
    }

    #[test]
    fn test_order_op_flags() {
        assert!(OrderOp::ThenByDescending.is_secondary());
        assert!(OrderOp::ThenByDescending.is_descending());
        assert!(!OrderOp::OrderByAscending.is_secondary());
        assert!(OperatorKind::Order(OrderOp::ThenByAscending).is_ordering());
        assert!(!OperatorKind::Filter.is_ordering());
    }
}
