//! Query execution over JSON documents
//!
//! Evaluates a `QueryExpr` against documents resolved by a `DocumentSource`.
//! The outer operator chain is applied source-first in a single pass.
//!
//! Sort semantics:
//! - `OrderBy*` replaces the active sort keys
//! - `ThenBy*` appends a key to the active sort keys (primary if none)
//! - Sorting is stable

use std::cmp::Ordering;

use serde_json::{Map, Value};

use super::expr::{OrderOp, QueryExpr};
use super::predicate::{compare_values, Predicate};

/// Resolves a collection name to its documents
pub trait DocumentSource {
    type Error;

    fn documents(&self, collection: &str) -> Result<Vec<Value>, Self::Error>;
}

/// Stateless query evaluator
pub struct QueryEngine<'a, S: DocumentSource> {
    source: &'a S,
}

#[derive(Debug, Clone)]
struct SortKey {
    field: String,
    descending: bool,
}

impl<'a, S: DocumentSource> QueryEngine<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Executes `expr` and returns the resulting documents
    pub fn execute(&self, expr: &QueryExpr) -> Result<Vec<Value>, S::Error> {
        let mut chain = Vec::new();
        let mut node = Some(expr);
        while let Some(n) = node {
            chain.push(n);
            node = n.input();
        }

        let mut docs = Vec::new();
        let mut sort_keys: Vec<SortKey> = Vec::new();

        for n in chain.into_iter().rev() {
            match n {
                QueryExpr::Source { collection } => {
                    docs = self.source.documents(collection)?;
                }
                QueryExpr::Filter { predicate, .. } => {
                    let mut kept = Vec::with_capacity(docs.len());
                    for doc in docs {
                        if self.matches(predicate, &doc)? {
                            kept.push(doc);
                        }
                    }
                    docs = kept;
                }
                QueryExpr::Select { fields, .. } => {
                    docs = docs.into_iter().map(|d| project(d, fields)).collect();
                }
                QueryExpr::Order { op, key, .. } => {
                    let sort_key = SortKey {
                        field: key.clone(),
                        descending: op.is_descending(),
                    };
                    match op {
                        OrderOp::OrderByAscending | OrderOp::OrderByDescending => {
                            sort_keys = vec![sort_key];
                        }
                        OrderOp::ThenByAscending | OrderOp::ThenByDescending => {
                            sort_keys.push(sort_key);
                        }
                    }
                    docs.sort_by(|a, b| compare_by_keys(a, b, &sort_keys));
                }
                QueryExpr::Skip { count, .. } => {
                    docs = docs.into_iter().skip(*count).collect();
                }
                QueryExpr::Take { count, .. } => {
                    docs.truncate(*count);
                }
            }
        }

        Ok(docs)
    }

    /// Number of documents `expr` produces
    pub fn count(&self, expr: &QueryExpr) -> Result<usize, S::Error> {
        Ok(self.execute(expr)?.len())
    }

    fn matches(&self, predicate: &Predicate, doc: &Value) -> Result<bool, S::Error> {
        match predicate {
            Predicate::Compare { field, op, value } => Ok(op.apply(doc.get(field), value)),
            Predicate::And(preds) => {
                for p in preds {
                    if !self.matches(p, doc)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Predicate::Or(preds) => {
                for p in preds {
                    if self.matches(p, doc)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Predicate::Not(inner) => Ok(!self.matches(inner, doc)?),
            Predicate::InQuery { field, key, query } => {
                let field_value = match doc.get(field) {
                    Some(v) => v,
                    None => return Ok(false),
                };
                let results = self.execute(query)?;
                Ok(results.iter().any(|r| r.get(key) == Some(field_value)))
            }
        }
    }
}

fn compare_by_keys(a: &Value, b: &Value, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let ord = compare_values(a.get(&key.field), b.get(&key.field));
        let ord = if key.descending { ord.reverse() } else { ord };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

fn project(doc: Value, fields: &[String]) -> Value {
    match doc {
        Value::Object(obj) => {
            let projected: Map<String, Value> = obj
                .into_iter()
                .filter(|(k, _)| fields.contains(k))
                .collect();
            Value::Object(projected)
        }
        other => other,
    }
}
