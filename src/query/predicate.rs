//! # Filter Predicates
//!
//! Predicate trees carried by `Filter` nodes. A predicate may embed a
//! sub-query (`InQuery`), which makes it part of the enclosing expression tree.

use std::cmp::Ordering;
use std::sync::Arc;

use serde_json::Value;

use super::expr::QueryExpr;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Case-insensitive substring match on strings
    Contains,
}

impl CompareOp {
    /// Get the operator string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Neq => "neq",
            CompareOp::Gt => "gt",
            CompareOp::Gte => "gte",
            CompareOp::Lt => "lt",
            CompareOp::Lte => "lte",
            CompareOp::Contains => "contains",
        }
    }

    /// Evaluate this operator against a field value
    pub fn apply(&self, field_value: Option<&Value>, operand: &Value) -> bool {
        let field_value = match field_value {
            Some(v) => v,
            None => return *self == CompareOp::Eq && operand.is_null(),
        };

        match self {
            CompareOp::Eq => field_value == operand,
            CompareOp::Neq => field_value != operand,
            CompareOp::Gt => compare_values(Some(field_value), Some(operand)) == Ordering::Greater,
            CompareOp::Gte => compare_values(Some(field_value), Some(operand)) != Ordering::Less,
            CompareOp::Lt => compare_values(Some(field_value), Some(operand)) == Ordering::Less,
            CompareOp::Lte => compare_values(Some(field_value), Some(operand)) != Ordering::Greater,
            CompareOp::Contains => match (field_value.as_str(), operand.as_str()) {
                (Some(haystack), Some(needle)) => haystack
                    .to_lowercase()
                    .contains(&needle.to_lowercase()),
                _ => false,
            },
        }
    }
}

/// A filter predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// field <op> value
    Compare {
        field: String,
        op: CompareOp,
        value: Value,
    },
    /// All predicates hold
    And(Vec<Predicate>),
    /// At least one predicate holds
    Or(Vec<Predicate>),
    /// Negation
    Not(Box<Predicate>),
    /// `field` is one of the `key` values produced by `query`
    InQuery {
        field: String,
        key: String,
        query: Arc<QueryExpr>,
    },
}

impl Predicate {
    pub fn compare(field: impl Into<String>, op: CompareOp, value: Value) -> Self {
        Predicate::Compare {
            field: field.into(),
            op,
            value,
        }
    }

    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self::compare(field, CompareOp::Eq, value)
    }

    pub fn gt(field: impl Into<String>, value: Value) -> Self {
        Self::compare(field, CompareOp::Gt, value)
    }

    pub fn lt(field: impl Into<String>, value: Value) -> Self {
        Self::compare(field, CompareOp::Lt, value)
    }

    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::compare(field, CompareOp::Contains, Value::String(value.into()))
    }

    pub fn in_query(field: impl Into<String>, key: impl Into<String>, query: Arc<QueryExpr>) -> Self {
        Predicate::InQuery {
            field: field.into(),
            key: key.into(),
            query,
        }
    }

    pub fn and(self, other: Predicate) -> Self {
        match self {
            Predicate::And(mut preds) => {
                preds.push(other);
                Predicate::And(preds)
            }
            p => Predicate::And(vec![p, other]),
        }
    }

    pub fn or(self, other: Predicate) -> Self {
        match self {
            Predicate::Or(mut preds) => {
                preds.push(other);
                Predicate::Or(preds)
            }
            p => Predicate::Or(vec![p, other]),
        }
    }

    /// Move embedded sub-queries into `out`, leaving leaves behind
    pub(crate) fn detach_subqueries(&mut self, out: &mut Vec<Arc<QueryExpr>>) {
        match self {
            Predicate::Compare { .. } => {}
            Predicate::And(preds) | Predicate::Or(preds) => {
                for p in preds {
                    p.detach_subqueries(out);
                }
            }
            Predicate::Not(p) => p.detach_subqueries(out),
            Predicate::InQuery { query, .. } => {
                out.push(std::mem::replace(query, super::expr::detached()));
            }
        }
    }

    pub fn negate(self) -> Self {
        Predicate::Not(Box::new(self))
    }

    /// Sub-query expressions embedded anywhere in this predicate
    pub fn subqueries(&self) -> Vec<&QueryExpr> {
        let mut out = Vec::new();
        self.collect_subqueries(&mut out);
        out
    }

    fn collect_subqueries<'a>(&'a self, out: &mut Vec<&'a QueryExpr>) {
        match self {
            Predicate::Compare { .. } => {}
            Predicate::And(preds) | Predicate::Or(preds) => {
                for p in preds {
                    p.collect_subqueries(out);
                }
            }
            Predicate::Not(inner) => inner.collect_subqueries(out),
            Predicate::InQuery { query, .. } => out.push(query),
        }
    }

    /// Short description used by explain output
    pub fn describe(&self) -> String {
        match self {
            Predicate::Compare { field, op, value } => {
                format!("{} {} {}", field, op.as_str(), value)
            }
            Predicate::And(preds) => join_described(preds, " and "),
            Predicate::Or(preds) => join_described(preds, " or "),
            Predicate::Not(inner) => format!("not {}", inner.describe()),
            Predicate::InQuery { field, key, query } => {
                format!("{} in ({} of {})", field, key, query.explain())
            }
        }
    }
}

fn join_described(preds: &[Predicate], sep: &str) -> String {
    let parts: Vec<String> = preds.iter().map(|p| p.describe()).collect();
    format!("({})", parts.join(sep))
}

/// Compares two JSON values.
///
/// Ordering rules:
/// - missing < null < bool < number < string
/// - For same types, natural ordering
/// - Arrays and objects compare equal
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a_val), Some(b_val)) => {
            let a_type = type_rank(a_val);
            let b_type = type_rank(b_val);
            if a_type != b_type {
                return a_type.cmp(&b_type);
            }

            match (a_val, b_val) {
                (Value::Bool(a_b), Value::Bool(b_b)) => a_b.cmp(b_b),
                (Value::Number(a_n), Value::Number(b_n)) => {
                    if let (Some(a_i), Some(b_i)) = (a_n.as_i64(), b_n.as_i64()) {
                        return a_i.cmp(&b_i);
                    }
                    let a_f = a_n.as_f64().unwrap_or(0.0);
                    let b_f = b_n.as_f64().unwrap_or(0.0);
                    a_f.partial_cmp(&b_f).unwrap_or(Ordering::Equal)
                }
                (Value::String(a_s), Value::String(b_s)) => a_s.cmp(b_s),
                _ => Ordering::Equal,
            }
        }
    }
}

fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
