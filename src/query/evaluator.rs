//! Query evaluation
//!
//! Recursive, short-circuiting evaluation of a query object against a single
//! document.

use std::cmp::Ordering;

use serde_json::{Number, Value};

use crate::document::Document;

use super::{like_matches, Operator, AND_KEY, OR_KEY};

/// Check whether `doc` satisfies `query`
///
/// Order of evaluation:
/// 1. `$or` present: the result is whether any clause matches (an empty
///    array matches nothing). Other keys are not consulted.
/// 2. `$and` present: every clause must match (an empty array is vacuously
///    true), then evaluation continues with the plain fields.
/// 3. Every other key names a field the document must contain and whose
///    condition must hold.
///
/// A non-object query, or a `$and`/`$or` whose operand is not an array,
/// matches nothing. The empty query matches every document.
pub fn matches(doc: &Document, query: &Value) -> bool {
    let Some(query) = query.as_object() else {
        return false;
    };

    if let Some(clauses) = query.get(OR_KEY) {
        return match clauses.as_array() {
            Some(clauses) => clauses.iter().any(|clause| matches(doc, clause)),
            None => false,
        };
    }

    if let Some(clauses) = query.get(AND_KEY) {
        let all = match clauses.as_array() {
            Some(clauses) => clauses.iter().all(|clause| matches(doc, clause)),
            None => false,
        };
        if !all {
            return false;
        }
    }

    query
        .iter()
        .filter(|(key, _)| key.as_str() != AND_KEY && key.as_str() != OR_KEY)
        .all(|(field, condition)| match doc.get(field) {
            Some(value) => condition_holds(value, condition),
            None => false,
        })
}

/// Evaluate one field condition against the document's value for that field
fn condition_holds(value: &Value, condition: &Value) -> bool {
    let Value::Object(operators) = condition else {
        return values_equal(value, condition);
    };

    for (key, operand) in operators {
        let Ok(op) = key.parse::<Operator>() else {
            tracing::trace!("Unknown query operator {:?}", key);
            return false;
        };
        if !apply(op, value, operand) {
            return false;
        }
    }
    true
}

fn apply(op: Operator, value: &Value, operand: &Value) -> bool {
    match op {
        Operator::Eq => values_equal(value, operand),
        Operator::Gt => compare_numbers(value, operand) == Some(Ordering::Greater),
        Operator::Lt => compare_numbers(value, operand) == Some(Ordering::Less),
        Operator::In => operand
            .as_array()
            .map_or(false, |items| items.iter().any(|item| values_equal(value, item))),
        Operator::Like => match (value.as_str(), operand.as_str()) {
            (Some(text), Some(pattern)) => like_matches(text, pattern),
            _ => false,
        },
    }
}

/// Structural equality where numbers compare by value, so `25` equals `25.0`
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| values_equal(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, l)| y.get(key).map_or(false, |r| values_equal(l, r)))
        }
        _ => a == b,
    }
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
    if let (Some(l), Some(r)) = (x.as_i64(), y.as_i64()) {
        return l == r;
    }
    if let (Some(l), Some(r)) = (x.as_u64(), y.as_u64()) {
        return l == r;
    }
    match (x.as_f64(), y.as_f64()) {
        (Some(l), Some(r)) => l == r,
        _ => false,
    }
}

/// Order two values numerically; `None` unless both are numbers
fn compare_numbers(a: &Value, b: &Value) -> Option<Ordering> {
    let (Value::Number(x), Value::Number(y)) = (a, b) else {
        return None;
    };
    if let (Some(l), Some(r)) = (x.as_i64(), y.as_i64()) {
        return Some(l.cmp(&r));
    }
    if let (Some(l), Some(r)) = (x.as_u64(), y.as_u64()) {
        return Some(l.cmp(&r));
    }
    x.as_f64()?.partial_cmp(&y.as_f64()?)
}
