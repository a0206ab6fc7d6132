//! Query Evaluator Tests
//!
//! Tests verify:
//! - Literal (implicit $eq) conditions
//! - Comparison operators and their type rules
//! - $like anchoring and case-insensitivity
//! - $and / $or composition
//! - Fail-closed handling of malformed queries

use docstore::document::Document;
use docstore::query::{matches, Operator};
use serde_json::{json, Value};

fn alice() -> Document {
    json!({
        "_id": "a1",
        "name": "Alice",
        "age": 25,
        "score": 91.5,
        "tags": ["admin", "ops"],
        "active": true,
        "manager": null
    })
    .as_object()
    .unwrap()
    .clone()
}

// =============================================================================
// Literal Conditions
// =============================================================================

#[test]
fn test_empty_query_matches_everything() {
    assert!(matches(&alice(), &json!({})));
    assert!(matches(&Document::new(), &json!({})));
}

#[test]
fn test_literal_equality() {
    let doc = alice();
    assert!(matches(&doc, &json!({"name": "Alice"})));
    assert!(!matches(&doc, &json!({"name": "alice"})));
    assert!(matches(&doc, &json!({"active": true})));
    assert!(matches(&doc, &json!({"manager": null})));
    assert!(matches(&doc, &json!({"tags": ["admin", "ops"]})));
}

#[test]
fn test_literal_equality_tolerates_int_float() {
    let doc = alice();
    assert!(matches(&doc, &json!({"age": 25.0})));
    assert!(!matches(&doc, &json!({"age": "25"})));
}

#[test]
fn test_missing_field_never_matches() {
    let doc = alice();
    assert!(!matches(&doc, &json!({"email": "a@example.com"})));
    assert!(!matches(&doc, &json!({"email": {"$in": [null]}})));
}

#[test]
fn test_fields_are_conjunctive() {
    let doc = alice();
    assert!(matches(&doc, &json!({"name": "Alice", "age": 25})));
    assert!(!matches(&doc, &json!({"name": "Alice", "age": 26})));
}

// =============================================================================
// Operators
// =============================================================================

#[test]
fn test_eq_operator() {
    let doc = alice();
    assert!(matches(&doc, &json!({"age": {"$eq": 25}})));
    assert!(!matches(&doc, &json!({"age": {"$eq": 30}})));
}

#[test]
fn test_gt_lt() {
    let doc = alice();
    assert!(matches(&doc, &json!({"age": {"$gt": 20}})));
    assert!(!matches(&doc, &json!({"age": {"$gt": 25}})));
    assert!(matches(&doc, &json!({"age": {"$lt": 25.5}})));
    assert!(matches(&doc, &json!({"score": {"$gt": 91}})));
}

#[test]
fn test_range_combines_operators() {
    let doc = alice();
    assert!(matches(&doc, &json!({"age": {"$gt": 20, "$lt": 30}})));
    assert!(!matches(&doc, &json!({"age": {"$gt": 20, "$lt": 24}})));
}

#[test]
fn test_gt_lt_on_non_numbers_is_false() {
    let doc = alice();
    assert!(!matches(&doc, &json!({"name": {"$gt": 1}})));
    assert!(!matches(&doc, &json!({"name": {"$lt": "Zed"}})));
    assert!(!matches(&doc, &json!({"age": {"$gt": "10"}})));
    assert!(!matches(&doc, &json!({"manager": {"$lt": 1}})));
}

#[test]
fn test_in_operator() {
    let doc = alice();
    assert!(matches(&doc, &json!({"name": {"$in": ["Bob", "Alice"]}})));
    assert!(matches(&doc, &json!({"age": {"$in": [24, 25.0]}})));
    assert!(!matches(&doc, &json!({"name": {"$in": []}})));
}

#[test]
fn test_in_requires_array_operand() {
    let doc = alice();
    assert!(!matches(&doc, &json!({"name": {"$in": "Alice"}})));
}

#[test]
fn test_like_is_anchored_and_case_insensitive() {
    let doc = alice();
    assert!(matches(&doc, &json!({"name": {"$like": "al%"}})));
    assert!(matches(&doc, &json!({"name": {"$like": "ALICE"}})));
    assert!(matches(&doc, &json!({"name": {"$like": "_lic_"}})));
    assert!(!matches(&doc, &json!({"name": {"$like": "lic"}})));

    let malice = json!({"name": "malice"}).as_object().unwrap().clone();
    assert!(!matches(&malice, &json!({"name": {"$like": "al%"}})));
}

#[test]
fn test_like_on_non_strings_is_false() {
    let doc = alice();
    assert!(!matches(&doc, &json!({"age": {"$like": "2%"}})));
    assert!(!matches(&doc, &json!({"name": {"$like": 5}})));
}

#[test]
fn test_unknown_operator_fails_closed() {
    let doc = alice();
    assert!(!matches(&doc, &json!({"age": {"$gte": 1}})));
    assert!(!matches(&doc, &json!({"age": {"$gt": 1, "$regex": "x"}})));
}

#[test]
fn test_nested_object_literal_is_treated_as_operators() {
    let doc = json!({"address": {"city": "Oslo"}}).as_object().unwrap().clone();
    assert!(!matches(&doc, &json!({"address": {"city": "Oslo"}})));
}

#[test]
fn test_operator_parsing() {
    assert_eq!("$like".parse::<Operator>(), Ok(Operator::Like));
    assert!("$regex".parse::<Operator>().is_err());
    assert_eq!(Operator::In.to_string(), "$in");
}

// =============================================================================
// Boolean Composition
// =============================================================================

#[test]
fn test_or() {
    let doc = alice();
    assert!(matches(&doc, &json!({"$or": [{"name": "Bob"}, {"age": 25}]})));
    assert!(!matches(&doc, &json!({"$or": [{"name": "Bob"}, {"age": 30}]})));
    assert!(!matches(&doc, &json!({"$or": []})));
}

#[test]
fn test_or_short_circuits_other_fields() {
    let doc = alice();
    assert!(matches(&doc, &json!({"$or": [{"age": 25}], "name": "Bob"})));
}

#[test]
fn test_and() {
    let doc = alice();
    assert!(matches(&doc, &json!({"$and": [{"name": "Alice"}, {"age": {"$gt": 18}}]})));
    assert!(!matches(&doc, &json!({"$and": [{"name": "Alice"}, {"age": {"$gt": 30}}]})));
    assert!(matches(&doc, &json!({"$and": []})));
}

#[test]
fn test_and_continues_to_plain_fields() {
    let doc = alice();
    assert!(matches(&doc, &json!({"$and": [{"age": 25}], "name": "Alice"})));
    assert!(!matches(&doc, &json!({"$and": [{"age": 25}], "name": "Bob"})));
}

#[test]
fn test_nested_composition() {
    let doc = alice();
    let query = json!({
        "$and": [
            {"$or": [{"name": {"$like": "a%"}}, {"name": "Bob"}]},
            {"tags": {"$in": [["admin", "ops"]]}}
        ]
    });
    assert!(matches(&doc, &query));
}

#[test]
fn test_composition_algebra() {
    let doc = alice();
    let clauses: Vec<Value> = vec![
        json!({"name": "Alice"}),
        json!({"age": {"$gt": 30}}),
        json!({"tags": {"$in": ["x"]}}),
        json!({"active": true}),
    ];
    for a in &clauses {
        for b in &clauses {
            let both = matches(&doc, a) && matches(&doc, b);
            let either = matches(&doc, a) || matches(&doc, b);
            assert_eq!(matches(&doc, &json!({"$and": [a, b]})), both);
            assert_eq!(matches(&doc, &json!({"$or": [a, b]})), either);
        }
    }
}

// =============================================================================
// Malformed Queries
// =============================================================================

#[test]
fn test_non_object_query_matches_nothing() {
    let doc = alice();
    assert!(!matches(&doc, &json!([])));
    assert!(!matches(&doc, &json!("name")));
    assert!(!matches(&doc, &Value::Null));
}

#[test]
fn test_non_array_logical_operand_fails_closed() {
    let doc = alice();
    assert!(!matches(&doc, &json!({"$or": {"name": "Alice"}})));
    assert!(!matches(&doc, &json!({"$and": {"name": "Alice"}})));
}

#[test]
fn test_non_object_clause_does_not_match() {
    let doc = alice();
    assert!(!matches(&doc, &json!({"$or": [1, "x"]})));
    assert!(!matches(&doc, &json!({"$and": [{}, 1]})));
}
