//! Request Validation Tests
//!
//! Checks are applied in a fixed order; each test pins one message.

use docstore::protocol::{Operation, Request};
use docstore::StoreError;
use serde_json::{json, Value};

const DEFAULT: &str = "default";

// =============================================================================
// Helper Functions
// =============================================================================

fn reject(value: Value) -> String {
    match Request::from_value(&value, DEFAULT) {
        Err(StoreError::Validation(msg)) => msg,
        other => panic!("Expected validation error, got {:?}", other),
    }
}

// =============================================================================
// Shape Tests
// =============================================================================

#[test]
fn test_non_object_request() {
    assert_eq!(reject(json!([1, 2])), "Invalid request: must be a JSON object");
    assert_eq!(reject(json!("find")), "Invalid request: must be a JSON object");
}

#[test]
fn test_missing_required_fields() {
    let expected = "Missing required fields: database, operation";
    assert_eq!(reject(json!({"operation": "find"})), expected);
    assert_eq!(reject(json!({"database": "d"})), expected);
    assert_eq!(reject(json!({})), expected);
}

#[test]
fn test_non_string_required_fields() {
    assert_eq!(
        reject(json!({"database": 1, "operation": "find"})),
        "Invalid 'database' field: must be a string"
    );
    assert_eq!(
        reject(json!({"database": "d", "operation": ["find"]})),
        "Invalid 'operation' field: must be a string"
    );
}

#[test]
fn test_non_string_collection() {
    assert_eq!(
        reject(json!({"database": "d", "collection": 5, "operation": "find"})),
        "Invalid 'collection' field: must be a string"
    );
}

#[test]
fn test_unknown_operation() {
    assert_eq!(
        reject(json!({"database": "d", "operation": "upsert"})),
        "Unknown operation: upsert (supported: insert, find, delete, create_index)"
    );
}

// =============================================================================
// Operation Argument Tests
// =============================================================================

#[test]
fn test_insert_requires_data() {
    assert_eq!(
        reject(json!({"database": "d", "operation": "insert"})),
        "Missing 'data' field for insert operation"
    );
    assert_eq!(
        reject(json!({"database": "d", "operation": "insert", "data": 3})),
        "Invalid 'data' field: must be object or array"
    );
}

#[test]
fn test_delete_requires_query() {
    assert_eq!(
        reject(json!({"database": "d", "operation": "delete"})),
        "Missing 'query' field for delete operation"
    );
    assert_eq!(
        reject(json!({"database": "d", "operation": "delete", "query": "x"})),
        "Invalid 'query' field: must be an object"
    );
}

#[test]
fn test_create_index_requires_string_field() {
    assert_eq!(
        reject(json!({"database": "d", "operation": "create_index"})),
        "Missing 'field' field for create_index operation"
    );
    assert_eq!(
        reject(json!({"database": "d", "operation": "create_index", "field": 1})),
        "Invalid 'field' field: must be a string"
    );
}

#[test]
fn test_find_query_defaults_to_empty() {
    let request = Request::from_value(&json!({"database": "d", "operation": "find"}), DEFAULT).unwrap();

    assert_eq!(request.operation, Operation::Find { query: json!({}) });
}

#[test]
fn test_find_rejects_non_object_query() {
    assert_eq!(
        reject(json!({"database": "d", "operation": "find", "query": [1]})),
        "Invalid 'query' field: must be an object"
    );
}

// =============================================================================
// Normalization Tests
// =============================================================================

#[test]
fn test_operation_is_case_insensitive() {
    for name in ["FIND", "Find", "fInD"] {
        let request =
            Request::from_value(&json!({"database": "d", "operation": name}), DEFAULT).unwrap();
        assert_eq!(request.operation.name(), "find");
    }
}

#[test]
fn test_collection_defaults() {
    let absent = Request::from_value(&json!({"database": "d", "operation": "find"}), DEFAULT).unwrap();
    let null = Request::from_value(
        &json!({"database": "d", "collection": null, "operation": "find"}),
        "fallback",
    )
    .unwrap();

    assert_eq!(absent.collection, "default");
    assert_eq!(null.collection, "fallback");
}

#[test]
fn test_write_classification() {
    assert!(!Request::find("d", "c", json!({})).operation.is_write());
    assert!(Request::delete("d", "c", json!({})).operation.is_write());
    assert!(Request::insert("d", "c", json!({})).operation.is_write());
    assert!(Request::create_index("d", "c", "f").operation.is_write());
}

#[test]
fn test_builders_render_valid_wire_json() {
    let requests = [
        Request::insert("shop", "orders", json!([{"item": "pen"}])),
        Request::find("shop", "orders", json!({"item": {"$like": "p%"}})),
        Request::delete("shop", "orders", json!({"item": "pen"})),
        Request::create_index("shop", "orders", "item"),
    ];

    for request in requests {
        let parsed = Request::from_value(&request.to_value(), DEFAULT).unwrap();
        assert_eq!(parsed, request);
    }
}

// =============================================================================
// Body Parsing Tests
// =============================================================================

#[test]
fn test_parse_invalid_json() {
    match Request::parse(b"{not json", DEFAULT) {
        Err(StoreError::Validation(msg)) => assert!(msg.starts_with("Invalid JSON in request")),
        other => panic!("Expected validation error, got {:?}", other),
    }
}

#[test]
fn test_parse_invalid_utf8() {
    assert!(matches!(
        Request::parse(&[0xFF, 0xFE, b'{'], DEFAULT),
        Err(StoreError::Validation(_))
    ));
}

#[test]
fn test_parse_valid_body() {
    let request = Request::parse(
        br#"{"database":"d","collection":"users","operation":"insert","data":{"name":"Alice"}}"#,
        DEFAULT,
    )
    .unwrap();

    assert_eq!(request.database, "d");
    assert_eq!(request.collection, "users");
    assert_eq!(request.operation, Operation::Insert { data: json!({"name": "Alice"}) });
}
