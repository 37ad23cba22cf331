use std::fs;
use std::path::PathBuf;

use mockgen_core::{
    SchemaError, load_and_validate, load_and_validate_strict, validate_records, validate_strict,
    DEFAULT_MAX_DEPTH,
};
use serde_json::{Value, json};
use uuid::Uuid;

fn temp_schema(contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mockgen_core_{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join("schema.json");
    fs::write(&path, contents).expect("write schema");
    path
}

fn cleanup(path: &PathBuf) {
    if let Some(dir) = path.parent() {
        let _ = fs::remove_dir_all(dir);
    }
}

#[test]
fn loads_field_map_from_file_unchanged() {
    let path = temp_schema(r#"{"age": {"type": "integer", "min_value": 18, "max_value": 99}}"#);
    let fields = load_and_validate(path.clone()).expect("load schema");
    cleanup(&path);

    assert_eq!(fields.len(), 1);
    assert_eq!(
        fields.get("age"),
        Some(&json!({"type": "integer", "min_value": 18, "max_value": 99}))
    );
}

#[test]
fn missing_file_is_not_found() {
    let path = std::env::temp_dir().join(format!("mockgen_missing_{}.json", Uuid::new_v4()));
    let result = load_and_validate(path);
    assert!(matches!(result, Err(SchemaError::NotFound { .. })));
}

#[test]
fn unparseable_file_is_malformed() {
    let path = temp_schema("{ not json");
    let result = load_and_validate(path.clone());
    cleanup(&path);
    assert!(matches!(result, Err(SchemaError::Malformed { .. })));
}

#[test]
fn non_mapping_top_level_is_structure_error() {
    let result = load_and_validate(json!([{"type": "uuid"}]));
    assert!(matches!(result, Err(SchemaError::Structure(_))));
}

#[test]
fn descriptor_without_discriminator_is_structure_error() {
    let result = load_and_validate(json!({"id": {"min_value": 1}}));
    assert!(matches!(result, Err(SchemaError::Structure(message)) if message.contains("'id'")));
}

#[test]
fn unknown_kinds_pass_basic_validation() {
    let fields = load_and_validate(json!({"blob": {"type": "blob"}})).expect("deferred kind check");
    assert_eq!(fields.len(), 1);
}

#[test]
fn strict_accepts_custom_kinds_and_nesting() {
    let schema = json!({
        "id": {"type": "uuid"},
        "status": {"type": "choice", "options": ["active", "suspended"], "weights": [3, 1]},
        "price": {"type": "float", "min_value": 1.0, "max_value": 9.5},
        "profile": {
            "type": "object",
            "fields": {
                "age": {"type": "integer", "min_value": 18, "max_value": 99},
                "tags": {"type": "array", "item_type": "string", "min_items": 1, "max_items": 3}
            }
        }
    });
    let fields =
        load_and_validate_strict(schema.clone(), DEFAULT_MAX_DEPTH).expect("strict schema");
    assert_eq!(Value::Object(fields.into_inner()), schema);
}

#[test]
fn strict_rejects_bad_structural_keywords() {
    let fields = load_and_validate(json!({
        "tags": {"type": "array", "min_items": -1}
    }))
    .expect("basic validation passes");
    assert!(matches!(
        validate_strict(&fields, DEFAULT_MAX_DEPTH),
        Err(SchemaError::MetaValidation(_))
    ));
}

#[test]
fn strict_rejects_unknown_kinds() {
    let result = load_and_validate_strict(json!({"blob": {"type": "blob"}}), DEFAULT_MAX_DEPTH);
    assert!(matches!(result, Err(SchemaError::MetaValidation(_))));
}

fn nested_objects(levels: usize) -> Value {
    let mut descriptor = json!({"type": "integer", "min_value": 1, "max_value": 9});
    for _ in 0..levels {
        descriptor = json!({"type": "object", "fields": {"next": descriptor}});
    }
    json!({ "root": descriptor })
}

#[test]
fn strict_depth_limit_follows_the_configured_depth() {
    let schema = nested_objects(40);

    let result = load_and_validate_strict(schema.clone(), DEFAULT_MAX_DEPTH);
    assert!(matches!(
        result,
        Err(SchemaError::Structure(message)) if message.contains("depth of 32")
    ));

    let fields = load_and_validate_strict(schema, 64).expect("deep schema within limit");
    assert_eq!(fields.len(), 1);
}

#[test]
fn strict_depth_limit_counts_array_elements() {
    let schema = json!({
        "matrix": {
            "type": "array",
            "items": {"type": "array", "items": {"type": "integer"}}
        }
    });

    assert!(load_and_validate_strict(schema.clone(), 2).is_ok());
    assert!(matches!(
        load_and_validate_strict(schema, 1),
        Err(SchemaError::Structure(_))
    ));
}

#[test]
fn records_are_checked_against_descriptors() {
    let fields = load_and_validate(json!({
        "age": {"type": "integer", "min_value": 18, "max_value": 99},
        "status": {"type": "choice", "options": ["active", "deleted"]}
    }))
    .expect("schema");

    let good = json!({"age": 30, "status": "active"});
    let bad = json!({"age": 12, "status": "active"});
    let records = vec![
        good.as_object().cloned().expect("object"),
        bad.as_object().cloned().expect("object"),
    ];

    assert!(validate_records(&fields, &records[..1], DEFAULT_MAX_DEPTH).is_ok());
    let err = validate_records(&fields, &records, DEFAULT_MAX_DEPTH).expect_err("violation");
    assert!(matches!(
        err,
        mockgen_core::ConformanceError::Violation { index: 1, .. }
    ));
}
