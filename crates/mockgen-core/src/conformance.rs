//! Check generated records against the schema that produced them.

use jsonschema::JSONSchema;
use serde_json::{Map, Value, json};

use crate::descriptor::{DescriptorParser, ElementSpec, FieldDescriptor};
use crate::error::ConformanceError;
use crate::schema::{FieldMap, Record};

const UUID_PATTERN: &str = "^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$";

/// Build the JSON Schema every generated record must satisfy.
///
/// Fields whose descriptor cannot be dispatched are expected to hold the
/// `null` placeholder.
pub fn record_schema(fields: &FieldMap, max_depth: usize) -> Value {
    let parser = DescriptorParser::new(max_depth);
    let mut properties = Map::new();
    for (name, raw) in fields.iter() {
        let mut issues = Vec::new();
        let property = match parser.parse(name, raw, &mut issues) {
            Ok(descriptor) => descriptor_schema(&descriptor),
            Err(_) => json!({"type": "null"}),
        };
        properties.insert(name.to_string(), property);
    }
    closed_object(properties)
}

/// Validate every record, returning the first violation found.
pub fn validate_records(
    fields: &FieldMap,
    records: &[Record],
    max_depth: usize,
) -> Result<(), ConformanceError> {
    let schema = record_schema(fields, max_depth);
    let compiled =
        JSONSchema::compile(&schema).map_err(|err| ConformanceError::Compile(err.to_string()))?;

    for (index, record) in records.iter().enumerate() {
        let instance = Value::Object(record.clone());
        if let Err(mut errors) = compiled.validate(&instance)
            && let Some(error) = errors.next()
        {
            return Err(ConformanceError::Violation {
                index,
                path: error.instance_path.to_string(),
                message: error.to_string(),
            });
        }
    }
    Ok(())
}

fn descriptor_schema(descriptor: &FieldDescriptor) -> Value {
    match descriptor {
        FieldDescriptor::Uuid => json!({"type": "string", "pattern": UUID_PATTERN}),
        FieldDescriptor::Choice(spec) if spec.options.is_empty() => json!({"type": "null"}),
        FieldDescriptor::Choice(spec) => json!({"enum": spec.options}),
        FieldDescriptor::Float(spec) => json!({
            "type": "number",
            "minimum": spec.min,
            "maximum": spec.max,
        }),
        FieldDescriptor::Integer(spec) => json!({
            "type": "integer",
            "minimum": spec.min,
            "maximum": spec.max,
        }),
        FieldDescriptor::String(_) => json!({"type": "string"}),
        FieldDescriptor::Object(spec) => {
            let properties = spec
                .fields
                .iter()
                .map(|(name, child)| (name.clone(), descriptor_schema(child)))
                .collect();
            closed_object(properties)
        }
        FieldDescriptor::Array(spec) => {
            let items = match &spec.elements {
                ElementSpec::Sample(options) => json!({"enum": options}),
                ElementSpec::Generated(element) => descriptor_schema(element),
                ElementSpec::Words => json!({"type": "string"}),
            };
            json!({
                "type": "array",
                "minItems": spec.min_items,
                "maxItems": spec.max_items,
                "items": items,
            })
        }
    }
}

fn closed_object(properties: Map<String, Value>) -> Value {
    let required: Vec<String> = properties.keys().cloned().collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}
