use std::fs;
use std::path::{Path, PathBuf};

use jsonschema::JSONSchema;
use serde_json::{Map, Value, json};

use crate::error::{Result, SchemaError};
use crate::kind::FieldKind;
use crate::schema::FieldMap;

/// Where a schema comes from.
#[derive(Debug, Clone)]
pub enum SchemaSource {
    /// Filesystem path to a JSON document.
    Path(PathBuf),
    /// An in-memory mapping.
    Value(Value),
}

impl From<PathBuf> for SchemaSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for SchemaSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<Value> for SchemaSource {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Load a schema and check it is a mapping of field name to descriptor.
///
/// Descriptors are returned unchanged; kind-specific checks happen when a
/// field is dispatched for generation. A JSON-Schema style envelope
/// (`{"type": "object", "properties": {...}}`) is unwrapped to its
/// `properties`.
pub fn load_and_validate(source: impl Into<SchemaSource>) -> Result<FieldMap> {
    let document = match source.into() {
        SchemaSource::Path(path) => read_document(&path)?,
        SchemaSource::Value(value) => value,
    };
    into_field_map(document)
}

/// Like [`load_and_validate`], then meta-validates the derived JSON Schema.
///
/// `max_depth` bounds object and array nesting, as it does for generation.
pub fn load_and_validate_strict(
    source: impl Into<SchemaSource>,
    max_depth: usize,
) -> Result<FieldMap> {
    let fields = load_and_validate(source)?;
    validate_strict(&fields, max_depth)?;
    Ok(fields)
}

/// Check a field map against the JSON Schema meta-specification.
///
/// Custom kinds (uuid, choice, float and their aliases) are presented as
/// `"string"` in the derived document so generic structural checks accept
/// them. The field map itself is never modified.
pub fn validate_strict(fields: &FieldMap, max_depth: usize) -> Result<()> {
    let derived = derive_json_schema(fields, max_depth)?;
    JSONSchema::compile(&derived)
        .map(|_| ())
        .map_err(|err| SchemaError::MetaValidation(err.to_string()))
}

/// Build the JSON Schema document used for strict meta-validation.
pub fn derive_json_schema(fields: &FieldMap, max_depth: usize) -> Result<Value> {
    Deriver { max_depth }.object(fields.as_map(), "", 0)
}

fn read_document(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(SchemaError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| SchemaError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

fn into_field_map(document: Value) -> Result<FieldMap> {
    let Value::Object(mut map) = document else {
        return Err(SchemaError::Structure(format!(
            "top-level schema must be a mapping, found {}",
            json_type_name(&document)
        )));
    };

    if is_envelope(&map)
        && let Some(Value::Object(properties)) = map.remove("properties")
    {
        map = properties;
    }

    for (name, descriptor) in &map {
        let Some(descriptor) = descriptor.as_object() else {
            return Err(SchemaError::Structure(format!(
                "descriptor for field '{name}' must be a mapping, found {}",
                json_type_name(descriptor)
            )));
        };
        if !descriptor.contains_key("type") {
            return Err(SchemaError::Structure(format!(
                "field '{name}' has no 'type' discriminator"
            )));
        }
    }

    Ok(FieldMap::from(map))
}

fn is_envelope(map: &Map<String, Value>) -> bool {
    map.get("type").and_then(Value::as_str) == Some("object")
        && map.get("properties").is_some_and(Value::is_object)
}

struct Deriver {
    max_depth: usize,
}

impl Deriver {
    fn object(&self, fields: &Map<String, Value>, path: &str, depth: usize) -> Result<Value> {
        let mut properties = Map::new();
        for (name, descriptor) in fields {
            let child_path = if path.is_empty() {
                name.clone()
            } else {
                format!("{path}.{name}")
            };
            properties.insert(name.clone(), self.property(descriptor, &child_path, depth)?);
        }
        let required: Vec<&String> = fields.keys().collect();

        Ok(json!({
            "type": "object",
            "properties": properties,
            "required": required,
        }))
    }

    fn property(&self, descriptor: &Value, path: &str, depth: usize) -> Result<Value> {
        if depth > self.max_depth {
            return Err(SchemaError::Structure(format!(
                "field '{path}' exceeds the maximum nesting depth of {}",
                self.max_depth
            )));
        }

        let Some(descriptor) = descriptor.as_object() else {
            return Err(SchemaError::Structure(format!(
                "descriptor for field '{path}' must be a mapping"
            )));
        };
        let raw_kind = descriptor.get("type").cloned().unwrap_or(Value::Null);
        let kind = raw_kind.as_str().and_then(FieldKind::parse);

        let mut property = Map::new();
        property.insert("type".to_string(), meta_type(&raw_kind, kind));

        let copy = |property: &mut Map<String, Value>, from: &str, to: &str| {
            if let Some(value) = descriptor.get(from) {
                property.insert(to.to_string(), value.clone());
            }
        };

        match kind {
            Some(FieldKind::Integer | FieldKind::Float) => {
                copy(&mut property, "min_value", "minimum");
                copy(&mut property, "max_value", "maximum");
            }
            Some(FieldKind::Choice) => {
                if let Some(options) = descriptor.get("options")
                    && options.as_array().is_none_or(|options| !options.is_empty())
                {
                    property.insert("enum".to_string(), options.clone());
                }
            }
            Some(FieldKind::Array) => {
                copy(&mut property, "min_items", "minItems");
                copy(&mut property, "max_items", "maxItems");
                let element_path = format!("{path}[]");
                if let Some(items) = descriptor.get("items") {
                    property.insert(
                        "items".to_string(),
                        self.property(items, &element_path, depth + 1)?,
                    );
                } else if let Some(item_type) = descriptor.get("item_type") {
                    property.insert(
                        "items".to_string(),
                        self.property(&json!({ "type": item_type }), &element_path, depth + 1)?,
                    );
                }
            }
            Some(FieldKind::Object) => {
                if let Some(Value::Object(fields)) = descriptor.get("fields") {
                    let nested = self.object(fields, path, depth + 1)?;
                    if let Value::Object(nested) = nested {
                        property.extend(nested);
                    }
                }
            }
            _ => {}
        }

        Ok(Value::Object(property))
    }
}

/// JSON Schema `type` presented for a descriptor discriminator.
fn meta_type(raw: &Value, kind: Option<FieldKind>) -> Value {
    match kind {
        Some(kind) if kind.is_custom() => Value::String("string".to_string()),
        Some(kind) => Value::String(kind.as_str().to_string()),
        None => raw.clone(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::DEFAULT_MAX_DEPTH;

    #[test]
    fn envelope_is_unwrapped() {
        let fields = load_and_validate(json!({
            "type": "object",
            "properties": {"id": {"type": "uuid"}}
        }))
        .expect("envelope schema");
        assert_eq!(fields.names().collect::<Vec<_>>(), vec!["id"]);
    }

    #[test]
    fn custom_kinds_are_presented_as_strings() {
        let fields = load_and_validate(json!({
            "id": {"type": "identifier"},
            "score": {"type": "float", "min_value": 1.5}
        }))
        .expect("schema");
        let derived = derive_json_schema(&fields, DEFAULT_MAX_DEPTH).expect("derived");
        assert_eq!(derived["properties"]["id"]["type"], "string");
        assert_eq!(derived["properties"]["score"]["type"], "string");
        assert_eq!(derived["properties"]["score"]["minimum"], 1.5);
        assert_eq!(fields.get("id"), Some(&json!({"type": "identifier"})));
    }
}
