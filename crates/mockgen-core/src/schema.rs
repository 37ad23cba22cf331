use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One generated record: field name to generated value, in schema order.
pub type Record = Map<String, Value>;

/// Ordered records produced by a single generation call.
pub type RecordSequence = Vec<Record>;

/// Validated mapping of field name to raw descriptor.
///
/// Descriptors are kept exactly as supplied; kind-specific interpretation
/// happens when a field is dispatched for generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap {
    fields: Map<String, Value>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, descriptor: Value) -> Option<Value> {
        self.fields.insert(name.into(), descriptor)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Map<String, Value>> for FieldMap {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl<'a> IntoIterator for &'a FieldMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
