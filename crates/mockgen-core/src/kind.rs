use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of field kinds understood by the generator registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Uuid,
    Choice,
    Float,
    Integer,
    String,
    Object,
    Array,
}

impl FieldKind {
    pub const ALL: [FieldKind; 7] = [
        FieldKind::Uuid,
        FieldKind::Choice,
        FieldKind::Float,
        FieldKind::Integer,
        FieldKind::String,
        FieldKind::Object,
        FieldKind::Array,
    ];

    /// Resolve a discriminator value, including accepted aliases.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "uuid" | "identifier" => Some(Self::Uuid),
            "choice" | "categorical" => Some(Self::Choice),
            "float" | "number" => Some(Self::Float),
            "integer" => Some(Self::Integer),
            "string" => Some(Self::String),
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uuid => "uuid",
            Self::Choice => "choice",
            Self::Float => "float",
            Self::Integer => "integer",
            Self::String => "string",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    /// True for kinds that are not JSON Schema primitive types.
    pub fn is_custom(self) -> bool {
        matches!(self, Self::Uuid | Self::Choice | Self::Float)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
