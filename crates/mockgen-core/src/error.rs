use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a schema, before any generation.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A schema path was given and nothing exists there.
    #[error("schema not found: {}", path.display())]
    NotFound { path: PathBuf },
    /// The schema file exists but could not be read.
    #[error("failed to read schema {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The schema file is not a parseable JSON document.
    #[error("malformed schema document {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The document is not a mapping of field name to descriptor.
    #[error("invalid schema structure: {0}")]
    Structure(String),
    /// The derived JSON Schema failed meta-validation (strict mode only).
    #[error("schema failed meta-validation: {0}")]
    MetaValidation(String),
}

/// Errors raised when a descriptor is dispatched to a generation routine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("unsupported field kind '{kind}' for field '{path}'")]
    UnsupportedKind { path: String, kind: String },
    #[error("field '{path}' has no 'type' discriminator")]
    MissingKind { path: String },
    #[error("descriptor for field '{path}' must be a mapping")]
    NotAMapping { path: String },
    #[error("field '{path}' exceeds the maximum nesting depth of {max_depth}")]
    TooDeep { path: String, max_depth: usize },
}

impl DescriptorError {
    /// Dotted path of the field that failed to dispatch.
    pub fn path(&self) -> &str {
        match self {
            Self::UnsupportedKind { path, .. }
            | Self::MissingKind { path }
            | Self::NotAMapping { path }
            | Self::TooDeep { path, .. } => path,
        }
    }
}

/// Errors raised when checking generated records against their schema.
#[derive(Debug, Error)]
pub enum ConformanceError {
    #[error("failed to compile record schema: {0}")]
    Compile(String),
    #[error("record {index} does not conform at '{path}': {message}")]
    Violation {
        index: usize,
        path: String,
        message: String,
    },
}

/// Convenience alias for schema loading results.
pub type Result<T> = std::result::Result<T, SchemaError>;
