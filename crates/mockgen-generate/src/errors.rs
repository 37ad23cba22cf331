use mockgen_core::DescriptorError;
use thiserror::Error;

use crate::output::ExportFormat;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors emitted while serializing records.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Raised before anything is written.
    #[error("unsupported export format '{0}' (expected json, ndjson, csv or sql)")]
    UnsupportedFormat(String),
    /// Output already flushed to the sink before the failure is not retracted.
    #[error("{format} export failed: {source}")]
    Failed {
        format: ExportFormat,
        #[source]
        source: ExportCause,
    },
}

impl ExportError {
    pub fn failed(format: ExportFormat, source: impl Into<ExportCause>) -> Self {
        Self::Failed {
            format,
            source: source.into(),
        }
    }
}

/// Underlying cause of a failed export.
#[derive(Debug, Error)]
pub enum ExportCause {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
