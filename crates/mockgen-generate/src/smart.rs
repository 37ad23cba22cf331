//! Natural-language-guided generation through an external completion service.
//!
//! Only the request/response contract lives here. Model output that is not a
//! JSON record or array of records is surfaced as text, and an unreachable
//! service degrades to algorithmic generation.

use mockgen_core::{FieldMap, RecordSequence};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::engine::GenerationEngine;
use crate::errors::GenerationError;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;

const SYSTEM_PROMPT: &str = "You generate realistic synthetic test data. \
Reply with a JSON array of objects only, with no commentary and no Markdown.";

/// Errors reported by a completion service.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("model service unavailable: {0}")]
    Unavailable(String),
    #[error("completion failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
}

/// A text-completion service.
pub trait CompletionClient {
    fn model_name(&self) -> &str;

    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

/// Interpretation of free-form model text.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput {
    Records(RecordSequence),
    Text(String),
}

/// Parse model text as records; anything else is returned as text.
pub fn parse_model_output(text: &str) -> ModelOutput {
    let body = strip_code_fence(text);
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(record)) => ModelOutput::Records(vec![record]),
        Ok(Value::Array(items)) if items.iter().all(Value::is_object) => ModelOutput::Records(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(record) => Some(record),
                    _ => None,
                })
                .collect(),
        ),
        _ => ModelOutput::Text(text.to_string()),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening fence line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[derive(Debug, Clone, PartialEq)]
pub enum SmartOutcome {
    /// Records parsed from the model's reply.
    Model(RecordSequence),
    /// The model replied with something other than records.
    Text(String),
    /// The service failed; records come from the algorithmic engine.
    Fallback {
        records: RecordSequence,
        reason: String,
    },
}

pub struct SmartGenerator<C> {
    client: C,
    engine: GenerationEngine,
    temperature: f32,
}

impl<C: CompletionClient> SmartGenerator<C> {
    pub fn new(client: C, engine: GenerationEngine) -> Self {
        Self {
            client,
            engine,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn build_request(
        &self,
        fields: &FieldMap,
        count: i64,
        context: Option<&str>,
    ) -> Result<CompletionRequest, GenerationError> {
        let schema = serde_json::to_string_pretty(fields)?;
        let mut user = format!(
            "Generate {count} records as a JSON array. Each record must follow this field schema:\n{schema}"
        );
        if let Some(context) = context.filter(|context| !context.trim().is_empty()) {
            user.push_str("\n\nContext: ");
            user.push_str(context);
        }
        Ok(CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            user,
            temperature: self.temperature,
        })
    }

    pub fn generate(
        &self,
        fields: &FieldMap,
        count: i64,
        context: Option<&str>,
        seed: Option<u64>,
    ) -> Result<SmartOutcome, GenerationError> {
        if count <= 0 {
            return Ok(SmartOutcome::Model(Vec::new()));
        }

        let request = self.build_request(fields, count, context)?;
        info!(model = self.client.model_name(), count, "requesting model completion");
        match self.client.complete(&request) {
            Ok(text) => Ok(match parse_model_output(&text) {
                ModelOutput::Records(records) => SmartOutcome::Model(records),
                ModelOutput::Text(text) => {
                    warn!(model = self.client.model_name(), "model reply is not JSON records");
                    SmartOutcome::Text(text)
                }
            }),
            Err(err) => {
                warn!(
                    model = self.client.model_name(),
                    error = %err,
                    "model unavailable; falling back to algorithmic generation"
                );
                let records = self.engine.generate(fields, count, seed)?;
                Ok(SmartOutcome::Fallback {
                    records,
                    reason: err.to_string(),
                })
            }
        }
    }
}
