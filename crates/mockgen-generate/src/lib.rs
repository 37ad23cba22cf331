//! Schema-driven record generation for mockgen.
//!
//! This crate turns a validated field map into reproducible records and
//! serializes them as JSON, NDJSON, CSV or SQL.

pub mod engine;
pub mod errors;
pub mod faker_rs;
pub mod generators;
pub mod model;
pub mod output;
pub mod smart;

pub use engine::{GenerationEngine, GenerationResult, GeneratorState, hash_seed};
pub use errors::{ExportCause, ExportError, GenerationError};
pub use faker_rs::{FakerSource, LocaleKey, ValueSource};
pub use generators::{GeneratorContext, GeneratorRegistry};
pub use model::{GenerateOptions, GenerationIssue, GenerationReport};
pub use output::{ExportFormat, ExportOptions, export, export_named};
pub use smart::{
    CompletionClient, CompletionError, CompletionRequest, ModelOutput, SmartGenerator,
    SmartOutcome, parse_model_output,
};
