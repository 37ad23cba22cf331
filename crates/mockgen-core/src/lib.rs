//! Schema model and validation for mockgen.
//!
//! This crate defines the field map, record types, the recursive descriptor
//! sum type, and the validators shared by the generator and the CLI.

pub mod conformance;
pub mod descriptor;
pub mod error;
pub mod kind;
pub mod schema;
pub mod validation;

pub use conformance::{record_schema, validate_records};
pub use descriptor::{
    ArraySpec, ChoiceSpec, DEFAULT_MAX_DEPTH, DescriptorIssue, DescriptorParser, ElementSpec,
    FieldDescriptor, FloatSpec, IntegerSpec, ObjectSpec, StringSpec,
};
pub use error::{ConformanceError, DescriptorError, Result, SchemaError};
pub use kind::FieldKind;
pub use schema::{FieldMap, Record, RecordSequence};
pub use validation::{
    SchemaSource, derive_json_schema, load_and_validate, load_and_validate_strict,
    validate_strict,
};
