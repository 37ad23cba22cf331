//! Field generator registry.
//!
//! Raw descriptors are prepared once into [`FieldDescriptor`]s; every liberal
//! fallback taken while preparing is logged and recorded in the report.
//! Generating from a prepared descriptor cannot fail.

pub mod composite;
pub mod primitives;

use mockgen_core::{
    DescriptorError, DescriptorParser, ElementSpec, FieldDescriptor, StringSpec,
};
use rand::RngCore;
use serde_json::Value;
use tracing::warn;

use crate::faker_rs::ValueSource;
use crate::model::{GenerationIssue, GenerationReport};

/// Mutable state threaded through one value's generation.
pub struct GeneratorContext<'a> {
    pub rng: &'a mut dyn RngCore,
    pub source: &'a mut dyn ValueSource,
    pub report: &'a mut GenerationReport,
}

/// Maps descriptors to their generation routines.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneratorRegistry {
    parser: DescriptorParser,
}

impl GeneratorRegistry {
    pub fn new(max_depth: usize) -> Self {
        Self {
            parser: DescriptorParser::new(max_depth),
        }
    }

    /// Parse a field's raw descriptor and record every fallback it implies.
    pub fn prepare(
        &self,
        name: &str,
        raw: &Value,
        source: &dyn ValueSource,
        report: &mut GenerationReport,
    ) -> Result<FieldDescriptor, DescriptorError> {
        let mut issues = Vec::new();
        let descriptor = self.parser.parse(name, raw, &mut issues)?;

        let mut fallbacks: Vec<GenerationIssue> = issues.into_iter().map(Into::into).collect();
        collect_unknown_hints(&descriptor, name, source, &mut fallbacks);
        for issue in fallbacks {
            warn!(
                code = %issue.code,
                path = issue.path.as_deref().unwrap_or(name),
                message = %issue.message,
                "descriptor fallback"
            );
            report.record_fallback();
            report.record_warning(issue);
        }

        Ok(descriptor)
    }

    /// Produce exactly one value for a raw descriptor.
    pub fn generate(
        &self,
        name: &str,
        raw: &Value,
        ctx: &mut GeneratorContext<'_>,
    ) -> Result<Value, DescriptorError> {
        let descriptor = self.prepare(name, raw, &*ctx.source, ctx.report)?;
        Ok(generate_value(&descriptor, ctx))
    }
}

/// Produce one value for a prepared descriptor.
pub fn generate_value(descriptor: &FieldDescriptor, ctx: &mut GeneratorContext<'_>) -> Value {
    ctx.report.record_kind_usage(descriptor.kind().as_str());
    match descriptor {
        FieldDescriptor::Uuid => primitives::uuid_value(ctx),
        FieldDescriptor::Choice(spec) => primitives::choice_value(spec, ctx),
        FieldDescriptor::Float(spec) => primitives::float_value(spec, ctx),
        FieldDescriptor::Integer(spec) => primitives::integer_value(spec, ctx),
        FieldDescriptor::String(spec) => primitives::string_value(spec, ctx),
        FieldDescriptor::Object(spec) => composite::object_value(spec, ctx),
        FieldDescriptor::Array(spec) => composite::array_value(spec, ctx),
    }
}

fn collect_unknown_hints(
    descriptor: &FieldDescriptor,
    path: &str,
    source: &dyn ValueSource,
    issues: &mut Vec<GenerationIssue>,
) {
    match descriptor {
        FieldDescriptor::String(StringSpec {
            generator: Some(hint),
        }) if !source.supports(hint) => {
            issues.push(GenerationIssue::warning(
                "unknown_value_hint",
                Some(path),
                format!("unknown generator '{hint}'; using random words"),
            ));
        }
        FieldDescriptor::Object(spec) => {
            for (name, child) in &spec.fields {
                collect_unknown_hints(child, &format!("{path}.{name}"), source, issues);
            }
        }
        FieldDescriptor::Array(spec) => {
            if let ElementSpec::Generated(element) = &spec.elements {
                collect_unknown_hints(element, &format!("{path}[]"), source, issues);
            }
        }
        _ => {}
    }
}
