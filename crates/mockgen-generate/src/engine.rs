use std::time::Instant;

use mockgen_core::{FieldDescriptor, FieldMap, Record, RecordSequence};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::GenerationError;
use crate::faker_rs::{FakerSource, LocaleKey};
use crate::generators::{GeneratorContext, GeneratorRegistry, generate_value};
use crate::model::{GenerateOptions, GenerationIssue, GenerationReport};

const VALUE_STREAM: &str = "values";
const REALISTIC_STREAM: &str = "realistic";
const MAX_PREALLOCATED_RECORDS: usize = 1 << 16;

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub records: RecordSequence,
    pub report: GenerationReport,
}

/// Random sources owned by one generation call.
#[derive(Debug, Clone)]
pub struct GeneratorState {
    pub rng: ChaCha8Rng,
    pub source: FakerSource,
}

impl GeneratorState {
    /// Both streams derived from `seed`, so equal seeds give equal output.
    pub fn seeded(seed: u64, locale: LocaleKey) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(hash_seed(seed, VALUE_STREAM)),
            source: FakerSource::seeded(locale, hash_seed(seed, REALISTIC_STREAM)),
        }
    }

    pub fn from_entropy(locale: LocaleKey) -> Self {
        let mut entropy = rand::rng();
        Self {
            rng: ChaCha8Rng::from_rng(&mut entropy),
            source: FakerSource::new(locale, ChaCha8Rng::from_rng(&mut entropy)),
        }
    }

    pub fn new(seed: Option<u64>, locale: LocaleKey) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed, locale),
            None => Self::from_entropy(locale),
        }
    }
}

/// Entry point for generating records from a field map.
#[derive(Debug, Clone, Default)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Generate `max(count, 0)` records.
    pub fn generate(
        &self,
        fields: &FieldMap,
        count: i64,
        seed: Option<u64>,
    ) -> Result<RecordSequence, GenerationError> {
        self.run(fields, count, seed).map(|result| result.records)
    }

    pub fn run(
        &self,
        fields: &FieldMap,
        count: i64,
        seed: Option<u64>,
    ) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let mut report = GenerationReport::new(run_id.clone(), seed, count);

        info!(
            run_id = %run_id,
            fields = fields.len(),
            count,
            seed,
            strict = self.options.strict,
            locale = %self.options.locale,
            "generation started"
        );

        if count <= 0 {
            debug!(run_id = %run_id, count, "non-positive count; nothing to generate");
            return Ok(self.finish(Vec::new(), report, start));
        }

        let mut state = GeneratorState::new(seed, self.options.locale);
        let registry = GeneratorRegistry::new(self.options.max_depth);
        let prepared = self.prepare(fields, &registry, &state.source, &mut report)?;

        let total = u64::try_from(count).unwrap_or(0);
        let capacity = usize::try_from(count)
            .unwrap_or(MAX_PREALLOCATED_RECORDS)
            .min(MAX_PREALLOCATED_RECORDS);
        let mut records = Vec::with_capacity(capacity);

        for _ in 0..total {
            let mut record = Record::new();
            let mut ctx = GeneratorContext {
                rng: &mut state.rng,
                source: &mut state.source,
                report: &mut report,
            };
            for (name, descriptor) in &prepared {
                let value = match descriptor {
                    Some(descriptor) => generate_value(descriptor, &mut ctx),
                    None => {
                        ctx.report.record_placeholder();
                        Value::Null
                    }
                };
                record.insert(name.clone(), value);
            }
            records.push(record);
        }

        Ok(self.finish(records, report, start))
    }

    /// Parse every top-level descriptor once. `None` marks a placeholder field.
    fn prepare(
        &self,
        fields: &FieldMap,
        registry: &GeneratorRegistry,
        source: &FakerSource,
        report: &mut GenerationReport,
    ) -> Result<Vec<(String, Option<FieldDescriptor>)>, GenerationError> {
        let mut prepared = Vec::with_capacity(fields.len());
        for (name, raw) in fields.iter() {
            match registry.prepare(name, raw, source, report) {
                Ok(descriptor) => prepared.push((name.to_string(), Some(descriptor))),
                Err(err) if self.options.strict => {
                    warn!(
                        run_id = %report.run_id,
                        path = err.path(),
                        error = %err,
                        "generation aborted"
                    );
                    return Err(err.into());
                }
                Err(err) => {
                    warn!(
                        path = err.path(),
                        error = %err,
                        "field emitted as null placeholder"
                    );
                    report.record_warning(GenerationIssue::warning(
                        "field_placeholder",
                        Some(err.path()),
                        err.to_string(),
                    ));
                    prepared.push((name.to_string(), None));
                }
            }
        }
        Ok(prepared)
    }

    fn finish(
        &self,
        records: RecordSequence,
        mut report: GenerationReport,
        start: Instant,
    ) -> GenerationResult {
        report.records_generated = records.len() as u64;
        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            run_id = %report.run_id,
            records = report.records_generated,
            fallback_count = report.fallback_count,
            placeholder_count = report.placeholder_count,
            duration_ms = report.duration_ms,
            "generation completed"
        );
        GenerationResult { records, report }
    }
}

/// Derive an independent stream seed from a base seed and a label.
pub fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}
