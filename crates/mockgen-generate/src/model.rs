use std::collections::BTreeMap;

use mockgen_core::{DEFAULT_MAX_DEPTH, DescriptorIssue};
use serde::{Deserialize, Serialize};

use crate::faker_rs::LocaleKey;

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Fail the whole call when a field descriptor cannot be dispatched.
    /// When false the field is emitted as `null` in every record.
    pub strict: bool,
    /// Maximum nesting depth for object fields and array elements.
    pub max_depth: usize,
    /// Locale for realistic string values.
    pub locale: LocaleKey,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            strict: false,
            max_depth: DEFAULT_MAX_DEPTH,
            locale: LocaleKey::EnUs,
        }
    }
}

/// Structured generation issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationIssue {
    pub level: String,
    pub code: String,
    pub message: String,
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<u64>,
}

impl GenerationIssue {
    pub fn warning(code: &str, path: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            level: "warning".to_string(),
            code: code.to_string(),
            message: message.into(),
            path: path.map(str::to_string),
            record: None,
        }
    }

    pub fn at_record(mut self, index: u64) -> Self {
        self.record = Some(index);
        self
    }
}

impl From<DescriptorIssue> for GenerationIssue {
    fn from(issue: DescriptorIssue) -> Self {
        Self::warning(issue.code, Some(&issue.path), issue.message)
    }
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub seed: Option<u64>,
    pub records_requested: i64,
    pub records_generated: u64,
    pub kind_usage: BTreeMap<String, u64>,
    pub fallback_count: u64,
    pub placeholder_count: u64,
    pub warnings_by_code: BTreeMap<String, u64>,
    pub warnings: Vec<GenerationIssue>,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String, seed: Option<u64>, records_requested: i64) -> Self {
        Self {
            run_id,
            seed,
            records_requested,
            records_generated: 0,
            kind_usage: BTreeMap::new(),
            fallback_count: 0,
            placeholder_count: 0,
            warnings_by_code: BTreeMap::new(),
            warnings: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn record_kind_usage(&mut self, kind: &str) {
        *self.kind_usage.entry(kind.to_string()).or_insert(0) += 1;
    }

    pub fn record_fallback(&mut self) {
        self.fallback_count += 1;
    }

    pub fn record_placeholder(&mut self) {
        self.placeholder_count += 1;
    }

    pub fn record_warning(&mut self, issue: GenerationIssue) {
        *self.warnings_by_code.entry(issue.code.clone()).or_insert(0) += 1;
        self.warnings.push(issue);
    }
}
