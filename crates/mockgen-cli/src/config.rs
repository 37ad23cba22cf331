use std::path::{Path, PathBuf};

use mockgen_core::DEFAULT_MAX_DEPTH;
use mockgen_generate::output::DEFAULT_TABLE_NAME;
use mockgen_generate::{ExportFormat, ExportOptions, GenerateOptions, LocaleKey};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "mockgen.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Contents of `mockgen.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub generate: GenerateSection,
    pub export: ExportSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateSection {
    pub strict: Option<bool>,
    pub max_depth: Option<usize>,
    pub locale: Option<LocaleKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportSection {
    pub format: Option<ExportFormat>,
    pub table_name: Option<String>,
}

/// Values given on the command line; `None` defers to the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub strict: bool,
    pub max_depth: Option<usize>,
    pub locale: Option<LocaleKey>,
    pub format: Option<ExportFormat>,
    pub table_name: Option<String>,
}

impl CliConfig {
    /// Read an explicit config file, or `./mockgen.toml` if one exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn generate_options(&self, overrides: &Overrides) -> GenerateOptions {
        GenerateOptions {
            strict: overrides.strict || self.generate.strict.unwrap_or(false),
            max_depth: overrides
                .max_depth
                .or(self.generate.max_depth)
                .unwrap_or(DEFAULT_MAX_DEPTH),
            locale: overrides
                .locale
                .or(self.generate.locale)
                .unwrap_or_default(),
        }
    }

    pub fn export_format(&self, overrides: &Overrides) -> ExportFormat {
        overrides
            .format
            .or(self.export.format)
            .unwrap_or(ExportFormat::Json)
    }

    pub fn export_options(&self, overrides: &Overrides) -> ExportOptions {
        let table_name = overrides
            .table_name
            .clone()
            .or_else(|| self.export.table_name.clone())
            .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string());
        ExportOptions { table_name }
    }
}
