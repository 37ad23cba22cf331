mod config;
mod logging;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use mockgen_core::{ConformanceError, SchemaError};
use mockgen_generate::{ExportError, ExportFormat, GenerationError, LocaleKey};
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("generated records failed the schema check: {0}")]
    Conformance(#[from] ConformanceError),
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "mockgen", version, about = "Schema-driven mock data generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate records from a schema file.
    Generate(GenerateArgs),
    /// Check that a schema file is well formed.
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Path to the JSON schema file.
    #[arg(long, short = 's')]
    schema: PathBuf,
    /// Number of records to generate. Zero or negative yields no records.
    #[arg(long, short = 'n', default_value_t = 1, allow_negative_numbers = true)]
    count: i64,
    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// Output file (default: stdout).
    #[arg(long, short = 'o')]
    out: Option<PathBuf>,
    /// Output format: json, ndjson, csv or sql.
    #[arg(long, short = 'f', value_parser = parse_format)]
    format: Option<ExportFormat>,
    /// Table name for SQL output.
    #[arg(long)]
    table_name: Option<String>,
    /// Fail instead of emitting null for fields that cannot be generated.
    #[arg(long, default_value_t = false)]
    strict: bool,
    /// Locale for realistic string values (en_US, pt_BR).
    #[arg(long, value_parser = LocaleKey::from_str)]
    locale: Option<LocaleKey>,
    /// Maximum nesting depth for objects and arrays.
    #[arg(long)]
    max_depth: Option<usize>,
    /// Check generated records against the schema before writing them.
    #[arg(long, default_value_t = false)]
    check: bool,
    /// Write the generation report as JSON to this path.
    #[arg(long)]
    report: Option<PathBuf>,
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Path to the JSON schema file.
    #[arg(long, short = 's')]
    schema: PathBuf,
    /// Also validate against the JSON Schema meta-specification.
    #[arg(long, default_value_t = false)]
    strict: bool,
    /// Maximum nesting depth for objects and arrays.
    #[arg(long)]
    max_depth: Option<usize>,
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Config file (default: ./mockgen.toml if present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Enable debug logging.
    #[arg(long, short = 'v', default_value_t = false)]
    verbose: bool,
    /// Append JSON logs to this file.
    #[arg(long, value_name = "PATH")]
    log_json: Option<PathBuf>,
}

fn parse_format(value: &str) -> Result<ExportFormat, String> {
    value.parse().map_err(|err: ExportError| err.to_string())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Generate(args) => run::run_generate(args),
        Command::Validate(args) => run::run_validate(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("mockgen: {err}");
            ExitCode::FAILURE
        }
    }
}
