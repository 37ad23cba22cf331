use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use std::time::Instant;

use mockgen_core::{FieldMap, Record, load_and_validate, load_and_validate_strict, validate_records};
use mockgen_generate::{ExportFormat, ExportOptions, GenerationEngine, export};
use tracing::{debug, info};

use crate::config::{CliConfig, Overrides};
use crate::logging::init_logging;
use crate::{CliError, GenerateArgs, ValidateArgs};

pub fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let config = CliConfig::load(args.common.config.as_deref())?;
    init_logging(args.common.verbose, args.common.log_json.as_deref())?;

    let overrides = Overrides {
        strict: args.strict,
        max_depth: args.max_depth,
        locale: args.locale,
        format: args.format,
        table_name: args.table_name.clone(),
    };
    let options = config.generate_options(&overrides);
    let format = config.export_format(&overrides);
    let export_options = config.export_options(&overrides);
    let max_depth = options.max_depth;

    let timer = Instant::now();
    info!(
        event = "run_started",
        schema = %args.schema.display(),
        count = args.count,
        format = %format,
        "loading schema"
    );

    let fields = load_fields(&args.schema, options.strict, max_depth)?;
    let result = GenerationEngine::new(options).run(&fields, args.count, args.seed)?;

    if args.check {
        validate_records(&fields, &result.records, max_depth)?;
        info!(event = "records_checked", records = result.records.len(), "records conform");
    }

    let bytes_written = write_records(&result.records, format, args.out.as_deref(), &export_options)?;

    if let Some(path) = args.report.as_deref() {
        create_parent_dir(path)?;
        let encoded = serde_json::to_vec_pretty(&result.report)?;
        std::fs::write(path, encoded).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "report written");
    }

    info!(
        event = "run_finished",
        run_id = %result.report.run_id,
        records = result.records.len(),
        bytes_written,
        duration_ms = timer.elapsed().as_millis() as u64,
        "done"
    );
    Ok(())
}

pub fn run_validate(args: ValidateArgs) -> Result<(), CliError> {
    let config = CliConfig::load(args.common.config.as_deref())?;
    init_logging(args.common.verbose, args.common.log_json.as_deref())?;

    let overrides = Overrides {
        max_depth: args.max_depth,
        ..Overrides::default()
    };
    let max_depth = config.generate_options(&overrides).max_depth;
    let fields = load_fields(&args.schema, args.strict, max_depth)?;
    info!(event = "schema_valid", fields = fields.len(), strict = args.strict);
    println!(
        "{}: valid schema with {} field(s)",
        args.schema.display(),
        fields.len()
    );
    Ok(())
}

fn load_fields(path: &Path, strict: bool, max_depth: usize) -> Result<FieldMap, CliError> {
    let fields = if strict {
        load_and_validate_strict(path, max_depth)?
    } else {
        load_and_validate(path)?
    };
    debug!(fields = fields.len(), strict, "schema loaded");
    Ok(fields)
}

fn write_records(
    records: &[Record],
    format: ExportFormat,
    out: Option<&Path>,
    options: &ExportOptions,
) -> Result<u64, CliError> {
    let written = match out {
        Some(path) => {
            create_parent_dir(path)?;
            let file = File::create(path).map_err(|source| CliError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            export(records, format, BufWriter::new(file), options)?
        }
        None => export(records, format, io::stdout().lock(), options)?,
    };
    Ok(written)
}

fn create_parent_dir(path: &Path) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| CliError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}
