use std::env;
use std::io;
use std::path::PathBuf;

use mockgen_core::load_and_validate;
use mockgen_generate::{ExportFormat, ExportOptions, GenerateOptions, GenerationEngine, export};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let mut schema_path: Option<PathBuf> = None;
    let mut count = 3_i64;
    let mut seed: Option<u64> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--schema" => schema_path = args.next().map(PathBuf::from),
            "--count" => count = args.next().ok_or("missing --count value")?.parse()?,
            "--seed" => seed = Some(args.next().ok_or("missing --seed value")?.parse()?),
            _ => {
                if schema_path.is_none() {
                    schema_path = Some(PathBuf::from(arg));
                } else {
                    return Err("unexpected argument".into());
                }
            }
        }
    }

    let schema_path = schema_path.ok_or("missing --schema path")?;
    let fields = load_and_validate(schema_path)?;

    let engine = GenerationEngine::new(GenerateOptions::default());
    let result = engine.run(&fields, count, seed)?;

    export(
        &result.records,
        ExportFormat::Json,
        io::stdout().lock(),
        &ExportOptions::default(),
    )?;
    eprintln!("run_id={}", result.report.run_id);
    Ok(())
}
