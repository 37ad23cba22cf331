use std::io::Write;

use mockgen_core::Record;
use serde_json::Value;

use crate::errors::ExportCause;
use crate::output::{ExportFormat, header_columns, warn_dropped_keys};

/// Write records as CSV with the header fixed from the first record.
///
/// Keys missing from a record produce empty cells; keys that only appear in
/// later records are dropped.
pub fn write_csv<W: Write>(records: &[Record], writer: &mut W) -> Result<(), ExportCause> {
    let columns = header_columns(records);
    warn_dropped_keys(ExportFormat::Csv, &columns, records);

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    writer.write_record(&columns)?;
    for record in records {
        let row: Vec<String> = columns
            .iter()
            .map(|column| record.get(*column).map(cell).unwrap_or_default())
            .collect();
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
