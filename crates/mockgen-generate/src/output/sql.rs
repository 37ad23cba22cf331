use std::io::Write;

use mockgen_core::Record;
use serde_json::Value;

use crate::errors::ExportCause;
use crate::output::{ExportFormat, header_columns, warn_dropped_keys};

/// One `INSERT INTO ... VALUES (...);` line per record.
///
/// Table and column identifiers are emitted verbatim.
pub fn write_sql<W: Write>(
    records: &[Record],
    table_name: &str,
    writer: &mut W,
) -> Result<(), ExportCause> {
    let columns = header_columns(records);
    warn_dropped_keys(ExportFormat::Sql, &columns, records);
    let column_list = columns.join(", ");

    for record in records {
        let values: Vec<String> = columns
            .iter()
            .map(|column| sql_literal(record.get(*column)))
            .collect();
        writeln!(
            writer,
            "INSERT INTO {table_name} ({column_list}) VALUES ({});",
            values.join(", ")
        )?;
    }
    Ok(())
}

fn sql_literal(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "NULL".to_string(),
        Some(Value::Bool(true)) => "TRUE".to_string(),
        Some(Value::Bool(false)) => "FALSE".to_string(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::String(text)) => quote(text),
        Some(composite) => quote(&composite.to_string()),
    }
}

fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}
