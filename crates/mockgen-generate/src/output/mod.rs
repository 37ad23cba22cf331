//! Record serializers.
//!
//! Every format writes through a byte-counting wrapper around the caller's
//! sink. Empty input writes nothing, and neither do CSV or SQL when the
//! first record has no fields.

pub mod csv;
pub mod json;
pub mod ndjson;
pub mod sql;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use mockgen_core::Record;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::ExportError;

pub const DEFAULT_TABLE_NAME: &str = "my_table";

/// Supported output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// One pretty-printed JSON array.
    #[serde(alias = "structured-document")]
    Json,
    /// One compact JSON record per line.
    #[serde(alias = "jsonl", alias = "line-delimited")]
    Ndjson,
    /// Header row from the first record, then one row per record.
    #[serde(alias = "tabular")]
    Csv,
    /// One `INSERT` statement per record.
    #[serde(alias = "relational-statement")]
    Sql,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Json,
        ExportFormat::Ndjson,
        ExportFormat::Csv,
        ExportFormat::Sql,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Ndjson => "ndjson",
            Self::Csv => "csv",
            Self::Sql => "sql",
        }
    }

    /// Formats whose columns are fixed from the first record.
    pub fn is_columnar(self) -> bool {
        matches!(self, Self::Csv | Self::Sql)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "json" | "structured-document" => Ok(Self::Json),
            "ndjson" | "jsonl" | "line-delimited" => Ok(Self::Ndjson),
            "csv" | "tabular" => Ok(Self::Csv),
            "sql" | "relational-statement" => Ok(Self::Sql),
            _ => Err(ExportError::UnsupportedFormat(value.to_string())),
        }
    }
}

/// Options shared by all formats.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Target relation for SQL statements. Emitted verbatim.
    pub table_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
        }
    }
}

/// Serialize `records` to `sink`, returning the number of bytes written.
pub fn export<W: Write>(
    records: &[Record],
    format: ExportFormat,
    sink: W,
    options: &ExportOptions,
) -> Result<u64, ExportError> {
    if records.is_empty() {
        debug!(format = %format, "no records to export");
        return Ok(0);
    }
    if format.is_columnar() && header_columns(records).is_empty() {
        warn!(
            format = %format,
            records = records.len(),
            "first record has no fields; nothing to export"
        );
        return Ok(0);
    }

    let mut writer = CountingWriter::new(sink);
    let written = match format {
        ExportFormat::Json => json::write_json(records, &mut writer),
        ExportFormat::Ndjson => ndjson::write_ndjson(records, &mut writer),
        ExportFormat::Csv => csv::write_csv(records, &mut writer),
        ExportFormat::Sql => sql::write_sql(records, &options.table_name, &mut writer),
    };
    written
        .and_then(|()| writer.flush().map_err(Into::into))
        .map_err(|source| ExportError::failed(format, source))?;

    debug!(
        format = %format,
        records = records.len(),
        bytes_written = writer.bytes_written(),
        "records exported"
    );
    Ok(writer.bytes_written())
}

/// Like [`export`], with the format given by name.
pub fn export_named<W: Write>(
    records: &[Record],
    format: &str,
    sink: W,
    options: &ExportOptions,
) -> Result<u64, ExportError> {
    let format = format.parse()?;
    export(records, format, sink, options)
}

/// Keys of the first record, which fix the column order for tabular formats.
pub(crate) fn header_columns(records: &[Record]) -> Vec<&str> {
    records
        .first()
        .map(|record| record.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

/// Warn once about keys that later records carry beyond the fixed header.
pub(crate) fn warn_dropped_keys(format: ExportFormat, columns: &[&str], records: &[Record]) {
    let dropped: usize = records
        .iter()
        .map(|record| {
            record
                .keys()
                .filter(|key| !columns.contains(&key.as_str()))
                .count()
        })
        .sum();
    if dropped > 0 {
        warn!(
            format = %format,
            dropped,
            "keys absent from the first record were dropped"
        );
    }
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
