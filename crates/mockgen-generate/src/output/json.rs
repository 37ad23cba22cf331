use std::io::Write;

use mockgen_core::Record;

use crate::errors::ExportCause;

/// Pretty-printed array with two-space indent and a trailing newline.
/// Non-ASCII text is written unescaped.
pub fn write_json<W: Write>(records: &[Record], writer: &mut W) -> Result<(), ExportCause> {
    serde_json::to_writer_pretty(&mut *writer, records)?;
    writer.write_all(b"\n")?;
    Ok(())
}
