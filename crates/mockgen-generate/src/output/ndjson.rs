use std::io::Write;

use mockgen_core::Record;

use crate::errors::ExportCause;

pub fn write_ndjson<W: Write>(records: &[Record], writer: &mut W) -> Result<(), ExportCause> {
    for record in records {
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}
