use std::io::Write;

use hpoa_core::WorkingCopy;
use hpoa_model::AnnotationRecord;

use crate::error::ExportError;

/// Write `copy` as a pretty-printed JSON array, one object per row with keys
/// in column order.
pub fn write_json<W: Write>(copy: &WorkingCopy, mut writer: W) -> Result<(), ExportError> {
    let records: Vec<&AnnotationRecord> = copy.rows().map(|row| &row.record).collect();
    serde_json::to_writer_pretty(&mut writer, &records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
