//! HPOA tab-separated writer.
//!
//! Output mirrors the input layout: `#` metadata lines, one header row, then
//! one line per annotation. HPOA has no quoting, so values containing a tab
//! or line break are rejected instead of escaped.

use std::io::Write;

use csv::{QuoteStyle, WriterBuilder};

use hpoa_core::WorkingCopy;
use hpoa_model::{AnnotationRow, Column};

use crate::error::ExportError;
use crate::format::ExportOptions;

/// Metadata key of the provenance line.
pub const PROVENANCE_KEY: &str = "source-sha256";

/// Write `copy` as HPOA TSV.
pub fn write_tsv<W: Write>(
    copy: &WorkingCopy,
    mut writer: W,
    options: &ExportOptions,
) -> Result<(), ExportError> {
    for row in copy.rows() {
        check_row(row)?;
    }

    for line in copy.metadata().lines() {
        writeln!(writer, "#{line}")?;
    }
    if options.include_provenance
        && !copy.metadata().contains_key(PROVENANCE_KEY)
        && let Some(fingerprint) = copy.fingerprint()
    {
        writeln!(writer, "#{PROVENANCE_KEY}: {fingerprint}")?;
    }

    let mut tsv = WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Never)
        .has_headers(false)
        .from_writer(writer);
    tsv.write_record(Column::ALL.map(Column::name))?;
    for row in copy.rows() {
        tsv.write_record(row.record.values())?;
    }
    tsv.flush()?;
    Ok(())
}

fn check_row(row: &AnnotationRow) -> Result<(), ExportError> {
    match row
        .record
        .iter()
        .find(|(_, value)| value.contains(['\t', '\n', '\r']))
    {
        Some((column, _)) => Err(ExportError::InvalidCell { row: row.id, column }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hpoa_core::MasterTable;
    use hpoa_model::{AnnotationRecord, AnnotationTable, RowId};

    fn copy_with(value: &str) -> WorkingCopy {
        let mut table = AnnotationTable::new("t.hpoa");
        table.push_row(AnnotationRow::new(
            RowId::derive("t.hpoa", 1),
            AnnotationRecord::new().with(Column::Modifier, value),
        ));
        WorkingCopy::from_master(&MasterTable::from_table(table))
    }

    #[test]
    fn rejects_embedded_tabs() {
        let copy = copy_with("HP:0025303\tHP:0031796");
        let err = write_tsv(&copy, Vec::new(), &ExportOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            ExportError::InvalidCell {
                column: Column::Modifier,
                ..
            }
        ));
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::StorageFull, "disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn stream_failures_are_write_errors() {
        let copy = copy_with("");
        let err = write_tsv(&copy, FullDisk, &ExportOptions::default()).unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }), "{err:?}");
        assert!(err.suggestion().is_some());

        let err = crate::json::write_json(&copy, FullDisk).unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }), "{err:?}");
    }

    #[test]
    fn nothing_is_written_for_a_rejected_copy() {
        let copy = copy_with("line\nbreak");
        let mut out = Vec::new();
        assert!(write_tsv(&copy, &mut out, &ExportOptions::default()).is_err());
        assert!(out.is_empty());
    }
}
