//! Reader for the tab-separated `phenotype.hpoa` layout.
//!
//! An HPOA file starts with `#` comment lines carrying release metadata,
//! followed by one header row and the annotation records:
//!
//! ```text
//! #description: "HPO annotations for rare diseases"
//! #version: 2025-05-06
//! database_id	disease_name	qualifier	hpo_id	reference	evidence	onset	...
//! OMIM:301500	Fabry disease		HP:0000963	OMIM:301500	IEA		...
//! ```
//!
//! Every value is read as text, exactly as written; empty fields are
//! missing values. Only the leading comment block is metadata: a `#` in a
//! later line is data.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use sha2::Digest;
use tracing::{debug, info};

use hpoa_model::{AnnotationRecord, AnnotationRow, AnnotationTable, Column, RowId};

use crate::LoadError;

/// Load an HPOA file from disk. The path doubles as the source id.
pub fn load_path(path: &Path) -> Result<AnnotationTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::io(path, source))?;
    let source_id = path.display().to_string();
    let mut reader = BufReader::new(file);
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|source| LoadError::io(path, source))?;
    load_bytes(&bytes, &source_id)
}

/// Load an HPOA table from any reader.
pub fn load_reader<R: Read>(mut reader: R, source_id: &str) -> Result<AnnotationTable, LoadError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|source| LoadError::io(source_id, source))?;
    load_bytes(&bytes, source_id)
}

/// Load from raw bytes and record their sha256 as the table fingerprint.
pub fn load_bytes(bytes: &[u8], source_id: &str) -> Result<AnnotationTable, LoadError> {
    let text = std::str::from_utf8(bytes).map_err(|_| LoadError::Encoding {
        source_id: source_id.to_string(),
    })?;
    let mut table = read_hpoa_str(text, source_id)?;
    table.fingerprint = Some(hex::encode(sha2::Sha256::digest(bytes)));
    Ok(table)
}

/// Parse HPOA text. No fingerprint is attached.
pub fn read_hpoa_str(text: &str, source_id: &str) -> Result<AnnotationTable, LoadError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut table = AnnotationTable::new(source_id);

    // Leading comment block; the first non-blank, non-comment line is the header.
    let mut offset = 0usize;
    let mut preamble_lines = 0u64;
    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches(['\r', '\n']);
        if content.starts_with('#') {
            table.metadata.push(content);
        } else if !content.trim().is_empty() {
            break;
        }
        offset += line.len();
        preamble_lines += 1;
    }
    debug!(
        source = source_id,
        metadata_lines = table.metadata.lines().len(),
        "read header metadata"
    );

    let body = &text[offset..];
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .quoting(false)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|error| csv_error(source_id, preamble_lines, &error))?
        .clone();
    if headers.iter().all(|name| name.trim().is_empty()) {
        return Err(LoadError::Empty {
            source_id: source_id.to_string(),
        });
    }
    let positions = resolve_columns(&headers, source_id)?;

    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|error| csv_error(source_id, preamble_lines, &error))?;
        let values: [String; Column::COUNT] = std::array::from_fn(|column_idx| {
            record
                .get(positions[column_idx])
                .unwrap_or_default()
                .to_string()
        });
        let record_number = (idx as u64) + 1;
        table.push_row(AnnotationRow::new(
            RowId::derive(source_id, record_number),
            AnnotationRecord::from_values(values),
        ));
    }

    info!(
        source = source_id,
        rows = table.rows.len(),
        "loaded annotation table"
    );
    Ok(table)
}

/// Map each [`Column`] to its field position in the header.
fn resolve_columns(
    headers: &StringRecord,
    source_id: &str,
) -> Result<[usize; Column::COUNT], LoadError> {
    let mut positions: [Option<usize>; Column::COUNT] = [None; Column::COUNT];
    for (idx, name) in headers.iter().enumerate() {
        let column: Column = name.parse().map_err(|_| LoadError::UnknownColumn {
            source_id: source_id.to_string(),
            name: name.trim().to_string(),
        })?;
        let slot = &mut positions[column.index()];
        if slot.is_some() {
            return Err(LoadError::DuplicateColumn {
                source_id: source_id.to_string(),
                column,
            });
        }
        *slot = Some(idx);
    }

    let mut resolved = [0usize; Column::COUNT];
    for column in Column::ALL {
        resolved[column.index()] =
            positions[column.index()].ok_or_else(|| LoadError::MissingColumn {
                source_id: source_id.to_string(),
                column,
            })?;
    }
    Ok(resolved)
}

fn csv_error(source_id: &str, line_offset: u64, error: &csv::Error) -> LoadError {
    if let csv::ErrorKind::UnequalLengths {
        pos,
        expected_len,
        len,
    } = error.kind()
    {
        return LoadError::FieldCount {
            source_id: source_id.to_string(),
            line: line_offset + pos.as_ref().map_or(0, csv::Position::line),
            expected: *expected_len as usize,
            found: *len as usize,
        };
    }
    LoadError::Csv {
        source_id: source_id.to_string(),
        line: line_offset + error.position().map_or(0, csv::Position::line),
        message: error.to_string(),
    }
}
