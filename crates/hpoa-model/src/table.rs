#![deny(unsafe_code)]

use crate::{AnnotationRow, HeaderMetadata};

/// A parsed HPOA table as it came from its source.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AnnotationTable {
    /// Stable identifier of the input (path or caller-chosen name).
    pub source_id: String,
    pub metadata: HeaderMetadata,
    pub rows: Vec<AnnotationRow>,
    /// Lowercase hex sha256 of the source bytes, when read from bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

impl AnnotationTable {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            metadata: HeaderMetadata::new(),
            rows: Vec::new(),
            fingerprint: None,
        }
    }

    pub fn push_row(&mut self, row: AnnotationRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
