//! Errors raised while loading an HPOA source.

use std::path::PathBuf;

use hpoa_model::Column;
use thiserror::Error;

/// The source is missing or malformed.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{source_id} is not valid UTF-8")]
    Encoding { source_id: String },

    #[error("{source_id} has no header row")]
    Empty { source_id: String },

    #[error("failed to parse {source_id} at line {line}: {message}")]
    Csv {
        source_id: String,
        line: u64,
        message: String,
    },

    #[error("{source_id}: unknown column '{name}' in header")]
    UnknownColumn { source_id: String, name: String },

    #[error("{source_id}: column '{column}' appears more than once in header")]
    DuplicateColumn { source_id: String, column: Column },

    #[error("{source_id}: required column '{column}' is missing from header")]
    MissingColumn { source_id: String, column: Column },

    #[error("{source_id}: line {line} has {found} fields, expected {expected}")]
    FieldCount {
        source_id: String,
        line: u64,
        expected: usize,
        found: usize,
    },
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// A hint for resolving the error, when one applies.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Io { .. } => Some("Check that the file exists and is readable."),
            Self::Encoding { .. } => Some("Re-save the file as UTF-8."),
            Self::Empty { .. } => {
                Some("The file needs a tab-separated header row after the '#' comment lines.")
            }
            Self::UnknownColumn { .. } | Self::DuplicateColumn { .. } | Self::MissingColumn { .. } => {
                Some(
                    "Expected columns: database_id, disease_name, qualifier, hpo_id, reference, \
                     evidence, onset, frequency, sex, modifier, aspect, biocuration.",
                )
            }
            Self::Csv { .. } | Self::FieldCount { .. } => {
                Some("Fields must be separated by single tab characters.")
            }
        }
    }
}
