//! Export error types.

use std::path::PathBuf;

use hpoa_model::{Column, RowId};
use thiserror::Error;

/// A working copy could not be serialized or written.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to {operation} {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The temp file was written but could not replace the target.
    #[error("failed to replace {target_path} with {temp_path}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The destination stream rejected a write.
    #[error("failed to write export output")]
    Write {
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write TSV")]
    Csv(#[source] csv::Error),

    #[error("failed to write JSON")]
    Json(#[source] serde_json::Error),

    #[error("row {row}: {column} contains a tab or line break")]
    InvalidCell { row: RowId, column: Column },
}

impl ExportError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Io { .. } | Self::AtomicWriteFailed { .. } | Self::Write { .. } => {
                Some("Check that the output directory exists and is writable.")
            }
            Self::InvalidCell { .. } => {
                Some("Edit the value to remove tabs and line breaks, or export as JSON.")
            }
            Self::Csv(_) | Self::Json(_) => None,
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(source: std::io::Error) -> Self {
        Self::Write { source }
    }
}

impl From<csv::Error> for ExportError {
    fn from(error: csv::Error) -> Self {
        if !error.is_io_error() {
            return Self::Csv(error);
        }
        match error.into_kind() {
            csv::ErrorKind::Io(source) => Self::Write { source },
            kind => Self::Write {
                source: std::io::Error::other(format!("{kind:?}")),
            },
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(error: serde_json::Error) -> Self {
        if error.is_io() {
            Self::Write {
                source: error.into(),
            }
        } else {
            Self::Json(error)
        }
    }
}
