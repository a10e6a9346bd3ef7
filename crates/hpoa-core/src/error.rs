use hpoa_model::RowId;
use thiserror::Error;

/// A rejected edit. The working copy is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("row {row} not found in working copy")]
    RowNotFound { row: RowId },

    #[error("'{field}' is not an annotation column")]
    UnknownField { field: String },

    #[error("row {row} already exists in working copy")]
    DuplicateRow { row: RowId },
}

/// A suggestion batch that could not be parsed.
#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error("suggestion batch is not valid JSON")]
    Json(#[from] serde_json::Error),

    #[error("suggestion {index}: '{field}' is not an annotation column")]
    UnknownField { index: usize, field: String },

    #[error("suggestion {index}: unknown status '{status}'")]
    UnknownStatus { index: usize, status: String },

    #[error("suggestion {index}: field '{field}' must be a string, number, or null")]
    InvalidValue { index: usize, field: String },
}

impl EditError {
    /// A hint for resolving the error, when one applies.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::RowNotFound { .. } => Some("Row numbers and full row ids are listed by `hpoa view`."),
            Self::UnknownField { .. } => Some(
                "Fields are the HPOA columns: database_id, disease_name, qualifier, hpo_id, \
                 reference, evidence, onset, frequency, sex, modifier, aspect, biocuration.",
            ),
            Self::DuplicateRow { .. } => None,
        }
    }
}

impl SuggestionError {
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Json(_) => Some(
                "Expected a JSON array of annotations, or an object with an `annotations` array.",
            ),
            Self::UnknownStatus { .. } => Some("Status must be one of: added, changed, removed."),
            Self::UnknownField { .. } | Self::InvalidValue { .. } => None,
        }
    }
}
