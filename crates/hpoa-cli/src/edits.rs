//! Parsing of `--set` and `--remove` arguments.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use hpoa_core::WorkingCopy;
use hpoa_model::RowId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditArgError {
    #[error("'{0}' is not ROW:FIELD=VALUE")]
    Malformed(String),

    #[error("'{0}' is neither a row id nor a row number")]
    InvalidRow(String),

    #[error("row number {number} is out of range (1-{len})")]
    RowOutOfRange { number: usize, len: usize },
}

/// A row given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRef {
    Id(RowId),
    /// 1-based position in the working copy.
    Number(usize),
}

impl RowRef {
    pub fn resolve(self, copy: &WorkingCopy) -> Result<RowId, EditArgError> {
        match self {
            RowRef::Id(id) => Ok(id),
            RowRef::Number(number) => copy
                .rows()
                .nth(number.wrapping_sub(1))
                .map(|row| row.id)
                .ok_or(EditArgError::RowOutOfRange {
                    number,
                    len: copy.len(),
                }),
        }
    }
}

impl FromStr for RowRef {
    type Err = EditArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(number) = s.parse::<usize>()
            && number > 0
            && s.len() < 32
        {
            return Ok(RowRef::Number(number));
        }
        s.parse::<RowId>()
            .map(RowRef::Id)
            .map_err(|_| EditArgError::InvalidRow(s.to_string()))
    }
}

impl fmt::Display for RowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowRef::Id(id) => write!(f, "{id}"),
            RowRef::Number(number) => write!(f, "#{number}"),
        }
    }
}

/// One `--set ROW:FIELD=VALUE` argument. The value may itself contain `:`
/// and `=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellAssignment {
    pub row: RowRef,
    pub field: String,
    pub value: String,
}

impl FromStr for CellAssignment {
    type Err = EditArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || EditArgError::Malformed(s.to_string());
        let (row, rest) = s.split_once(':').ok_or_else(malformed)?;
        let (field, value) = rest.split_once('=').ok_or_else(malformed)?;
        let field = field.trim();
        if field.is_empty() {
            return Err(malformed());
        }
        Ok(Self {
            row: row.parse()?,
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}
