use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown annotation column: {0}")]
    UnknownColumn(String),
    #[error("invalid row id: {0}")]
    InvalidRowId(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
