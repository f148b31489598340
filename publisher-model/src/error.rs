use std::fmt::{self, Display};

/// Errors produced by model constructors and parsing routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    InvalidSort(String),
    InvalidPageSize(u32),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidSort(token) => {
                write!(f, "invalid sort direction: {token} (expected ASC or DESC)")
            }
            ModelError::InvalidPageSize(size) => {
                write!(f, "invalid page size: {size} (must be positive)")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
