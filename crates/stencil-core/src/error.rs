//! Error types for stencil-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding coordinates
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Cell reference is not column letters followed by row digits
    #[error("Invalid cell reference '{reference}': {reason}")]
    InvalidReference {
        reference: String,
        reason: &'static str,
    },

    /// Row number outside 1..=MAX_ROWS
    #[error("Row {0} out of bounds (max: {1})")]
    RowOutOfBounds(u64, u32),

    /// Column number outside 1..=MAX_COLS
    #[error("Column {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(u64, u32),
}

impl Error {
    pub(crate) fn invalid(reference: &str, reason: &'static str) -> Self {
        Error::InvalidReference {
            reference: reference.to_string(),
            reason,
        }
    }
}
