//! Preprocessing error types

use thiserror::Error;

/// Result type for the preprocessing pass
pub type PreprocessResult<T> = std::result::Result<T, PreprocessError>;

/// Errors raised by the preprocessing pass
///
/// Every error aborts the whole pass; a package that failed half-way must
/// not be expanded or saved.
#[derive(Debug, Error)]
pub enum PreprocessError {
    /// Worksheet part lacks `<sheetData>`
    #[error("Could not find sheet data for sheet at {path}")]
    SheetDataMissing { path: String },

    /// Worksheet part has no workbook/relationship entry
    #[error("Could not find sheet info for sheet at {path}")]
    SheetInfoNotFound { path: String },

    /// Row without a usable `r` attribute
    #[error("Expected row to contain a numeric r attribute in {path}, found {row:?}")]
    MalformedRow { path: String, row: Option<String> },

    /// Loop opened in a row without a matching close marker
    #[error("Unable to find end of loop (#each) in {path} on row {row}. {{{{/each}}}} is missing")]
    UnterminatedLoop { path: String, row: u32 },

    /// Second loop opened in a row
    #[error("Only one loop (#each) per row is supported; {path} opens another one at {cell} on row {row}")]
    NestedLoop { path: String, row: u32, cell: String },

    /// `{{#each` that is not a well-formed open marker
    #[error("Malformed loop (#each) marker in {path} at {cell}")]
    MalformedLoop { path: String, cell: String },

    /// Shared-string index with no table entry
    #[error("Unable to find shared string with index {index}")]
    SharedStringIndex { index: String },

    /// Cell with children but no recognizable value
    #[error("Expected value to be found in cell {cell}")]
    UnrecognizedCellValue { cell: String },

    /// Cell or range reference that does not parse
    #[error("Malformed cell reference: {0}")]
    MalformedReference(#[from] stencil_core::Error),

    /// `max_loop_expression_len` too large to build the loop-marker pattern
    #[error("Invalid loop marker pattern: {0}")]
    InvalidLoopPattern(#[from] regex::Error),

    /// Table part linked from a worksheet but absent from the package
    #[error("Table part {path} linked from {sheet} is missing")]
    TableNotFound { path: String, sheet: String },
}
