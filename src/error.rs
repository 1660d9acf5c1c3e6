//! Error types for the board.

use thiserror::Error;

/// Main error type for board operations.
///
/// Validation errors abort before any mutation: when one is returned, the
/// record store and index are untouched. A search that matches nothing is
/// not an error (see [`crate::types::SearchOutcome`]).
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("at least one handoff value is required")]
    EmptyKeyList,

    #[error("at least one channel must be selected")]
    NoChannels,

    #[error("required field is empty: {0}")]
    MissingField(&'static str),

    #[error("row index {index} out of range (active rows: {len})")]
    RowOutOfRange { index: usize, len: usize },

    #[error("import text has no data rows")]
    EmptyImport,

    #[error("no records to export")]
    NoRecords,

    #[error("operation aborted")]
    Aborted,
}

/// Result type for board operations.
pub type Result<T> = std::result::Result<T, BoardError>;
