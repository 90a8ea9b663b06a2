use thiserror::Error;

use crate::summary::RunSummary;

/// Failures reported by a [`crate::TableHost`].
#[derive(Debug, Error)]
pub enum TableError {
    #[error("table \"{0}\" not found")]
    TableNotFound(String),

    #[error("field \"{field}\" not found in table \"{table}\"")]
    FieldNotFound { table: String, field: String },

    /// Storage-specific failure (I/O, serialization, remote API).
    #[error("table backend error: {0}")]
    Backend(String),
}

/// Run-level errors. Per-record failures never surface here; they are
/// recorded in the [`crate::RunSummary`] instead.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("run cancelled")]
    Cancelled,

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("pagination limit reached for table \"{table}\" after {max_pages} pages")]
    PaginationLimit { table: String, max_pages: usize },

    #[error("invalid run request: {0}")]
    InvalidRequest(String),

    /// A batched write failed; the run stops at that batch. `summary` holds
    /// the counts up to the failure, including batches already written.
    #[error("writing batch {batch} failed: {source}")]
    Flush {
        batch: usize,
        #[source]
        source: TableError,
        summary: Box<RunSummary>,
    },
}
