/// Error types for the grid engine.
///
/// Query evaluation itself never fails: type mismatches resolve to `false`
/// for filters and to string comparison for sorting. Errors only arise while
/// constructing a grid (bad columns, bad configuration) and at the fetch
/// boundary of the infinite scroll controller.

use thiserror::Error;

/// Errors raised while building or configuring a grid.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("duplicate column key '{0}'")]
    DuplicateColumn(String),

    #[error("page size must be a positive integer")]
    InvalidPageSize,

    #[error("batch size must be a positive integer")]
    InvalidBatchSize,

    #[error("invalid grid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to decode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A failed page fetch.
///
/// The controller returns to `Idle` on any of these; whether and when to
/// retry is up to the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("page fetch failed: {0}")]
    Failed(String),

    #[error("page source unavailable")]
    Unavailable,
}

impl FetchError {
    pub fn failed(message: impl Into<String>) -> Self {
        FetchError::Failed(message.into())
    }
}
