//! Error types for store operations.

use thiserror::Error;

/// Errors returned by [`AggregationStore`](crate::AggregationStore) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The device was not in the list the store was created with.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// Input rejected by the store itself. Range checks on upload values
    /// and timestamps belong to the request layer, so nothing returns this yet.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience alias for store results.
pub type StoreResult<T> = Result<T, StoreError>;
