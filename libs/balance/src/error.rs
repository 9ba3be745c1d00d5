//! Error types for placement and store operations.

use thiserror::Error;

/// Result type for store calls.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for placement operations.
pub type FarmResult<T> = Result<T, FarmError>;

/// Failures reported by a [`crate::PartitionStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store rejected or failed the call.
    #[error("store backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A stored record could not be decoded.
    #[error("corrupt record: {0}")]
    Corrupt(String),

    /// The store is not accepting calls.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Wraps any backend error.
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(err))
    }
}

/// Errors returned by [`crate::PartitionService`].
///
/// Evicting an unknown animal is not an error; see
/// [`crate::EvictOutcome::Missing`].
#[derive(Debug, Error)]
pub enum FarmError {
    /// A store call failed. The operation stopped at that step and earlier
    /// writes of the same call were not rolled back.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Internal bug: a precondition of the balancing algorithm did not hold.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl FarmError {
    /// Returns true if the failure came from the store.
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}
