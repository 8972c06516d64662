//! Error kinds surfaced by the store.
//!
//! Only caller mistakes ([`StoreError::InvalidInput`]) and bad configuration
//! ([`StoreError::Configuration`]) ever reach a caller of a store operation.
//! Index and persistence failures are recovered inside the store and
//! reported through result fields instead.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Snapshot file could not be read or written.
    #[error("snapshot {action} failed at {}: {source}", path.display())]
    Persistence {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot file was readable but its contents were not usable.
    #[error("snapshot at {} is unusable: {reason}", path.display())]
    Snapshot { path: PathBuf, reason: String },

    /// Capacity, thresholds, or weighting parameters are invalid.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
