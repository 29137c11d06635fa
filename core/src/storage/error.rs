//! Error types for local key-value storage

use thiserror::Error;

/// Errors from the device's persistent key-value storage
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("local storage is unavailable")]
    Unavailable,

    #[error("failed to read key {key}: {reason}")]
    Read { key: String, reason: String },

    #[error("failed to write key {key}: {reason}")]
    Write { key: String, reason: String },

    #[error("failed to decode stored value for {key}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
