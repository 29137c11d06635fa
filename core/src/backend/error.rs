//! Error types for hosted backend requests

use thiserror::Error;

/// PostgreSQL `unique_violation`, reported when a (user, venue) visit exists.
pub const UNIQUE_VIOLATION: &str = "23505";

/// Errors talking to the hosted auth / table service
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid backend url '{url}'")]
    InvalidUrl { url: String },

    #[error("request to {endpoint} failed")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        /// Service error code (PostgREST SQLSTATE or auth error code)
        code: Option<String>,
        message: String,
    },

    #[error("failed to decode response from {endpoint}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

impl BackendError {
    /// True when the store rejected an insert because the row already exists.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            BackendError::Status { status, code, .. } => {
                code.as_deref() == Some(UNIQUE_VIOLATION) || *status == 409
            }
            _ => false,
        }
    }

    /// Message suitable for showing to the user (auth form errors).
    pub fn service_message(&self) -> String {
        match self {
            BackendError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
