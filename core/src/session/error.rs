//! Error types for identity resolution and password auth

use thiserror::Error;

use crate::backend::BackendError;
use crate::storage::StorageError;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Form validation failures, checked before any request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CredentialsError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Invalid(#[from] CredentialsError),

    #[error("{}", .0.service_message())]
    Service(#[from] BackendError),
}

/// The device identifier could not be read or persisted.
#[derive(Debug, Error)]
#[error("failed to resolve device identifier")]
pub struct IdentityError(#[source] pub StorageError);
