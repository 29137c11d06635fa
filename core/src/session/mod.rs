//! Session provider: who is collecting stamps.
//!
//! Resolution is an explicit step run once at startup ([`resolve_session`]);
//! the resulting [`SessionState`] is handed to the UI and replaced on sign-in
//! or sign-out. Writes are only allowed while [`SessionState::user_id`] is
//! `Some`.

mod auth;
mod device;
mod error;

pub use auth::{AuthFlow, AuthMode, CONFIRMATION_SENT, Credentials};
pub use device::resolve_device_id;
pub use error::{AuthError, CredentialsError, IdentityError, MIN_PASSWORD_LEN};

use passport_types::{AuthSession, IdentityMode, UserId};
use tracing::warn;

use crate::backend::IdentityBackend;
use crate::config::AppConfig;
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Resolution has not finished
    #[default]
    Pending,
    /// Device identifier in anonymous mode
    Device(UserId),
    /// Authenticated mode without a session; the login form is shown
    SignedOut,
    SignedIn(AuthSession),
    /// Identity could not be resolved; claims stay disabled
    Unavailable(String),
}

impl SessionState {
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            SessionState::Device(id) => Some(id),
            SessionState::SignedIn(session) => Some(&session.user.id),
            _ => None,
        }
    }

    pub fn auth_session(&self) -> Option<&AuthSession> {
        match self {
            SessionState::SignedIn(session) => Some(session),
            _ => None,
        }
    }

    pub fn needs_login(&self) -> bool {
        matches!(self, SessionState::SignedOut)
    }

    pub fn can_claim(&self) -> bool {
        self.user_id().is_some()
    }
}

/// Resolve the startup session for the configured identity mode.
pub fn resolve_session<B, S>(config: &AppConfig, backend: &B, store: &S) -> SessionState
where
    B: IdentityBackend + ?Sized,
    S: KeyValueStore + ?Sized,
{
    match config.identity {
        IdentityMode::Anonymous => match resolve_device_id(store, &config.storage.device_id) {
            Ok(id) => SessionState::Device(id),
            Err(e) => {
                warn!(error = %e, "Device identity unavailable, claims disabled");
                SessionState::Unavailable(e.to_string())
            }
        },
        IdentityMode::Authenticated => {
            match AuthFlow::new(backend, store, &config.storage).restore_session() {
                Some(session) => SessionState::SignedIn(session),
                None => SessionState::SignedOut,
            }
        }
    }
}
