//! Backend client module
//!
//! Binds the core flows to the browser (local storage, page origin) and to
//! the current session's bearer token, so components only deal with
//! outcomes and notices.

use passport_core::backend::RestClient;
use passport_core::session::{AuthError, AuthFlow, Credentials, SessionState, resolve_session};
use passport_core::types::{AuthSession, Venue};
use passport_core::{AppConfig, BackendError, ClaimError, ClaimOutcome, LoadError, VenueStore};

use crate::browser::{self, BrowserStorage};

/// Shared backend handle, provided through context at the app root.
#[derive(Debug, Clone)]
pub struct Backend {
    client: RestClient,
    config: AppConfig,
}

/// Two handles are the same backend when built from the same configuration.
impl PartialEq for Backend {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
    }
}

impl Backend {
    pub fn new(config: AppConfig) -> Result<Self, BackendError> {
        let client = RestClient::from_config(&config.backend)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn client_for(&self, session: &SessionState) -> RestClient {
        self.client.with_session(session.auth_session())
    }

    fn auth(&self) -> AuthFlow<'_, RestClient, BrowserStorage> {
        AuthFlow::new(&self.client, &BrowserStorage, &self.config.storage)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────

    /// Startup identity: device id or restored auth session.
    pub fn resolve_session(&self) -> SessionState {
        resolve_session(&self.config, &self.client, &BrowserStorage)
    }

    pub fn remembered_email(&self) -> Option<String> {
        self.auth().remembered_email()
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, AuthError> {
        self.auth().sign_in(credentials).await
    }

    /// Confirmation links redirect back to this origin's callback path.
    pub async fn register(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let redirect = self.config.auth_redirect(&browser::page_origin());
        self.auth().register(credentials, &redirect).await
    }

    pub async fn sign_out(&self, session: &AuthSession) {
        self.auth().sign_out(session).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Venues
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn load_venues(&self, session: &SessionState) -> Result<VenueStore, LoadError> {
        VenueStore::load(&self.client_for(session), session.user_id()).await
    }

    pub async fn claim(
        &self,
        session: &SessionState,
        venue: &Venue,
    ) -> Result<ClaimOutcome, ClaimError> {
        passport_core::claim_stamp(&self.client_for(session), session.user_id(), venue).await
    }
}
