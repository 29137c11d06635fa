//! Email + password sign-in and registration.

use passport_types::AuthSession;
use tracing::{info, warn};

use super::{AuthError, CredentialsError, MIN_PASSWORD_LEN};
use crate::backend::IdentityBackend;
use crate::config::StorageKeys;
use crate::storage::{KeyValueStore, load_json, store_json};

/// Shown after a successful registration request.
pub const CONFIRMATION_SENT: &str = "Check your email for a confirmation link!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        }
    }
}

/// Contents of the login / registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    /// Only checked in [`AuthMode::Register`]
    pub confirm_password: String,
    pub remember_me: bool,
}

impl Credentials {
    pub fn validate(&self, mode: AuthMode) -> Result<(), CredentialsError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(CredentialsError::MissingFields);
        }
        if mode == AuthMode::Register && self.password != self.confirm_password {
            return Err(CredentialsError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(CredentialsError::PasswordTooShort);
        }
        Ok(())
    }
}

/// Ties the identity service to local persistence of the session and the
/// remembered email.
pub struct AuthFlow<'a, B: ?Sized, S: ?Sized> {
    backend: &'a B,
    store: &'a S,
    keys: &'a StorageKeys,
}

impl<'a, B, S> AuthFlow<'a, B, S>
where
    B: IdentityBackend + ?Sized,
    S: KeyValueStore + ?Sized,
{
    pub fn new(backend: &'a B, store: &'a S, keys: &'a StorageKeys) -> Self {
        Self {
            backend,
            store,
            keys,
        }
    }

    /// Email saved by a previous "remember me" sign-in.
    pub fn remembered_email(&self) -> Option<String> {
        self.store
            .get(&self.keys.remembered_email)
            .ok()
            .flatten()
            .filter(|e| !e.is_empty())
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, AuthError> {
        credentials.validate(AuthMode::Login)?;

        let session = self
            .backend
            .sign_in_with_password(&credentials.email, &credentials.password)
            .await?;

        let remembered = if credentials.remember_me {
            self.store
                .set(&self.keys.remembered_email, &credentials.email)
        } else {
            self.store.remove(&self.keys.remembered_email)
        };
        if let Err(e) = remembered {
            warn!(error = %e, "Failed to update remembered email");
        }
        if let Err(e) = store_json(self.store, &self.keys.auth_session, &session) {
            warn!(error = %e, "Failed to persist auth session");
        }

        info!(user_id = %session.user.id, "Signed in");
        Ok(session)
    }

    /// Request an account. The service sends a confirmation email; the user
    /// signs in after following the link.
    pub async fn register(
        &self,
        credentials: &Credentials,
        redirect_to: &str,
    ) -> Result<(), AuthError> {
        credentials.validate(AuthMode::Register)?;
        self.backend
            .sign_up(&credentials.email, &credentials.password, redirect_to)
            .await?;
        info!("Registration requested, awaiting email confirmation");
        Ok(())
    }

    /// Session persisted by an earlier sign-in, if it is still readable.
    pub fn restore_session(&self) -> Option<AuthSession> {
        match load_json(self.store, &self.keys.auth_session) {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Discarding unreadable auth session");
                let _ = self.store.remove(&self.keys.auth_session);
                None
            }
        }
    }

    /// Forget the local session. Revoking it remotely is best effort.
    pub async fn sign_out(&self, session: &AuthSession) {
        if let Err(e) = self.backend.sign_out(session).await {
            warn!(error = %e, "Remote sign-out failed");
        }
        if let Err(e) = self.store.remove(&self.keys.auth_session) {
            warn!(error = %e, "Failed to clear auth session");
        }
        info!(user_id = %session.user.id, "Signed out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::storage::MemoryStorage;

    fn creds(email: &str, password: &str, confirm: &str, remember: bool) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
            remember_me: remember,
        }
    }

    #[test]
    fn validation_order_and_messages() {
        let err = creds("", "secret1", "", false).validate(AuthMode::Login);
        assert_eq!(err, Err(CredentialsError::MissingFields));
        assert_eq!(
            CredentialsError::MissingFields.to_string(),
            "Please fill in all fields"
        );

        let err = creds("a@b.c", "secret1", "secret2", false).validate(AuthMode::Register);
        assert_eq!(err, Err(CredentialsError::PasswordMismatch));

        let err = creds("a@b.c", "abc", "abc", false).validate(AuthMode::Register);
        assert_eq!(err, Err(CredentialsError::PasswordTooShort));
        assert_eq!(
            CredentialsError::PasswordTooShort.to_string(),
            "Password must be at least 6 characters"
        );

        // Confirmation is ignored when signing in
        assert!(creds("a@b.c", "secret1", "", false)
            .validate(AuthMode::Login)
            .is_ok());
    }

    #[tokio::test]
    async fn sign_in_persists_session_and_remembers_email() {
        let backend = MemoryBackend::new();
        let user_id = backend.add_account("a@b.c", "secret1");
        let store = MemoryStorage::new();
        let keys = StorageKeys::default();
        let flow = AuthFlow::new(&backend, &store, &keys);

        let session = flow
            .sign_in(&creds("a@b.c", "secret1", "", true))
            .await
            .unwrap();
        assert_eq!(session.user.id, user_id);
        assert_eq!(flow.remembered_email().as_deref(), Some("a@b.c"));
        assert_eq!(flow.restore_session(), Some(session.clone()));

        flow.sign_out(&session).await;
        assert!(flow.restore_session().is_none());
        assert_eq!(flow.remembered_email().as_deref(), Some("a@b.c"));
    }

    #[tokio::test]
    async fn sign_in_without_remember_clears_email() {
        let backend = MemoryBackend::new();
        backend.add_account("a@b.c", "secret1");
        let store = MemoryStorage::new();
        let keys = StorageKeys::default();
        store.set(&keys.remembered_email, "old@b.c").unwrap();
        let flow = AuthFlow::new(&backend, &store, &keys);

        flow.sign_in(&creds("a@b.c", "secret1", "", false))
            .await
            .unwrap();
        assert!(flow.remembered_email().is_none());
    }

    #[tokio::test]
    async fn wrong_password_surfaces_service_message() {
        let backend = MemoryBackend::new();
        backend.add_account("a@b.c", "secret1");
        let store = MemoryStorage::new();
        let keys = StorageKeys::default();
        let flow = AuthFlow::new(&backend, &store, &keys);

        let err = flow
            .sign_in(&creds("a@b.c", "secret2", "", false))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials");
        assert!(flow.restore_session().is_none());
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_backend() {
        let backend = MemoryBackend::new();
        let store = MemoryStorage::new();
        let keys = StorageKeys::default();
        let flow = AuthFlow::new(&backend, &store, &keys);

        let err = flow
            .register(&creds("a@b.c", "secret1", "secret9", false), "https://app/auth/callback")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::Invalid(CredentialsError::PasswordMismatch)
        ));

        flow.register(&creds("a@b.c", "secret1", "secret1", false), "https://app/auth/callback")
            .await
            .unwrap();
        let err = flow
            .register(&creds("a@b.c", "secret1", "secret1", false), "https://app/auth/callback")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User already registered");
    }

    #[test]
    fn corrupt_session_is_discarded() {
        let backend = MemoryBackend::new();
        let store = MemoryStorage::new();
        let keys = StorageKeys::default();
        store.set(&keys.auth_session, "{").unwrap();
        let flow = AuthFlow::new(&backend, &store, &keys);

        assert!(flow.restore_session().is_none());
        assert!(store.get(&keys.auth_session).unwrap().is_none());
    }
}
