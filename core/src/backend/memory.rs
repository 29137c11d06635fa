//! In-process backend for the unit tests.
//!
//! Mirrors the hosted store's behaviour that the client depends on: a unique
//! (user_id, venue_id) constraint reported as SQLSTATE 23505, and password
//! accounts that must exist before sign-in. Failures can be injected per
//! operation.

use std::cell::{Cell, RefCell};

use chrono::Utc;
use passport_types::{AuthSession, AuthUser, NewVisit, UserId, Venue, VenueId, Visit};

use super::{BackendError, IdentityBackend, UNIQUE_VIOLATION, VenueBackend};

#[derive(Debug, Clone)]
struct Account {
    email: String,
    password: String,
    user: AuthUser,
}

/// Operations that can be made to fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailureSwitches {
    pub venues: bool,
    pub visits: bool,
    pub insert: bool,
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    venues: RefCell<Vec<Venue>>,
    visits: RefCell<Vec<Visit>>,
    accounts: RefCell<Vec<Account>>,
    next_id: Cell<u64>,
    failures: Cell<FailureSwitches>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_venues(venues: Vec<Venue>) -> Self {
        let backend = Self::new();
        *backend.venues.borrow_mut() = venues;
        backend
    }

    pub fn set_failures(&self, failures: FailureSwitches) {
        self.failures.set(failures);
    }

    /// Register a confirmed account directly, bypassing the email flow.
    pub fn add_account(&self, email: &str, password: &str) -> UserId {
        let user = AuthUser {
            id: UserId::new(format!("user-{}", self.bump())),
            email: Some(email.to_string()),
        };
        let id = user.id.clone();
        self.accounts.borrow_mut().push(Account {
            email: email.to_string(),
            password: password.to_string(),
            user,
        });
        id
    }

    pub fn visits(&self) -> Vec<Visit> {
        self.visits.borrow().clone()
    }

    pub fn visit_count(&self) -> usize {
        self.visits.borrow().len()
    }

    fn bump(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    fn injected(endpoint: &str) -> BackendError {
        BackendError::Status {
            endpoint: endpoint.to_string(),
            status: 500,
            code: None,
            message: "injected failure".to_string(),
        }
    }
}

impl VenueBackend for MemoryBackend {
    async fn fetch_venues(&self) -> Result<Vec<Venue>, BackendError> {
        if self.failures.get().venues {
            return Err(Self::injected("venues"));
        }
        Ok(self.venues.borrow().clone())
    }

    async fn fetch_visited_venue_ids(&self, user: &UserId) -> Result<Vec<VenueId>, BackendError> {
        if self.failures.get().visits {
            return Err(Self::injected("user_visits"));
        }
        Ok(self
            .visits
            .borrow()
            .iter()
            .filter(|v| &v.user_id == user)
            .map(|v| v.venue_id.clone())
            .collect())
    }

    async fn insert_visit(&self, visit: &NewVisit) -> Result<(), BackendError> {
        if self.failures.get().insert {
            return Err(Self::injected("user_visits"));
        }

        let exists = self
            .visits
            .borrow()
            .iter()
            .any(|v| v.user_id == visit.user_id && v.venue_id == visit.venue_id);
        if exists {
            return Err(BackendError::Status {
                endpoint: "user_visits".to_string(),
                status: 409,
                code: Some(UNIQUE_VIOLATION.to_string()),
                message: "duplicate key value violates unique constraint".to_string(),
            });
        }

        let id = format!("visit-{}", self.bump());
        self.visits.borrow_mut().push(Visit {
            id,
            user_id: visit.user_id.clone(),
            venue_id: visit.venue_id.clone(),
            created_at: Utc::now(),
        });
        Ok(())
    }
}

impl IdentityBackend for MemoryBackend {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, BackendError> {
        let accounts = self.accounts.borrow();
        let account = accounts
            .iter()
            .find(|a| a.email == email && a.password == password)
            .ok_or_else(|| BackendError::Status {
                endpoint: "auth/token".to_string(),
                status: 400,
                code: Some("invalid_credentials".to_string()),
                message: "Invalid login credentials".to_string(),
            })?;

        Ok(AuthSession {
            access_token: format!("token-{}", account.user.id),
            refresh_token: None,
            user: account.user.clone(),
        })
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        _redirect_to: &str,
    ) -> Result<(), BackendError> {
        if self.accounts.borrow().iter().any(|a| a.email == email) {
            return Err(BackendError::Status {
                endpoint: "auth/signup".to_string(),
                status: 422,
                code: Some("user_already_exists".to_string()),
                message: "User already registered".to_string(),
            });
        }
        self.add_account(email, password);
        Ok(())
    }

    async fn sign_out(&self, _session: &AuthSession) -> Result<(), BackendError> {
        Ok(())
    }
}
