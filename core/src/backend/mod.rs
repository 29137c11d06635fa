//! Hosted backend access.
//!
//! [`VenueBackend`] covers the two tables the client touches, and
//! [`IdentityBackend`] the password auth endpoints. [`rest::RestClient`] talks
//! to the hosted service. Unit tests run against an in-process backend that
//! enforces the same (user, venue) uniqueness constraint.

mod error;
#[cfg(test)]
pub(crate) mod memory;
pub mod rest;

pub use error::{BackendError, UNIQUE_VIOLATION};
#[cfg(test)]
pub(crate) use memory::MemoryBackend;
pub use rest::RestClient;

use passport_types::{AuthSession, NewVisit, UserId, Venue, VenueId};

/// Read and write access to `venues` and `user_visits`.
///
/// Futures are not required to be `Send`; the browser client is single-threaded.
#[allow(async_fn_in_trait)]
pub trait VenueBackend {
    /// All rows of `venues`.
    async fn fetch_venues(&self) -> Result<Vec<Venue>, BackendError>;

    /// `venue_id` of every `user_visits` row for the user.
    async fn fetch_visited_venue_ids(&self, user: &UserId) -> Result<Vec<VenueId>, BackendError>;

    /// Insert one visit. A duplicate (user, venue) pair fails with an error for
    /// which [`BackendError::is_unique_violation`] is true.
    async fn insert_visit(&self, visit: &NewVisit) -> Result<(), BackendError>;
}

/// Email + password identity service.
#[allow(async_fn_in_trait)]
pub trait IdentityBackend {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, BackendError>;

    /// Register an account. The service emails a confirmation link that
    /// redirects to `redirect_to`.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: &str,
    ) -> Result<(), BackendError>;

    async fn sign_out(&self, session: &AuthSession) -> Result<(), BackendError>;
}
