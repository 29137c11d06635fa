//! Venue list and the current user's visited set.
//!
//! The visited set is a cache of the `user_visits` table. It is rebuilt in
//! full on every load and only grows in between, through successful claims.

mod claim;
mod error;

pub use claim::{ClaimOutcome, LinkOpener, claim_stamp};
pub use error::{ClaimError, LoadError};

use hashbrown::HashSet;
use passport_types::{UserId, Venue, VenueId};
use tracing::{info, warn};

use crate::backend::VenueBackend;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VenueStore {
    venues: Vec<Venue>,
    visited: HashSet<VenueId>,
    /// False for the placeholder store shown before the first fetch lands.
    loaded: bool,
}

impl VenueStore {
    pub fn from_parts(venues: Vec<Venue>, visited: impl IntoIterator<Item = VenueId>) -> Self {
        Self {
            venues,
            visited: visited.into_iter().collect(),
            loaded: true,
        }
    }

    /// Fetch all venues, then the user's visits.
    ///
    /// Without a user the visited set is empty. A failed visit fetch is
    /// treated as "no visits yet" and logged; only the venue fetch can fail
    /// the load.
    pub async fn load<B>(backend: &B, user: Option<&UserId>) -> Result<Self, LoadError>
    where
        B: VenueBackend + ?Sized,
    {
        let venues = backend.fetch_venues().await.map_err(LoadError)?;

        let visited = match user {
            Some(user) => match backend.fetch_visited_venue_ids(user).await {
                Ok(ids) => ids,
                Err(e) => {
                    warn!(user_id = %user, error = %e, "Visit fetch failed, showing no visits");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let store = Self::from_parts(venues, visited);
        info!(
            venues = store.total(),
            visited = store.visited_count(),
            "Venue store loaded"
        );
        Ok(store)
    }

    /// True once built from fetched data. `Default` gives an unloaded store.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn venues(&self) -> &[Venue] {
        &self.venues
    }

    pub fn visited(&self) -> &HashSet<VenueId> {
        &self.visited
    }

    pub fn total(&self) -> usize {
        self.venues.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn is_visited(&self, id: &VenueId) -> bool {
        self.visited.contains(id)
    }

    pub fn is_locked(&self, id: &VenueId) -> bool {
        !self.is_visited(id)
    }

    pub fn get(&self, id: &VenueId) -> Option<&Venue> {
        self.venues.iter().find(|v| &v.id == id)
    }

    /// Venue whose landing URL equals `payload` exactly.
    pub fn find_by_landing_url(&self, payload: &str) -> Option<&Venue> {
        self.venues.iter().find(|v| v.landing_url == payload)
    }

    /// Record a successful claim. Returns false if it was already visited.
    pub fn mark_visited(&mut self, id: &VenueId) -> bool {
        self.visited.insert(id.clone())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::venue;
    use super::*;
    use crate::backend::memory::{FailureSwitches, MemoryBackend};
    use passport_types::NewVisit;

    fn backend() -> MemoryBackend {
        MemoryBackend::with_venues(vec![
            venue("a", "https://x/a"),
            venue("b", "https://x/b"),
            venue("c", "https://x/c"),
        ])
    }

    #[tokio::test]
    async fn load_without_user_has_empty_visited_set() {
        let store = VenueStore::load(&backend(), None).await.unwrap();
        assert_eq!(store.total(), 3);
        assert_eq!(store.visited_count(), 0);
        assert!(store.venues().iter().all(|v| store.is_locked(&v.id)));
    }

    #[tokio::test]
    async fn load_reconstructs_visited_set_for_user() {
        let backend = backend();
        let user = UserId::new("u1");
        let other = UserId::new("u2");
        for (user_id, venue_id) in [(&user, "a"), (&user, "c"), (&other, "b")] {
            backend
                .insert_visit(&NewVisit {
                    user_id: user_id.clone(),
                    venue_id: venue_id.into(),
                })
                .await
                .unwrap();
        }

        let store = VenueStore::load(&backend, Some(&user)).await.unwrap();
        for v in store.venues() {
            assert_eq!(store.is_locked(&v.id), !store.visited().contains(&v.id));
        }
        assert!(store.is_visited(&"a".into()));
        assert!(store.is_locked(&"b".into()));
        assert!(store.is_visited(&"c".into()));
    }

    #[tokio::test]
    async fn venue_fetch_failure_is_a_load_error() {
        let backend = backend();
        backend.set_failures(FailureSwitches {
            venues: true,
            ..Default::default()
        });

        let err = VenueStore::load(&backend, Some(&UserId::new("u1")))
            .await
            .unwrap_err();
        assert_eq!(err.notice().message, crate::notice::LOAD_FAILED);
    }

    #[tokio::test]
    async fn visit_fetch_failure_is_tolerated() {
        let backend = backend();
        backend.set_failures(FailureSwitches {
            visits: true,
            ..Default::default()
        });

        let store = VenueStore::load(&backend, Some(&UserId::new("u1")))
            .await
            .unwrap();
        assert_eq!(store.total(), 3);
        assert_eq!(store.visited_count(), 0);
    }

    #[tokio::test]
    async fn only_fetched_stores_count_as_loaded() {
        assert!(!VenueStore::default().is_loaded());
        assert!(VenueStore::from_parts(Vec::new(), []).is_loaded());

        let store = VenueStore::load(&backend(), None).await.unwrap();
        assert!(store.is_loaded());
    }

    #[test]
    fn landing_url_lookup_is_exact() {
        let store = VenueStore::from_parts(vec![venue("a", "https://x/a")], []);
        assert_eq!(
            store.find_by_landing_url("https://x/a").map(|v| v.id.as_str()),
            Some("a")
        );
        assert!(store.find_by_landing_url("https://x/a/").is_none());
        assert!(store.find_by_landing_url(" https://x/a").is_none());
        assert!(store.find_by_landing_url("HTTPS://X/A").is_none());
    }

    #[test]
    fn mark_visited_only_grows() {
        let mut store = VenueStore::from_parts(
            vec![venue("a", "https://x/a"), venue("b", "https://x/b")],
            ["a".into()],
        );
        assert!(store.mark_visited(&"b".into()));
        assert!(!store.mark_visited(&"a".into()));
        assert_eq!(store.visited_count(), 2);
    }
}
