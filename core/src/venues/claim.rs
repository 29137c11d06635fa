//! Stamp claiming: write one visit row, then settle local state.
//!
//! The insert and the local update are split so callers never hold a borrow
//! of the store across the network round trip.

use passport_types::{NewVisit, UserId, Venue, VenueId};
use tracing::{error, info};

use super::{ClaimError, VenueStore};
use crate::backend::VenueBackend;
use crate::notice::Notice;

/// Opens a URL in a new browsing context (`window.open(url, "_blank")`).
pub trait LinkOpener {
    fn open_in_new_context(&self, url: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// Visit row created
    Claimed {
        venue_id: VenueId,
        landing_url: String,
    },
    /// The store already had a visit for this (user, venue)
    AlreadyVisited { venue_id: VenueId },
    /// No user identifier yet; nothing was written
    Withheld,
}

/// Insert a visit for (user, venue).
///
/// A uniqueness conflict is the expected `AlreadyVisited` outcome, not an error.
pub async fn claim_stamp<B>(
    backend: &B,
    user: Option<&UserId>,
    venue: &Venue,
) -> Result<ClaimOutcome, ClaimError>
where
    B: VenueBackend + ?Sized,
{
    let Some(user) = user else {
        return Ok(ClaimOutcome::Withheld);
    };

    let visit = NewVisit {
        user_id: user.clone(),
        venue_id: venue.id.clone(),
    };

    match backend.insert_visit(&visit).await {
        Ok(()) => {
            info!(user_id = %user, venue_id = %venue.id, "Stamp claimed");
            Ok(ClaimOutcome::Claimed {
                venue_id: venue.id.clone(),
                landing_url: venue.landing_url.clone(),
            })
        }
        Err(e) if e.is_unique_violation() => {
            info!(user_id = %user, venue_id = %venue.id, "Stamp already claimed");
            Ok(ClaimOutcome::AlreadyVisited {
                venue_id: venue.id.clone(),
            })
        }
        Err(source) => {
            error!(user_id = %user, venue_id = %venue.id, error = %source, "Claim failed");
            Err(ClaimError {
                venue_id: venue.id.clone(),
                source,
            })
        }
    }
}

impl ClaimOutcome {
    /// Apply the outcome: a new claim joins the visited set and opens the
    /// landing page. Returns the notice to show, if any.
    pub fn settle(&self, store: &mut VenueStore, opener: &impl LinkOpener) -> Option<Notice> {
        match self {
            ClaimOutcome::Claimed {
                venue_id,
                landing_url,
            } => {
                store.mark_visited(venue_id);
                opener.open_in_new_context(landing_url);
                None
            }
            ClaimOutcome::AlreadyVisited { .. } => Some(Notice::already_visited()),
            ClaimOutcome::Withheld => None,
        }
    }

    pub fn is_claimed(&self) -> bool {
        matches!(self, ClaimOutcome::Claimed { .. })
    }
}
