//! Error types for the venue read and claim paths

use passport_types::VenueId;
use thiserror::Error;

use crate::backend::BackendError;
use crate::notice::Notice;

/// The venue list could not be fetched.
#[derive(Debug, Error)]
#[error("failed to load venues")]
pub struct LoadError(#[source] pub BackendError);

impl LoadError {
    pub fn notice(&self) -> Notice {
        Notice::load_failed()
    }
}

/// A visit insert failed for a reason other than the row already existing.
#[derive(Debug, Error)]
#[error("failed to record visit for venue {venue_id}")]
pub struct ClaimError {
    pub venue_id: VenueId,
    #[source]
    pub source: BackendError,
}

impl ClaimError {
    pub fn notice(&self) -> Notice {
        Notice::claim_failed()
    }
}
