//! Passport summary: progress counts and the stamp grid.

use passport_types::{Venue, VenueId};

use crate::map::venue_glyph;
use crate::venues::VenueStore;

const MAX_TILT_DEG: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassportSummary {
    pub collected: usize,
    pub total: usize,
}

impl PassportSummary {
    pub fn from_store(store: &VenueStore) -> Self {
        Self {
            collected: store.visited_count(),
            total: store.total(),
        }
    }

    /// Collected share in percent; 0 when there are no venues.
    pub fn progress_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.collected as f64 / self.total as f64 * 100.0
        }
    }

    /// "collected/total"
    pub fn label(&self) -> String {
        format!("{}/{}", self.collected, self.total)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stamp<'a> {
    pub venue: &'a Venue,
    pub collected: bool,
    pub glyph: &'static str,
    /// Rotation applied to collected stamps, in degrees
    pub tilt_deg: f64,
}

/// One stamp per venue, in venue order.
pub fn stamps(store: &VenueStore) -> Vec<Stamp<'_>> {
    store
        .venues()
        .iter()
        .map(|venue| {
            let collected = store.is_visited(&venue.id);
            Stamp {
                venue,
                collected,
                glyph: venue_glyph(&venue.name),
                tilt_deg: if collected { stamp_tilt(&venue.id) } else { 0.0 },
            }
        })
        .collect()
}

/// Stable tilt in [-3, 3] degrees so stamps don't jiggle on re-render.
fn stamp_tilt(id: &VenueId) -> f64 {
    // FNV-1a
    let hash = id
        .as_str()
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325u64, |acc, b| {
            (acc ^ b as u64).wrapping_mul(0x0100_0000_01b3)
        });
    let unit = (hash % 10_001) as f64 / 10_000.0;
    (unit * 2.0 - 1.0) * MAX_TILT_DEG
}
