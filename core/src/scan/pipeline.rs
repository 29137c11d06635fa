//! QR capture state machine.
//!
//! ```text
//! Idle ─request_camera→ CameraRequested ─attach_stream(ticket)→ Streaming
//!   Streaming ─payload matches→ Found        (stream released)
//!   Streaming ─payload misses→ Resuming ─resume→ Streaming
//!   CameraRequested ─camera_failed→ Error ─request_camera→ CameraRequested
//!   any ─enter_manual→ ManualEntry           (stream released)
//!   any ─close / drop→ Stopped               (stream released)
//! ```
//!
//! The pipeline owns the camera stream. Every transition out of streaming
//! releases it. Each acquisition carries a [`CameraRequest`] ticket and only
//! the newest ticket may attach; a stream from a superseded request is
//! stopped immediately, so at most one stream is ever live.

use std::time::Duration;

use passport_types::Venue;
use tracing::{debug, info, warn};

use super::camera::{CameraError, CameraStream};
use crate::notice::INVALID_VENUE_URL;
use crate::venues::VenueStore;

#[derive(Debug, Clone, PartialEq)]
pub enum ScanPhase {
    /// Camera not started
    Idle,
    /// Waiting for the browser to grant a stream
    CameraRequested,
    /// Decoding a frame per animation frame
    Streaming,
    /// A code matched nothing; decoding resumes after the delay
    Resuming,
    /// A venue was recognised; the claim affordance is shown
    Found(Venue),
    /// Typed URL entry, camera released
    ManualEntry,
    /// Camera acquisition failed; terminal until retried
    Error(CameraError),
    /// Scanner closed
    Stopped,
}

/// Result of feeding a decoded payload to the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanStep {
    /// Not streaming; the payload was not examined
    Ignored,
    Matched(Venue),
    /// A code that is not a venue URL; call `resume` after the delay
    NoMatch { payload: String, resume_after: Duration },
}

/// Result of checking a typed URL.
#[derive(Debug, Clone, PartialEq)]
pub enum ManualCheck {
    /// Nothing to check (blank input or not in manual mode)
    Skipped,
    Matched(Venue),
    Invalid,
}

/// Ticket for one camera acquisition, returned by
/// [`ScanPipeline::request_camera`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraRequest(u64);

pub struct ScanPipeline<S: CameraStream> {
    phase: ScanPhase,
    stream: Option<S>,
    requests: u64,
    pending: Option<CameraRequest>,
    resume_delay: Duration,
    manual_error: Option<&'static str>,
}

impl<S: CameraStream> ScanPipeline<S> {
    pub fn new(resume_delay: Duration) -> Self {
        Self {
            phase: ScanPhase::Idle,
            stream: None,
            requests: 0,
            pending: None,
            resume_delay,
            manual_error: None,
        }
    }

    pub fn phase(&self) -> &ScanPhase {
        &self.phase
    }

    /// The decode loop keeps scheduling frames only while this is true.
    pub fn is_polling(&self) -> bool {
        self.phase == ScanPhase::Streaming
    }

    pub fn has_stream(&self) -> bool {
        self.stream.is_some()
    }

    pub fn found(&self) -> Option<&Venue> {
        match &self.phase {
            ScanPhase::Found(venue) => Some(venue),
            _ => None,
        }
    }

    pub fn is_manual(&self) -> bool {
        self.phase == ScanPhase::ManualEntry
    }

    /// The camera / manual toggle is hidden once a venue is found.
    pub fn offers_manual_toggle(&self) -> bool {
        self.found().is_none()
    }

    /// Camera failure or manual-entry miss, formatted for display.
    pub fn error_text(&self) -> Option<String> {
        match &self.phase {
            ScanPhase::Error(e) => Some(e.to_string()),
            ScanPhase::ManualEntry => self.manual_error.map(str::to_string),
            _ => None,
        }
    }

    /// Offer a page refresh: the browser only re-prompts for a denied
    /// permission after a reload.
    pub fn offers_refresh(&self) -> bool {
        matches!(&self.phase, ScanPhase::Error(e) if e.is_permission_denied())
    }

    /// Start (or retry) camera acquisition. Returns `None` when a request is
    /// already in flight or a stream is live.
    pub fn request_camera(&mut self) -> Option<CameraRequest> {
        match self.phase {
            ScanPhase::Idle | ScanPhase::Error(_) | ScanPhase::Stopped => {
                self.requests += 1;
                let request = CameraRequest(self.requests);
                debug!(request = request.0, "Camera requested");
                self.pending = Some(request);
                self.phase = ScanPhase::CameraRequested;
                Some(request)
            }
            _ => None,
        }
    }

    /// Hand over the stream granted for `request`. A stream for any request
    /// other than the pending one is stopped and false is returned.
    pub fn attach_stream(&mut self, request: CameraRequest, mut stream: S) -> bool {
        if self.phase != ScanPhase::CameraRequested || self.pending != Some(request) {
            debug!(request = request.0, phase = ?self.phase, "Discarding stale camera stream");
            stream.stop();
            return false;
        }
        self.pending = None;
        self.release_stream();
        self.stream = Some(stream);
        self.phase = ScanPhase::Streaming;
        info!("Camera streaming");
        true
    }

    /// Record a failed acquisition. Failures of superseded requests are
    /// ignored and false is returned.
    pub fn camera_failed(&mut self, request: CameraRequest, error: CameraError) -> bool {
        if self.pending != Some(request) {
            debug!(request = request.0, error = %error, "Ignoring failure of stale camera request");
            return false;
        }
        warn!(error = %error, "Camera unavailable");
        self.pending = None;
        self.release_stream();
        self.phase = ScanPhase::Error(error);
        true
    }

    /// Validate a decoded payload against the venue table.
    pub fn on_payload(&mut self, payload: &str, venues: &VenueStore) -> ScanStep {
        if !self.is_polling() {
            return ScanStep::Ignored;
        }

        match venues.find_by_landing_url(payload) {
            Some(venue) => {
                info!(venue_id = %venue.id, "QR code matched venue");
                self.release_stream();
                self.phase = ScanPhase::Found(venue.clone());
                ScanStep::Matched(venue.clone())
            }
            None => {
                debug!(payload, "QR code matched no venue");
                self.phase = ScanPhase::Resuming;
                ScanStep::NoMatch {
                    payload: payload.to_string(),
                    resume_after: self.resume_delay,
                }
            }
        }
    }

    /// Resume decoding after a miss. False if the user moved on meanwhile.
    pub fn resume(&mut self) -> bool {
        if self.phase == ScanPhase::Resuming && self.stream.is_some() {
            self.phase = ScanPhase::Streaming;
            true
        } else {
            false
        }
    }

    /// Switch to typed entry, releasing the camera.
    pub fn enter_manual(&mut self) {
        self.pending = None;
        self.release_stream();
        self.manual_error = None;
        self.phase = ScanPhase::ManualEntry;
    }

    /// Back to camera mode. The camera stays off until `request_camera`.
    pub fn leave_manual(&mut self) {
        self.pending = None;
        self.manual_error = None;
        self.phase = ScanPhase::Idle;
    }

    /// Look up a typed URL. Surrounding whitespace is ignored.
    pub fn check_manual(&mut self, input: &str, venues: &VenueStore) -> ManualCheck {
        let url = input.trim();
        if !self.is_manual() || url.is_empty() {
            return ManualCheck::Skipped;
        }

        match venues.find_by_landing_url(url) {
            Some(venue) => {
                info!(venue_id = %venue.id, "Manual URL matched venue");
                self.manual_error = None;
                self.phase = ScanPhase::Found(venue.clone());
                ManualCheck::Matched(venue.clone())
            }
            None => {
                self.manual_error = Some(INVALID_VENUE_URL);
                ManualCheck::Invalid
            }
        }
    }

    pub fn close(&mut self) {
        self.pending = None;
        self.release_stream();
        self.phase = ScanPhase::Stopped;
    }

    fn release_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            debug!("Camera released");
        }
    }
}

impl<S: CameraStream> Drop for ScanPipeline<S> {
    fn drop(&mut self) {
        self.release_stream();
    }
}
