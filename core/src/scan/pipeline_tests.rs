//! Tests for ScanPipeline transitions
//!
//! Verifies the camera stream is released on every exit path and that the
//! polling flag stops the decode loop.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use super::{
    CameraError, CameraStream, ManualCheck, PERMISSION_DENIED, ScanPhase, ScanPipeline, ScanStep,
};
use crate::notice::INVALID_VENUE_URL;
use crate::venues::VenueStore;
use crate::venues::test_support::venue;

/// Stream that records how many times it was stopped
struct FakeStream {
    stops: Rc<Cell<u32>>,
}

impl CameraStream for FakeStream {
    fn stop(&mut self) {
        self.stops.set(self.stops.get() + 1);
    }
}

fn fake_stream() -> (FakeStream, Rc<Cell<u32>>) {
    let stops = Rc::new(Cell::new(0));
    (
        FakeStream {
            stops: Rc::clone(&stops),
        },
        stops,
    )
}

const DELAY: Duration = Duration::from_millis(1000);

fn store() -> VenueStore {
    VenueStore::from_parts(vec![venue("a", "https://x/a")], [])
}

fn streaming() -> (ScanPipeline<FakeStream>, Rc<Cell<u32>>) {
    let mut pipeline = ScanPipeline::new(DELAY);
    let (stream, stops) = fake_stream();
    let request = pipeline.request_camera().unwrap();
    assert!(pipeline.attach_stream(request, stream));
    assert!(pipeline.is_polling());
    (pipeline, stops)
}

#[test]
fn match_releases_camera_and_stops_polling() {
    let (mut pipeline, stops) = streaming();

    let step = pipeline.on_payload("https://x/a", &store());
    assert!(matches!(step, ScanStep::Matched(ref v) if v.id.as_str() == "a"));
    assert_eq!(stops.get(), 1);
    assert!(!pipeline.has_stream());
    assert!(!pipeline.is_polling());
    assert_eq!(pipeline.found().map(|v| v.id.as_str()), Some("a"));
}

#[test]
fn miss_pauses_then_resumes_after_delay() {
    let (mut pipeline, stops) = streaming();

    let step = pipeline.on_payload("https://elsewhere", &store());
    assert_eq!(
        step,
        ScanStep::NoMatch {
            payload: "https://elsewhere".to_string(),
            resume_after: DELAY,
        }
    );
    assert!(!pipeline.is_polling());
    assert_eq!(stops.get(), 0, "camera stays live while paused");

    // Payloads arriving while paused are not examined
    assert_eq!(pipeline.on_payload("https://x/a", &store()), ScanStep::Ignored);

    assert!(pipeline.resume());
    assert!(pipeline.is_polling());
}

#[test]
fn resume_after_close_does_nothing() {
    let (mut pipeline, stops) = streaming();
    pipeline.on_payload("https://elsewhere", &store());
    pipeline.close();

    assert!(!pipeline.resume());
    assert_eq!(pipeline.phase(), &ScanPhase::Stopped);
    assert_eq!(stops.get(), 1);
}

#[test]
fn close_releases_camera() {
    let (mut pipeline, stops) = streaming();
    pipeline.close();
    assert_eq!(stops.get(), 1);
    assert!(!pipeline.has_stream());

    // Releasing twice must not stop the stream twice
    pipeline.close();
    assert_eq!(stops.get(), 1);
}

#[test]
fn drop_releases_camera() {
    let (pipeline, stops) = streaming();
    drop(pipeline);
    assert_eq!(stops.get(), 1);
}

#[test]
fn manual_entry_releases_camera() {
    let (mut pipeline, stops) = streaming();
    pipeline.enter_manual();
    assert_eq!(stops.get(), 1);
    assert!(pipeline.is_manual());
    assert!(!pipeline.is_polling());
}

#[test]
fn late_stream_is_stopped_immediately() {
    let mut pipeline = ScanPipeline::new(DELAY);
    let request = pipeline.request_camera().unwrap();
    pipeline.close();

    let (stream, stops) = fake_stream();
    assert!(!pipeline.attach_stream(request, stream));
    assert_eq!(stops.get(), 1);
    assert!(!pipeline.has_stream());
}

#[test]
fn camera_is_never_acquired_twice() {
    let mut pipeline = ScanPipeline::new(DELAY);
    let (stream, stops) = fake_stream();
    let request = pipeline.request_camera().unwrap();
    assert!(pipeline.attach_stream(request, stream));
    assert!(pipeline.request_camera().is_none());

    // Replaying the spent ticket cannot replace the live stream
    let (second, second_stops) = fake_stream();
    assert!(!pipeline.attach_stream(request, second));
    assert_eq!(second_stops.get(), 1);
    assert_eq!(stops.get(), 0);
    assert!(pipeline.has_stream());
}

#[test]
fn permission_denial_is_terminal_until_retry() {
    let mut pipeline: ScanPipeline<FakeStream> = ScanPipeline::new(DELAY);
    let request = pipeline.request_camera().unwrap();
    assert!(pipeline.camera_failed(
        request,
        CameraError::new(PERMISSION_DENIED, "Permission denied")
    ));

    assert_eq!(
        pipeline.error_text().as_deref(),
        Some("NotAllowedError: Permission denied")
    );
    assert!(pipeline.offers_refresh());
    assert!(!pipeline.is_polling());

    assert!(pipeline.request_camera().is_some());
    assert_eq!(pipeline.phase(), &ScanPhase::CameraRequested);
    assert!(pipeline.error_text().is_none());
}

#[test]
fn manual_check_trims_and_matches_exactly() {
    let mut pipeline: ScanPipeline<FakeStream> = ScanPipeline::new(DELAY);
    let venues = store();

    // Not in manual mode yet
    assert_eq!(pipeline.check_manual("https://x/a", &venues), ManualCheck::Skipped);

    pipeline.enter_manual();
    assert_eq!(pipeline.check_manual("   ", &venues), ManualCheck::Skipped);

    assert_eq!(
        pipeline.check_manual("https://x/b", &venues),
        ManualCheck::Invalid
    );
    assert_eq!(pipeline.error_text().as_deref(), Some(INVALID_VENUE_URL));

    assert!(matches!(
        pipeline.check_manual("  https://x/a \n", &venues),
        ManualCheck::Matched(_)
    ));
    assert_eq!(pipeline.found().map(|v| v.id.as_str()), Some("a"));
    assert!(pipeline.error_text().is_none());
}

#[test]
fn leaving_manual_clears_state() {
    let mut pipeline: ScanPipeline<FakeStream> = ScanPipeline::new(DELAY);
    let venues = store();
    pipeline.enter_manual();
    pipeline.check_manual("nope", &venues);

    pipeline.leave_manual();
    assert_eq!(pipeline.phase(), &ScanPhase::Idle);
    assert!(pipeline.error_text().is_none());
    assert!(pipeline.found().is_none());
}

#[test]
fn superseded_request_cannot_replace_newer_stream() {
    let mut pipeline = ScanPipeline::new(DELAY);
    let first = pipeline.request_camera().unwrap();

    // User flips to manual entry and back while the first prompt is open
    pipeline.enter_manual();
    pipeline.leave_manual();
    let second = pipeline.request_camera().unwrap();
    assert_ne!(first, second);

    let (old_stream, old_stops) = fake_stream();
    assert!(!pipeline.attach_stream(first, old_stream));
    assert_eq!(old_stops.get(), 1);
    assert_eq!(pipeline.phase(), &ScanPhase::CameraRequested);

    let (new_stream, new_stops) = fake_stream();
    assert!(pipeline.attach_stream(second, new_stream));
    assert_eq!(new_stops.get(), 0);
    assert!(pipeline.is_polling());
}

#[test]
fn stale_failure_does_not_abort_newer_request() {
    let mut pipeline: ScanPipeline<FakeStream> = ScanPipeline::new(DELAY);
    let first = pipeline.request_camera().unwrap();
    pipeline.close();
    let second = pipeline.request_camera().unwrap();

    assert!(!pipeline.camera_failed(first, CameraError::new("AbortError", "gone")));
    assert_eq!(pipeline.phase(), &ScanPhase::CameraRequested);

    let (stream, _) = fake_stream();
    assert!(pipeline.attach_stream(second, stream));
}

#[test]
fn each_payload_is_checked_against_the_store_it_is_given() {
    let (mut pipeline, _) = streaming();

    // Scanner opened before the venue list arrived
    let empty = VenueStore::default();
    assert!(matches!(
        pipeline.on_payload("https://x/a", &empty),
        ScanStep::NoMatch { .. }
    ));
    assert!(pipeline.resume());

    // Same code after the load completes
    assert!(matches!(
        pipeline.on_payload("https://x/a", &store()),
        ScanStep::Matched(_)
    ));
}

#[test]
fn manual_toggle_hidden_once_venue_found() {
    let (mut pipeline, _) = streaming();
    assert!(pipeline.offers_manual_toggle());

    pipeline.on_payload("https://x/a", &store());
    assert!(!pipeline.offers_manual_toggle());

    let mut typed: ScanPipeline<FakeStream> = ScanPipeline::new(DELAY);
    typed.enter_manual();
    assert!(typed.offers_manual_toggle());
    typed.check_manual("https://x/a", &store());
    assert!(!typed.offers_manual_toggle());
}
