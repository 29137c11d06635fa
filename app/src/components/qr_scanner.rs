//! QR scanner overlay: camera preview, per-frame decoding, manual URL entry
//! and the claim button for a recognised venue.

use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use passport_core::map::venue_glyph;
use passport_core::scan::{QrDecoder, RgbaFrame, RqrrDecoder, ScanPhase, ScanPipeline, ScanStep};
use passport_core::types::Venue;
use passport_core::VenueStore;
use tracing::warn;

use crate::api::Backend;
use crate::browser::{self, BrowserCamera, FrameSampler};

const VIDEO_ID: &str = "qr-scanner-video";

type Pipeline = ScanPipeline<BrowserCamera>;

/// Acquire the camera and run the decode loop until the pipeline stops
/// polling. The task belongs to the scanner scope and dies with it.
fn start_camera(mut pipeline: Signal<Pipeline>, facing_mode: String, venues: Signal<VenueStore>) {
    let Some(request) = pipeline.write().request_camera() else {
        return;
    };
    spawn(async move {
        match browser::open_camera(VIDEO_ID, &facing_mode).await {
            Ok(camera) => {
                if pipeline.write().attach_stream(request, camera) {
                    decode_loop(pipeline, venues).await;
                }
            }
            Err(e) => {
                pipeline.write().camera_failed(request, e);
            }
        }
    });
}

/// Venues are read per payload so a reload that lands mid-scan is seen.
async fn decode_loop(mut pipeline: Signal<Pipeline>, venues: Signal<VenueStore>) {
    let Some(sampler) = FrameSampler::new() else {
        warn!("Canvas unavailable, QR decoding disabled");
        return;
    };
    let Ok(video) = browser::video_element(VIDEO_ID) else {
        return;
    };
    let mut decoder = RqrrDecoder;

    while pipeline.peek().is_polling() {
        browser::next_animation_frame().await;
        if !pipeline.peek().is_polling() {
            break;
        }

        let Some(frame) = sampler.sample(&video) else {
            continue;
        };
        let Some(rgba) = RgbaFrame::new(frame.width, frame.height, &frame.pixels) else {
            continue;
        };
        let Some(payload) = decoder.decode(&rgba) else {
            continue;
        };

        let step = pipeline.write().on_payload(&payload, &venues.peek());
        match step {
            ScanStep::NoMatch { resume_after, .. } => {
                let delay_ms = u32::try_from(resume_after.as_millis()).unwrap_or(u32::MAX);
                TimeoutFuture::new(delay_ms).await;
                if !pipeline.write().resume() {
                    break;
                }
            }
            ScanStep::Matched(_) | ScanStep::Ignored => break,
        }
    }
}

#[component]
pub fn QrScanner(
    store: Signal<VenueStore>,
    can_claim: bool,
    claiming: bool,
    on_claim: EventHandler<Venue>,
    on_close: EventHandler<()>,
) -> Element {
    let backend = use_context::<Backend>();
    let resume_delay = backend.config().resume_delay();
    let facing_mode = backend.config().scanner.facing_mode.clone();

    let mut pipeline = use_signal(move || Pipeline::new(resume_delay));
    let mut manual_url = use_signal(String::new);

    use_drop(move || {
        if let Ok(mut p) = pipeline.try_write() {
            p.close();
        }
    });

    let (phase, found, error_text, offers_refresh, offers_toggle) = {
        let p = pipeline.read();
        (
            p.phase().clone(),
            p.found().cloned(),
            p.error_text(),
            p.offers_refresh(),
            p.offers_manual_toggle(),
        )
    };
    let manual = phase == ScanPhase::ManualEntry;
    let status = match &phase {
        ScanPhase::CameraRequested => "Starting camera…",
        ScanPhase::Streaming => "Point your camera at a venue QR code",
        ScanPhase::Resuming => "That code isn't a venue. Keep scanning…",
        _ => "",
    };
    let can_start = matches!(phase, ScanPhase::Idle | ScanPhase::Error(_));

    let mount_facing = facing_mode.clone();

    rsx! {
        div { class: "overlay-backdrop",
            div { class: "scanner-panel",
                div { class: "scanner-header",
                    h2 { "Scan Venue QR" }
                    button {
                        class: "icon-button",
                        onclick: move |_| {
                            pipeline.write().close();
                            on_close.call(());
                        },
                        "✕"
                    }
                }

                if let Some(venue) = found {
                    div { class: "scanner-found",
                        span { class: "found-glyph", {venue_glyph(&venue.name)} }
                        p { "Venue found" }
                        h3 { "{venue.name}" }
                        if !can_claim {
                            p { class: "scanner-hint", "Waiting for your passport to load…" }
                        }
                        button {
                            class: "primary-button claim-button",
                            disabled: !can_claim || claiming,
                            onclick: move |_| {
                                let venue = pipeline.peek().found().cloned();
                                if let Some(venue) = venue {
                                    on_claim.call(venue);
                                }
                            },
                            if claiming { "Claiming…" } else { "CLAIM REWARD" }
                        }
                    }
                } else if manual {
                    form {
                        class: "manual-entry",
                        onsubmit: move |evt: FormEvent| {
                            evt.prevent_default();
                            pipeline.write().check_manual(&manual_url(), &store.peek());
                        },
                        label { r#for: "manual-url", "Venue URL" }
                        input {
                            id: "manual-url",
                            r#type: "url",
                            placeholder: "https://…",
                            value: "{manual_url}",
                            oninput: move |evt| manual_url.set(evt.value()),
                        }
                        button { class: "primary-button", r#type: "submit", "Verify" }
                    }
                } else {
                    div { class: "scanner-viewport",
                        video {
                            id: VIDEO_ID,
                            autoplay: true,
                            playsinline: true,
                            muted: true,
                            onmounted: move |_| start_camera(pipeline, mount_facing.clone(), store),
                        }
                        div { class: "scanner-frame" }
                    }
                    if !status.is_empty() {
                        p { class: "scanner-status", "{status}" }
                    }
                    if can_start {
                        button {
                            class: "primary-button",
                            onclick: move |_| start_camera(pipeline, facing_mode.clone(), store),
                            "Start Camera"
                        }
                    }
                }

                if let Some(e) = error_text {
                    div { class: "scanner-error",
                        p { "{e}" }
                        if offers_refresh {
                            p { "Allow camera access in your browser settings, then refresh." }
                            button { class: "secondary-button", onclick: move |_| browser::reload_page(), "Refresh Page" }
                        }
                    }
                }

                div { class: "scanner-footer",
                    if offers_toggle {
                        button {
                            class: "link-button",
                            onclick: move |_| {
                                if pipeline.peek().is_manual() {
                                    pipeline.write().leave_manual();
                                    manual_url.set(String::new());
                                } else {
                                    pipeline.write().enter_manual();
                                }
                            },
                            if manual { "📷 Use camera" } else { "⌨️ Enter URL manually" }
                        }
                    }
                    button {
                        class: "secondary-button",
                        onclick: move |_| {
                            pipeline.write().close();
                            on_close.call(());
                        },
                        "Abort"
                    }
                }
            }
        }
    }
}
