//! Passport book: progress summary and stamp grid.

use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use passport_core::{PassportSummary, VenueStore, stamps};

/// Delay before the book swings open.
const OPEN_DELAY_MS: u32 = 300;

#[component]
pub fn PassportView(store: VenueStore, on_close: EventHandler<()>) -> Element {
    let mut is_open = use_signal(|| false);

    use_future(move || async move {
        TimeoutFuture::new(OPEN_DELAY_MS).await;
        is_open.set(true);
    });

    let summary = PassportSummary::from_store(&store);
    let progress = format!("{:.0}", summary.progress_percent());
    let label = summary.label();
    let grid = stamps(&store);

    rsx! {
        div { class: "overlay-backdrop", onclick: move |_| on_close.call(()),
            div {
                class: if is_open() { "passport open" } else { "passport" },
                onclick: move |evt| evt.stop_propagation(),
                div { class: "passport-cover",
                    h2 { "Venue Passport" }
                    button { class: "icon-button", onclick: move |_| on_close.call(()), "✕" }
                }

                div { class: "passport-progress",
                    div { class: "progress-label",
                        span { "Stamps collected" }
                        span { class: "progress-count", "{label}" }
                    }
                    div { class: "progress-track",
                        div { class: "progress-fill", style: "width: {progress}%" }
                    }
                    span { class: "progress-percent", "{progress}% complete" }
                }

                if grid.is_empty() {
                    p { class: "empty-state", "No venues available" }
                } else {
                    div { class: "stamp-grid",
                        for stamp in grid.iter() {
                            div {
                                key: "{stamp.venue.id}",
                                class: if stamp.collected { "stamp collected" } else { "stamp" },
                                style: "transform: rotate({stamp.tilt_deg}deg)",
                                span { class: "stamp-glyph",
                                    if stamp.collected { "{stamp.glyph}" } else { "❔" }
                                }
                                span { class: "stamp-name", "{stamp.venue.name}" }
                                if stamp.collected {
                                    span { class: "stamp-mark", "VISITED" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
