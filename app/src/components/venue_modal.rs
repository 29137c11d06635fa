//! Venue detail card shown when a pin is tapped.

use dioxus::prelude::*;
use passport_core::LinkOpener;
use passport_core::types::Venue;

use crate::browser::BrowserLinks;

#[component]
pub fn VenueModal(venue: Venue, collected: bool, on_close: EventHandler<()>) -> Element {
    let landing_url = venue.landing_url.clone();

    rsx! {
        div { class: "overlay-backdrop", onclick: move |_| on_close.call(()),
            div { class: "venue-modal", onclick: move |evt| evt.stop_propagation(),
                button { class: "icon-button modal-close", onclick: move |_| on_close.call(()), "✕" }

                div { class: "venue-icon",
                    if let Some(icon) = venue.icon_url.as_ref() {
                        img { src: "{icon}", alt: "{venue.name}" }
                    } else {
                        span { "📍" }
                    }
                }
                h2 { class: "venue-name", "{venue.name}" }

                if collected {
                    p { class: "venue-status collected", "You've already collected this stamp!" }
                    button {
                        class: "primary-button",
                        onclick: move |_| {
                            BrowserLinks.open_in_new_context(&landing_url);
                            on_close.call(());
                        },
                        "Visit Landing Page"
                    }
                } else {
                    p { class: "venue-status", "Claim your stamp and unlock this venue" }
                    button { class: "primary-button", disabled: true, "🔒 Scan QR to Unlock" }
                }
            }
        }
    }
}
