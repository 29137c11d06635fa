//! Venue passport web app.

mod api;
mod app;
mod browser;
mod components;

use tracing::Level;

fn main() {
    let level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };
    if let Err(e) = dioxus_logger::init(level) {
        web_sys::console::warn_1(&format!("Logger unavailable: {e}").into());
    }

    dioxus::launch(app::App);
}
