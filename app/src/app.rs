//! Root component: configuration, session and the map screen.

use dioxus::prelude::*;
use passport_core::session::SessionState;
use passport_core::types::{Venue, VenueId};
use passport_core::{AppConfig, ConfigError, Notice, PassportSummary, VenueStore};
use tracing::{error, info};

use crate::api::Backend;
use crate::browser::BrowserLinks;
use crate::components::{
    LoginPage, MapView, PassportView, QrScanner, ToastFrame, VenueModal, use_toast,
    use_toast_provider,
};

static CSS: Asset = asset!("/assets/styles.css");

const CONFIG_TOML: &str = include_str!("../passport.toml");

fn load_config() -> Result<AppConfig, ConfigError> {
    let config = AppConfig::from_toml_str(CONFIG_TOML)?.with_backend_overrides(
        option_env!("PASSPORT_BACKEND_URL"),
        option_env!("PASSPORT_ANON_KEY"),
    );
    config.validate()?;
    Ok(config)
}

fn connect() -> Result<Backend, String> {
    let config = load_config().map_err(|e| e.to_string())?;
    let backend = Backend::new(config).map_err(|e| e.to_string())?;
    info!(identity = ?backend.config().identity, "Backend configured");
    Ok(backend)
}

// ─────────────────────────────────────────────────────────────────────────────
// App Component
// ─────────────────────────────────────────────────────────────────────────────

#[component]
pub fn App() -> Element {
    use_toast_provider();
    let startup = use_hook(|| {
        let result = connect();
        if let Err(e) = &result {
            error!(error = %e, "Startup failed");
        }
        result
    });

    rsx! {
        link { rel: "stylesheet", href: CSS }
        {
            match startup {
                Ok(backend) => rsx! { SessionRoot { backend } },
                Err(message) => rsx! {
                    div { class: "startup-error",
                        h2 { "Configuration error" }
                        p { "{message}" }
                        p { "Set PASSPORT_BACKEND_URL and PASSPORT_ANON_KEY when building, or edit passport.toml." }
                    }
                },
            }
        }
        ToastFrame {}
    }
}

/// Resolves the session once and shares it, with the backend, via context.
#[component]
fn SessionRoot(backend: Backend) -> Element {
    let backend = use_context_provider(|| backend);
    let session = use_signal(|| backend.resolve_session());
    use_context_provider(|| session);

    if session.read().needs_login() {
        rsx! { LoginPage {} }
    } else {
        rsx! { Home {} }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Map Screen
// ─────────────────────────────────────────────────────────────────────────────

#[component]
fn Home() -> Element {
    let backend = use_context::<Backend>();
    let mut session = use_context::<Signal<SessionState>>();
    let mut toast = use_toast();

    let mut store = use_signal(VenueStore::default);
    let mut loading = use_signal(|| true);
    let mut load_error = use_signal(|| None::<String>);
    let mut reload = use_signal(|| 0u32);
    let mut selected = use_signal(|| None::<VenueId>);
    let mut show_scanner = use_signal(|| false);
    let mut show_passport = use_signal(|| false);
    let mut claiming = use_signal(|| false);

    // Full reload on mount, on user change and on retry
    let load_backend = backend.clone();
    use_effect(move || {
        let current = session.read().clone();
        let _ = reload();
        let backend = load_backend.clone();
        loading.set(true);
        spawn(async move {
            let result = backend.load_venues(&current).await;
            if session.peek().user_id() != current.user_id() {
                // A newer load for the new user is in flight
                return;
            }
            match result {
                Ok(loaded) => {
                    store.set(loaded);
                    load_error.set(None);
                }
                Err(e) => {
                    error!(error = %e, "Venue load failed");
                    load_error.set(Some(e.notice().message));
                }
            }
            loading.set(false);
        });
    });

    let claim_backend = backend.clone();
    let on_claim = move |venue: Venue| {
        if claiming() {
            return;
        }
        let backend = claim_backend.clone();
        let current = session.peek().clone();
        claiming.set(true);
        spawn(async move {
            let result = backend.claim(&current, &venue).await;
            claiming.set(false);
            match result {
                Ok(outcome) => {
                    let notice = outcome.settle(&mut store.write(), &BrowserLinks);
                    if outcome.is_claimed() {
                        selected.set(None);
                        show_scanner.set(false);
                    }
                    if let Some(notice) = notice {
                        toast.show(notice);
                    }
                }
                Err(e) => toast.show(e.notice()),
            }
        });
    };

    let on_select = move |id: VenueId| {
        if store.peek().get(&id).is_some() {
            selected.set(Some(id));
        } else {
            toast.show(Notice::venue_not_found());
        }
    };

    let sign_out_backend = backend.clone();
    let on_sign_out = move |_| {
        let Some(auth) = session.peek().auth_session().cloned() else {
            return;
        };
        let backend = sign_out_backend.clone();
        spawn(async move {
            backend.sign_out(&auth).await;
            session.set(SessionState::SignedOut);
        });
    };

    let current_store = store.read().clone();
    let summary = PassportSummary::from_store(&current_store);
    let detail = selected
        .read()
        .as_ref()
        .and_then(|id| current_store.get(id).cloned())
        .map(|venue| {
            let collected = current_store.is_visited(&venue.id);
            (venue, collected)
        });
    let (can_claim, signed_in, unavailable) = {
        let s = session.read();
        let unavailable = match &*s {
            SessionState::Unavailable(reason) => Some(reason.clone()),
            _ => None,
        };
        (s.can_claim(), s.auth_session().is_some(), unavailable)
    };
    // Scanning matches against venues, so wait for a clean load
    let scan_ready = can_claim && !loading() && load_error().is_none() && current_store.is_loaded();
    let bounds = backend.config().map;

    rsx! {
        div { class: "home",
            header { class: "top-bar",
                h1 { "Venue Passport" }
                div { class: "top-actions",
                    button { class: "secondary-button", onclick: move |_| show_passport.set(true),
                        "📖 Passport "
                        span { class: "badge", "{summary.label()}" }
                    }
                    if signed_in {
                        button { class: "link-button", onclick: on_sign_out, "Sign out" }
                    }
                }
            }

            if let Some(message) = load_error() {
                div { class: "banner banner-error",
                    span { "{message}" }
                    button { class: "link-button", onclick: move |_| *reload.write() += 1, "Retry" }
                }
            }
            if let Some(reason) = unavailable {
                div { class: "banner",
                    span { "Stamp claims are disabled: {reason}" }
                }
            }

            if loading() && current_store.total() == 0 {
                div { class: "loading", "Loading venues…" }
            }

            MapView { store: current_store.clone(), bounds, on_select }

            button {
                class: "scan-fab",
                disabled: !scan_ready,
                onclick: move |_| show_scanner.set(true),
                "📷 Scan QR"
            }

            if let Some((venue, collected)) = detail {
                VenueModal {
                    venue,
                    collected,
                    on_close: move |_| selected.set(None),
                }
            }

            if show_scanner() {
                QrScanner {
                    store,
                    can_claim,
                    claiming: claiming(),
                    on_claim,
                    on_close: move |_| show_scanner.set(false),
                }
            }

            if show_passport() {
                PassportView {
                    store: current_store.clone(),
                    on_close: move |_| show_passport.set(false),
                }
            }
        }
    }
}
