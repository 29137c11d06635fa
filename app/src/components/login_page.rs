//! Email + password login and registration form.

use dioxus::prelude::*;
use passport_core::session::{AuthMode, CONFIRMATION_SENT, Credentials, SessionState};

use crate::api::Backend;

#[component]
pub fn LoginPage() -> Element {
    let backend = use_context::<Backend>();
    let mut session = use_context::<Signal<SessionState>>();

    let remembered = use_hook({
        let backend = backend.clone();
        move || backend.remembered_email()
    });
    let mut email = use_signal(|| remembered.clone().unwrap_or_default());
    let mut remember_me = use_signal(|| remembered.is_some());
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut mode = use_signal(AuthMode::default);
    let mut loading = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);
    let mut message = use_signal(|| None::<String>);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if loading() {
            return;
        }
        let credentials = Credentials {
            email: email(),
            password: password(),
            confirm_password: confirm_password(),
            remember_me: remember_me(),
        };
        let current_mode = mode();
        let backend = backend.clone();

        error.set(None);
        message.set(None);
        loading.set(true);
        spawn(async move {
            match current_mode {
                AuthMode::Login => {
                    let result = backend.sign_in(&credentials).await;
                    loading.set(false);
                    match result {
                        Ok(auth) => session.set(SessionState::SignedIn(auth)),
                        Err(e) => error.set(Some(e.to_string())),
                    }
                }
                AuthMode::Register => {
                    let result = backend.register(&credentials).await;
                    loading.set(false);
                    match result {
                        Ok(()) => {
                            message.set(Some(CONFIRMATION_SENT.to_string()));
                            email.set(String::new());
                            password.set(String::new());
                            confirm_password.set(String::new());
                        }
                        Err(e) => error.set(Some(e.to_string())),
                    }
                }
            }
        });
    };

    let registering = mode() == AuthMode::Register;
    let submit_label = match (loading(), registering) {
        (true, _) => "Please wait…",
        (false, true) => "Create account",
        (false, false) => "Sign in",
    };

    rsx! {
        div { class: "login-page",
            div { class: "login-card",
                div { class: "login-header",
                    span { class: "login-logo", "🗺️" }
                    h1 { "Venue Passport" }
                    p {
                        if registering { "Create an account to start collecting stamps" } else { "Sign in to continue your journey" }
                    }
                }

                form { class: "login-form", onsubmit: on_submit,
                    label { r#for: "login-email", "Email" }
                    input {
                        id: "login-email",
                        r#type: "email",
                        autocomplete: "email",
                        placeholder: "you@example.com",
                        value: "{email}",
                        oninput: move |evt| email.set(evt.value()),
                    }

                    label { r#for: "login-password", "Password" }
                    input {
                        id: "login-password",
                        r#type: "password",
                        autocomplete: if registering { "new-password" } else { "current-password" },
                        value: "{password}",
                        oninput: move |evt| password.set(evt.value()),
                    }

                    if registering {
                        label { r#for: "login-confirm", "Confirm password" }
                        input {
                            id: "login-confirm",
                            r#type: "password",
                            autocomplete: "new-password",
                            value: "{confirm_password}",
                            oninput: move |evt| confirm_password.set(evt.value()),
                        }
                    } else {
                        label { class: "remember-me",
                            input {
                                r#type: "checkbox",
                                checked: remember_me(),
                                onchange: move |evt| remember_me.set(evt.checked()),
                            }
                            "Remember me"
                        }
                    }

                    if let Some(e) = error() {
                        p { class: "form-error", "{e}" }
                    }
                    if let Some(m) = message() {
                        p { class: "form-message", "{m}" }
                    }

                    button { class: "primary-button", r#type: "submit", disabled: loading(),
                        "{submit_label}"
                    }
                }

                button {
                    class: "link-button",
                    onclick: move |_| {
                        mode.set(mode().toggled());
                        error.set(None);
                        message.set(None);
                        confirm_password.set(String::new());
                    },
                    if registering { "Already have an account? Sign in" } else { "Need an account? Register" }
                }
            }
        }
    }
}
