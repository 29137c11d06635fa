//! Toast notifications for notices raised by the load and claim flows.
//!
//! A toast manager lives in context; any component can push a [`Notice`].
//! Toasts auto-dismiss and can be closed by hand.

use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use passport_core::{Notice, NoticeLevel};

const MAX_TOASTS: usize = 4;

#[derive(Clone, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub notice: Notice,
}

/// Access via `use_toast()` from any component.
#[derive(Clone, Copy)]
pub struct ToastManager {
    toasts: Signal<Vec<Toast>>,
    next_id: Signal<u32>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self {
            toasts: Signal::new(vec![]),
            next_id: Signal::new(0),
        }
    }

    /// Show a notice. Info toasts stay 4 seconds, errors 7. The oldest toast
    /// is dropped once the cap is reached.
    pub fn show(&mut self, notice: Notice) {
        let id = *self.next_id.peek();
        *self.next_id.write() += 1;

        let duration = match notice.level {
            NoticeLevel::Info => 4000,
            NoticeLevel::Error => 7000,
        };

        {
            let mut toasts = self.toasts.write();
            if toasts.len() >= MAX_TOASTS {
                toasts.remove(0);
            }
            toasts.push(Toast { id, notice });
        }

        let mut toasts_signal = self.toasts;
        spawn(async move {
            TimeoutFuture::new(duration).await;
            toasts_signal.write().retain(|t| t.id != id);
        });
    }

    pub fn dismiss(&mut self, id: u32) {
        self.toasts.write().retain(|t| t.id != id);
    }
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Call once in the root component before any child uses toasts.
pub fn use_toast_provider() -> ToastManager {
    use_context_provider(ToastManager::new)
}

pub fn use_toast() -> ToastManager {
    use_context::<ToastManager>()
}

/// Renders all active toasts. Place once at the end of the main layout.
#[component]
pub fn ToastFrame() -> Element {
    let mut manager = use_toast();
    let toasts = manager.toasts.read();

    rsx! {
        div { class: "toast-container",
            for toast in toasts.iter() {
                div {
                    key: "{toast.id}",
                    class: if toast.notice.is_error() { "toast toast-error" } else { "toast" },
                    span { class: "toast-icon",
                        if toast.notice.is_error() { "⚠️" } else { "ℹ️" }
                    }
                    span { class: "toast-message", "{toast.notice.message}" }
                    button {
                        class: "toast-close",
                        onclick: {
                            let id = toast.id;
                            move |_| manager.dismiss(id)
                        },
                        "✕"
                    }
                }
            }
        }
    }
}
