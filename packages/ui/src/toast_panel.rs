use std::time::Duration;

use dioxus::prelude::*;

use crate::timer::sleep;
use crate::toast::{use_toasts, ToastLevel, ToastLog};

const TOAST_CSS: Asset = asset!("/assets/styling/toast.css");

/// How long a non-error toast stays up.
const AUTO_DISMISS: Duration = Duration::from_secs(4);

/// Provides the toast log and renders it in the corner.
#[component]
pub fn ToastProvider(children: Element) -> Element {
    use_context_provider(|| Signal::new(ToastLog::default()));

    rsx! {
        {children}
        ToastPanel {}
    }
}

#[component]
fn ToastPanel() -> Element {
    let mut log = use_toasts();
    let entries = log().entries.clone();

    rsx! {
        document::Stylesheet { href: TOAST_CSS }

        div {
            class: "toast-stack",
            for entry in entries {
                ToastCard {
                    key: "{entry.id}",
                    id: entry.id,
                    level: entry.level,
                    timestamp: entry.timestamp.clone(),
                    message: entry.message.clone(),
                    on_dismiss: move |id| log.write().dismiss(id),
                }
            }
        }
    }
}

#[component]
fn ToastCard(
    id: u64,
    level: ToastLevel,
    timestamp: String,
    message: String,
    on_dismiss: EventHandler<u64>,
) -> Element {
    // Errors stay until closed
    use_hook(move || {
        if level != ToastLevel::Error {
            spawn(async move {
                sleep(AUTO_DISMISS).await;
                on_dismiss.call(id);
            });
        }
    });

    rsx! {
        div {
            class: match level {
                ToastLevel::Error => "toast toast-error",
                ToastLevel::Warning => "toast toast-warning",
                ToastLevel::Success => "toast toast-success",
                ToastLevel::Info => "toast toast-info",
            },
            role: "status",
            span { class: "toast-time", "{timestamp}" }
            span { class: "toast-message", "{message}" }
            button {
                class: "toast-close",
                title: "Dismiss",
                onclick: move |_| on_dismiss.call(id),
                "×"
            }
        }
    }
}
