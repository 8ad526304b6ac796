use dioxus::prelude::*;

use crate::auth::{use_api, use_auth};
use crate::format::datetime;
use crate::icons::FaBell;
use crate::live_counts::use_notification_refresh;
use crate::Icon;

const NAVBAR_CSS: Asset = asset!("/assets/styling/navbar.css");

/// Top bar: page title, signed-in user, notification bell and whatever the
/// layout passes in (usually the logout button).
#[component]
pub fn Navbar(title: String, children: Element) -> Element {
    let auth = use_auth();
    let who = auth
        .read()
        .session
        .as_ref()
        .map(|s| format!("{} · {}", s.username, s.role.label()));

    rsx! {
        document::Link { rel: "stylesheet", href: NAVBAR_CSS }
        header {
            class: "navbar",
            h1 { class: "navbar-title", "{title}" }
            div {
                class: "navbar-right",
                NotificationBell {}
                if let Some(who) = who {
                    span { class: "navbar-user", "{who}" }
                }
                {children}
            }
        }
    }
}

/// Unread count with a dropdown of the latest messages. Re-fetched on mount
/// and after every dashboard poll.
#[component]
fn NotificationBell() -> Element {
    let api = use_api();
    let refresh = use_notification_refresh();
    let mut open = use_signal(|| false);

    let summary = use_resource(move || {
        let api = api.clone();
        // Subscribe to the refresh generation
        let _ = refresh.map(|r| r.generation());
        async move {
            match api.notifications().await {
                Ok(summary) => Some(summary),
                Err(e) => {
                    tracing::warn!("Notification refresh failed: {e}");
                    None
                }
            }
        }
    });

    let current = summary.read().clone().flatten().unwrap_or_default();

    rsx! {
        div {
            class: "notification-bell",
            button {
                class: "btn btn-icon",
                title: "Notifications",
                onclick: move |_| open.toggle(),
                Icon { icon: FaBell, width: 16, height: 16 }
                if current.unread > 0 {
                    span { class: "notification-count", "{current.unread}" }
                }
            }
            if open() {
                div {
                    class: "notification-menu",
                    if current.latest.is_empty() {
                        p { class: "muted", "No new notifications" }
                    }
                    for note in current.latest.iter() {
                        div {
                            key: "{note.id}",
                            class: "notification-item",
                            p { "{note.message}" }
                            span { class: "muted", {datetime(note.created_at.as_deref())} }
                        }
                    }
                }
            }
        }
    }
}
