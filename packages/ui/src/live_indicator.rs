//! Connection badge for the live dashboard.

use dioxus::prelude::*;
use helpdesk_api::ConnectionState;

use crate::icons::{FaPlug, FaRotate, FaWifi};
use crate::Icon;

/// Shows whether pushed counts are flowing. Polling keeps the numbers
/// current either way, so every non-live state reads as "polling".
#[component]
pub fn LiveIndicator(state: ConnectionState) -> Element {
    match state {
        ConnectionState::Connected => rsx! {
            span {
                class: "live-indicator live-indicator--live",
                title: "Receiving live updates",
                Icon { icon: FaWifi, width: 14, height: 14 }
                " {state.label()}"
            }
        },
        ConnectionState::Connecting | ConnectionState::Reconnecting => rsx! {
            span {
                class: "live-indicator live-indicator--pending",
                title: "Connecting to live updates, polling meanwhile",
                Icon { icon: FaRotate, width: 14, height: 14 }
                " {state.label()}"
            }
        },
        ConnectionState::Idle | ConnectionState::Closed => rsx! {
            span {
                class: "live-indicator live-indicator--offline",
                title: "Live updates unavailable, polling",
                Icon { icon: FaPlug, width: 14, height: 14 }
                " Polling"
            }
        },
    }
}
