//! # Live dashboard counts
//!
//! The dashboard keeps one STOMP-over-websocket connection open to the
//! backend's message broker and merges every pushed counts patch into view
//! state. It is split so that everything except the socket itself is plain
//! Rust:
//!
//! - [`frame`]: STOMP 1.2 frame encoding and parsing
//! - [`session`]: connection state machine and per-frame protocol handling
//! - [`reconcile`]: the single entry point both pushes and polls write through
//! - `socket` (wasm only): the `web_sys::WebSocket` driver
//!
//! ## Lifecycle
//!
//! ```text
//! Idle ──activate──▶ Connecting ──CONNECTED──▶ Connected
//!                        ▲                         │
//!                        │ fixed delay     close / error
//!                        │                         ▼
//!                        └──────────────── Reconnecting
//!
//! any ──deactivate──▶ Closed   (no further reconnects)
//! ```
//!
//! Failures are logged and retried; they never reach the user.

pub mod frame;
pub mod reconcile;
pub mod session;

#[cfg(target_arch = "wasm32")]
mod socket;
#[cfg(target_arch = "wasm32")]
pub use socket::LiveCountClient;

use std::time::Duration;

use helpdesk_store::config::LiveConfig;

pub use frame::{Command, Frame, FrameError};
pub use reconcile::{CountsReconciler, Stamp};
pub use session::{ConnectionMachine, ConnectionState, SessionOutput, StompSession};

#[derive(Clone, Debug, PartialEq)]
pub struct LiveOptions {
    pub ws_url: String,
    pub topic: String,
    pub reconnect_delay: Duration,
}

impl LiveOptions {
    pub fn from_config(config: &LiveConfig) -> Self {
        Self {
            ws_url: config.ws_url.clone(),
            topic: config.counts_topic.clone(),
            reconnect_delay: config.reconnect_delay(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_follow_config_defaults() {
        let options = LiveOptions::from_config(&LiveConfig::default());
        assert_eq!(options.topic, "/topic/dashboard-counts");
        assert_eq!(options.reconnect_delay, Duration::from_millis(5000));
    }
}
