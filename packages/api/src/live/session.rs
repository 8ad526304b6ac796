//! Transport-free half of the live-count client.
//!
//! [`ConnectionState`] tracks the socket lifecycle and decides when to
//! reconnect. [`StompSession`] turns raw websocket text into actions for the
//! driver: frames to send, counts to merge, or a failure that should close
//! the socket. Neither touches the browser, so both are tested natively.

use std::time::Duration;

use super::frame::{Command, Frame};
use crate::models::CountsPatch;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Idle,
    Connecting,
    Connected,
    Reconnecting,
    Closed,
}

impl ConnectionState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Connecting => "Connecting",
            Self::Connected => "Live",
            Self::Reconnecting => "Reconnecting",
            Self::Closed => "Offline",
        }
    }

    pub fn is_live(self) -> bool {
        self == Self::Connected
    }
}

/// Lifecycle guard for one socket.
#[derive(Clone, Debug)]
pub struct ConnectionMachine {
    state: ConnectionState,
    reconnect_delay: Duration,
}

impl ConnectionMachine {
    pub fn new(reconnect_delay: Duration) -> Self {
        Self {
            state: ConnectionState::Idle,
            reconnect_delay,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Returns false while a connection is already pending or open, or after
    /// deactivation.
    pub fn begin_connect(&mut self) -> bool {
        match self.state {
            ConnectionState::Idle | ConnectionState::Reconnecting => {
                self.state = ConnectionState::Connecting;
                true
            }
            ConnectionState::Connecting | ConnectionState::Connected | ConnectionState::Closed => false,
        }
    }

    pub fn on_connected(&mut self) {
        if self.state == ConnectionState::Connecting {
            self.state = ConnectionState::Connected;
        }
    }

    /// Socket closed or errored. Returns the delay before the next attempt,
    /// or `None` when the client was deactivated.
    pub fn on_lost(&mut self) -> Option<Duration> {
        match self.state {
            ConnectionState::Closed => None,
            ConnectionState::Reconnecting => Some(self.reconnect_delay),
            _ => {
                self.state = ConnectionState::Reconnecting;
                Some(self.reconnect_delay)
            }
        }
    }

    pub fn deactivate(&mut self) {
        self.state = ConnectionState::Closed;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionOutput {
    /// Encoded frame to write to the socket.
    Send(String),
    Connected,
    Counts(CountsPatch),
    /// The broker rejected us; close and retry.
    Failed(String),
}

/// STOMP conversation for the counts topic.
#[derive(Clone, Debug)]
pub struct StompSession {
    host: String,
    token: Option<String>,
    topic: String,
    subscription_id: String,
}

impl StompSession {
    pub fn new(host: impl Into<String>, token: Option<String>, topic: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            token,
            topic: topic.into(),
            subscription_id: "sub-0".to_string(),
        }
    }

    /// First frame to send once the socket opens.
    pub fn open_frame(&self) -> String {
        Frame::connect(&self.host, self.token.as_deref()).encode()
    }

    pub fn close_frame(&self) -> String {
        Frame::disconnect().encode()
    }

    pub fn handle_text(&self, raw: &str) -> Vec<SessionOutput> {
        let frames = match Frame::parse_all(raw) {
            Ok(frames) => frames,
            Err(e) => {
                tracing::warn!("Dropping malformed STOMP message: {e}");
                return Vec::new();
            }
        };
        let mut out = Vec::new();
        for frame in frames {
            match frame.command {
                Command::Connected => {
                    tracing::info!("Live counts connected, subscribing to {}", self.topic);
                    out.push(SessionOutput::Connected);
                    out.push(SessionOutput::Send(
                        Frame::subscribe(&self.subscription_id, &self.topic).encode(),
                    ));
                }
                Command::Message => {
                    if frame.get("destination").is_some_and(|d| d != self.topic) {
                        tracing::debug!("Ignoring message for {:?}", frame.get("destination"));
                        continue;
                    }
                    match CountsPatch::from_json(&frame.body) {
                        Ok(patch) if !patch.is_empty() => out.push(SessionOutput::Counts(patch)),
                        Ok(_) => tracing::debug!("Counts message carried no known counters"),
                        Err(e) => tracing::warn!("Unparseable counts message: {e}"),
                    }
                }
                Command::Error => {
                    let message = frame
                        .get("message")
                        .map(str::to_string)
                        .unwrap_or_else(|| frame.body.trim().to_string());
                    tracing::warn!("Broker error: {message}");
                    out.push(SessionOutput::Failed(message));
                }
                other => tracing::debug!("Ignoring {other} frame"),
            }
        }
        out
    }
}

/// Host header value for a websocket URL: `ws://a.b:8080/ws` → `a.b`.
pub fn host_of(ws_url: &str) -> String {
    let rest = ws_url.split_once("://").map(|(_, r)| r).unwrap_or(ws_url);
    let authority = rest.split('/').next().unwrap_or(rest);
    let host = authority.rsplit_once('@').map(|(_, h)| h).unwrap_or(authority);
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name.to_string(),
        _ => host.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_guard_rejects_second_connect() {
        let mut machine = ConnectionMachine::new(Duration::from_millis(5000));
        assert!(machine.begin_connect());
        assert!(!machine.begin_connect());
        machine.on_connected();
        assert_eq!(machine.state(), ConnectionState::Connected);
        assert!(!machine.begin_connect());
    }

    #[test]
    fn test_lost_connection_schedules_fixed_delay() {
        let mut machine = ConnectionMachine::new(Duration::from_millis(5000));
        machine.begin_connect();
        machine.on_connected();
        assert_eq!(machine.on_lost(), Some(Duration::from_millis(5000)));
        assert_eq!(machine.state(), ConnectionState::Reconnecting);
        // A close after an error reports the same delay, not a longer one.
        assert_eq!(machine.on_lost(), Some(Duration::from_millis(5000)));
        assert!(machine.begin_connect());
        assert_eq!(machine.state(), ConnectionState::Connecting);
    }

    #[test]
    fn test_deactivated_machine_never_reconnects() {
        let mut machine = ConnectionMachine::new(Duration::from_millis(5000));
        machine.begin_connect();
        machine.deactivate();
        assert_eq!(machine.on_lost(), None);
        assert!(!machine.begin_connect());
        machine.on_connected();
        assert_eq!(machine.state(), ConnectionState::Closed);
    }

    fn session() -> StompSession {
        StompSession::new("helpdesk.local", Some("tok".into()), "/topic/dashboard-counts")
    }

    #[test]
    fn test_connected_triggers_subscribe() {
        let out = session().handle_text("CONNECTED\nversion:1.2\n\n\0");
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], SessionOutput::Connected);
        match &out[1] {
            SessionOutput::Send(frame) => {
                assert!(frame.starts_with("SUBSCRIBE\n"));
                assert!(frame.contains("destination:/topic/dashboard-counts\n"));
            }
            other => panic!("expected subscribe, got {other:?}"),
        }
    }

    #[test]
    fn test_message_becomes_counts_patch() {
        let out = session().handle_text(
            "MESSAGE\ndestination:/topic/dashboard-counts\n\n{\"open\": 7, \"urgent\": \"x\"}\0",
        );
        let SessionOutput::Counts(patch) = &out[0] else {
            panic!("expected counts");
        };
        assert_eq!(patch.values()[1], Some(7));
        assert_eq!(patch.values()[6], None);
    }

    #[test]
    fn test_bad_bodies_and_heartbeats_are_dropped() {
        let s = session();
        assert!(s.handle_text("\n").is_empty());
        assert!(s
            .handle_text("MESSAGE\ndestination:/topic/dashboard-counts\n\nnot json\0")
            .is_empty());
        assert!(s.handle_text("MESSAGE\ndestination:/topic/other\n\n{\"open\":1}\0").is_empty());
    }

    #[test]
    fn test_error_frame_fails_session() {
        let out = session().handle_text("ERROR\nmessage:Invalid token\n\n\0");
        assert_eq!(out, vec![SessionOutput::Failed("Invalid token".into())]);
    }

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("ws://localhost:8080/ws/websocket"), "localhost");
        assert_eq!(host_of("wss://desk.example.com/ws"), "desk.example.com");
        assert_eq!(host_of("desk"), "desk");
    }
}
