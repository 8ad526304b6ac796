//! # Console configuration (`console.toml`)
//!
//! Defines the TOML configuration the web binary embeds at compile time
//! (filename: [`ConsoleConfig::filename`] = `"console.toml"`). It tells the
//! console where the REST gateway and the message bus live, how the live
//! dashboard and idle supervisor are timed, and which legacy per-server
//! endpoints exist.
//!
//! ## Structure
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8080"
//!
//! [live]
//! ws_url = "ws://localhost:8080/ws/websocket"
//! counts_topic = "/topic/dashboard-counts"
//! poll_interval_secs = 10
//! reconnect_delay_ms = 5000
//!
//! [session]
//! idle_timeout_secs = 900
//! warning_secs = 60
//!
//! [tables]
//! debounce_ms = 300
//! default_page_size = 10
//!
//! [[servers]]
//! id = "alpha"
//! name = "Alpha"
//! base_url = "http://alpha.example.com/api.php"
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`ConsoleConfig`] | Top-level config with TOML (de)serialisation and server lookup. |
//! | [`ApiConfig`] | REST gateway base URL. |
//! | [`LiveConfig`] | Message-bus URL, counts topic, poll interval and reconnect delay. |
//! | [`SessionConfig`] | Idle timeout and the warning window before forced logout. |
//! | [`TablesConfig`] | Search debounce and default page size. |
//! | [`ServerEndpoint`] | One legacy per-server endpoint, keyed by server id. |
//!
//! All structs derive `Default` so a missing or empty file is equivalent to
//! the default configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Top-level configuration stored in `console.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub live: LiveConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub tables: TablesConfig,
    #[serde(default)]
    pub servers: Vec<ServerEndpoint>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Live dashboard configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LiveConfig {
    /// Websocket endpoint of the message bus.
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
    /// Destination carrying partial dashboard counts.
    #[serde(default = "default_counts_topic")]
    pub counts_topic: String,
    /// Fallback REST poll interval in seconds. 0 disables polling.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u32,
    /// Fixed delay between reconnect attempts.
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_ms: u32,
}

fn default_ws_url() -> String {
    "ws://localhost:8080/ws/websocket".to_string()
}

fn default_counts_topic() -> String {
    "/topic/dashboard-counts".to_string()
}

fn default_poll_interval() -> u32 {
    10
}

fn default_reconnect_delay() -> u32 {
    5000
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            ws_url: default_ws_url(),
            counts_topic: default_counts_topic(),
            poll_interval_secs: default_poll_interval(),
            reconnect_delay_ms: default_reconnect_delay(),
        }
    }
}

impl LiveConfig {
    pub fn poll_interval(&self) -> Option<Duration> {
        (self.poll_interval_secs > 0).then(|| Duration::from_secs(self.poll_interval_secs as u64))
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms as u64)
    }
}

/// Idle-timeout configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Total idle time before a forced logout.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u32,
    /// How long the warning dialog is shown before the timeout elapses.
    #[serde(default = "default_warning")]
    pub warning_secs: u32,
}

fn default_idle_timeout() -> u32 {
    900
}

fn default_warning() -> u32 {
    60
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout(),
            warning_secs: default_warning(),
        }
    }
}

impl SessionConfig {
    pub fn idle_timeout_ms(&self) -> u64 {
        self.idle_timeout_secs as u64 * 1000
    }

    /// Warning window in milliseconds, never longer than the timeout itself.
    pub fn warning_ms(&self) -> u64 {
        (self.warning_secs as u64 * 1000).min(self.idle_timeout_ms())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TablesConfig {
    #[serde(default = "default_debounce")]
    pub debounce_ms: u32,
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
}

fn default_debounce() -> u32 {
    300
}

fn default_page_size() -> u32 {
    10
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce(),
            default_page_size: default_page_size(),
        }
    }
}

impl TablesConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms as u64)
    }
}

/// A legacy per-server endpoint, queried with `opr=` actions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerEndpoint {
    pub id: String,
    pub name: String,
    pub base_url: String,
}

impl ConsoleConfig {
    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "console.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, StoreError> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, StoreError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Look up a legacy endpoint by server id.
    pub fn server(&self, id: &str) -> Option<&ServerEndpoint> {
        self.servers.iter().find(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = ConsoleConfig::from_toml("").unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.live.poll_interval_secs, 10);
        assert_eq!(config.tables.debounce_ms, 300);
        assert!(config.servers.is_empty());
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = ConsoleConfig::from_toml(
            r#"
            [live]
            counts_topic = "/topic/counts"

            [[servers]]
            id = "alpha"
            name = "Alpha"
            base_url = "http://alpha.local/api.php"
            "#,
        )
        .unwrap();

        assert_eq!(config.live.counts_topic, "/topic/counts");
        assert_eq!(config.live.reconnect_delay_ms, 5000);
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.server("alpha").unwrap().name, "Alpha");
        assert!(config.server("beta").is_none());
    }

    #[test]
    fn test_poll_interval_zero_disables_polling() {
        let mut live = LiveConfig::default();
        assert_eq!(live.poll_interval(), Some(Duration::from_secs(10)));
        live.poll_interval_secs = 0;
        assert_eq!(live.poll_interval(), None);
    }

    #[test]
    fn test_warning_window_capped_by_timeout() {
        let session = SessionConfig {
            idle_timeout_secs: 30,
            warning_secs: 120,
        };
        assert_eq!(session.warning_ms(), 30_000);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = ConsoleConfig::from_toml("[live\npoll = ").unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = ConsoleConfig::default();
        config.servers.push(ServerEndpoint {
            id: "beta".to_string(),
            name: "Beta".to_string(),
            base_url: "http://beta.local/api.php".to_string(),
        });
        let text = config.to_toml().unwrap();
        assert_eq!(ConsoleConfig::from_toml(&text).unwrap(), config);
    }
}
