//! Dashboard configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::tracker::{TrackerOptions, DEFAULT_HASH_PREFIX_LEN};
use crate::NodeError;

/// Configuration for the dashboard daemon and its tracker.
///
/// Can be loaded from a TOML file via [`DashboardConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Base URL of the node's REST API.
    #[serde(default = "default_node_url")]
    pub node_url: String,

    /// WebSocket URL of the live event feed.
    #[serde(default = "default_feed_url")]
    pub feed_url: String,

    /// Seconds between peer-list refreshes; 0 fetches only at startup.
    #[serde(default = "default_peer_refresh_secs")]
    pub peer_refresh_secs: u64,

    /// Seconds to wait before reconnecting a dropped feed.
    #[serde(default = "default_feed_reconnect_secs")]
    pub feed_reconnect_secs: u64,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Capacity of the tracker's inbound event queue.
    #[serde(default = "default_event_queue_capacity")]
    pub event_queue_capacity: usize,

    /// Characters of a hash shown in notifications.
    #[serde(default = "default_hash_prefix_len")]
    pub hash_prefix_len: usize,

    /// Maximum retained notifications. Unset keeps all of them.
    #[serde(default)]
    pub notification_capacity: Option<usize>,

    /// Count at most one accepting vote per peer for each chain.
    #[serde(default)]
    pub dedupe_votes: bool,

    /// Expire pending chains after this many seconds. Unset keeps them forever.
    #[serde(default)]
    pub candidate_ttl_secs: Option<u64>,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether to serve `/metrics` and `/status`.
    #[serde(default)]
    pub enable_status: bool,

    /// Port for the status server (if enabled).
    #[serde(default = "default_status_port")]
    pub status_port: u16,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_node_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_feed_url() -> String {
    "ws://127.0.0.1:8080/api/ws".to_string()
}

fn default_peer_refresh_secs() -> u64 {
    30
}

fn default_feed_reconnect_secs() -> u64 {
    5
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_event_queue_capacity() -> usize {
    1024
}

fn default_hash_prefix_len() -> usize {
    DEFAULT_HASH_PREFIX_LEN
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_status_port() -> u16 {
    9100
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DashboardConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn tracker_options(&self) -> TrackerOptions {
        TrackerOptions {
            hash_prefix_len: self.hash_prefix_len,
            dedupe_votes: self.dedupe_votes,
            notification_capacity: self.notification_capacity,
        }
    }

    pub fn candidate_ttl(&self) -> Option<Duration> {
        self.candidate_ttl_secs.map(Duration::from_secs)
    }

    /// `None` when periodic refresh is disabled.
    pub fn peer_refresh_interval(&self) -> Option<Duration> {
        (self.peer_refresh_secs > 0).then(|| Duration::from_secs(self.peer_refresh_secs))
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            node_url: default_node_url(),
            feed_url: default_feed_url(),
            peer_refresh_secs: default_peer_refresh_secs(),
            feed_reconnect_secs: default_feed_reconnect_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            event_queue_capacity: default_event_queue_capacity(),
            hash_prefix_len: default_hash_prefix_len(),
            notification_capacity: None,
            dedupe_votes: false,
            candidate_ttl_secs: None,
            log_format: default_log_format(),
            log_level: default_log_level(),
            enable_status: false,
            status_port: default_status_port(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = DashboardConfig::default();
        let toml_str = config.to_toml_string().expect("serializable");
        let parsed = DashboardConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.node_url, config.node_url);
        assert_eq!(parsed.event_queue_capacity, config.event_queue_capacity);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = DashboardConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.hash_prefix_len, 16);
        assert_eq!(config.notification_capacity, None);
        assert!(!config.dedupe_votes);
        assert_eq!(config.candidate_ttl(), None);
        assert_eq!(config.log_format, "human");
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            node_url = "http://10.0.0.2:9000"
            notification_capacity = 200
            dedupe_votes = true
            candidate_ttl_secs = 600
        "#;
        let config = DashboardConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.node_url, "http://10.0.0.2:9000");
        assert_eq!(config.candidate_ttl(), Some(Duration::from_secs(600)));
        let options = config.tracker_options();
        assert_eq!(options.notification_capacity, Some(200));
        assert!(options.dedupe_votes);
        assert_eq!(config.feed_url, "ws://127.0.0.1:8080/api/ws"); // default
    }

    #[test]
    fn zero_refresh_disables_interval() {
        let config = DashboardConfig::from_toml_str("peer_refresh_secs = 0").unwrap();
        assert_eq!(config.peer_refresh_interval(), None);
        assert_eq!(
            DashboardConfig::default().peer_refresh_interval(),
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "status_port = 9200\nenable_status = true").unwrap();
        let config = DashboardConfig::from_toml_file(file.path()).expect("should load");
        assert!(config.enable_status);
        assert_eq!(config.status_port, 9200);
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = DashboardConfig::from_toml_file("/nonexistent/horde.toml");
        assert!(matches!(result, Err(NodeError::Config(_))));
    }

    #[test]
    fn malformed_toml_returns_config_error() {
        let result = DashboardConfig::from_toml_str("dedupe_votes = \"maybe\"");
        assert!(matches!(result, Err(NodeError::Config(_))));
    }
}
