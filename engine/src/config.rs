//! Tool configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::EngineError;

/// Configuration for the badge tool.
///
/// Can be loaded from a TOML file via [`Config::from_toml_file`] or built
/// programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Relay endpoints events are published to and fetched from.
    #[serde(default = "default_relays")]
    pub relays: Vec<String>,

    /// Per-relay bound on connect + acknowledgment, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory holding badge definition JSON files.
    #[serde(default = "default_definitions_dir")]
    pub definitions_dir: PathBuf,

    /// Directory signed events are archived to before publishing.
    #[serde(default = "default_archive_dir")]
    pub archive_dir: PathBuf,

    /// Whether to query published events back for confirmation.
    #[serde(default = "default_true")]
    pub verify_publish: bool,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_relays() -> Vec<String> {
    [
        "wss://relay.damus.io",
        "wss://nos.lol",
        "wss://nostr.wine",
        "wss://offchain.pub",
        "wss://relay.snort.social",
        "wss://relay.primal.net",
        "wss://relay.nostr.band",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_definitions_dir() -> PathBuf {
    PathBuf::from("./badges/definitions")
}

fn default_archive_dir() -> PathBuf {
    PathBuf::from("./data/events")
}

fn default_true() -> bool {
    true
}

// ── Impl ───────────────────────────────────────────────────────────────

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, EngineError> {
        toml::from_str(s).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("Config is always serializable to TOML")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            relays: default_relays(),
            timeout_secs: default_timeout_secs(),
            log_level: default_log_level(),
            definitions_dir: default_definitions_dir(),
            archive_dir: default_archive_dir(),
            verify_publish: default_true(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = Config::default();
        let toml_str = config.to_toml_string();
        let parsed = Config::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.relays, config.relays);
        assert_eq!(parsed.timeout_secs, config.timeout_secs);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = Config::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.log_level, "info");
        assert!(config.verify_publish);
        assert!(!config.relays.is_empty());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            relays = ["wss://relay.example"]
            timeout_secs = 3
        "#;
        let config = Config::from_toml_str(toml).expect("should parse");
        assert_eq!(config.relays, vec!["wss://relay.example".to_string()]);
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.log_level, "info"); // default
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = Config::from_toml_file(Path::new("/nonexistent/laurel.toml"));
        assert!(matches!(result, Err(EngineError::Config(_))));
    }
}
