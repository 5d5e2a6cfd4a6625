//! Local client configuration — where the backend lives and how often to poll.
//!
//! User-level file: `~/.cockpit/config.yaml`. Resolution: config file →
//! env vars (`COCKPIT_URL`, `COCKPIT_INTERVAL_MS`) → built-in defaults.
//! CLI flags override both (handled in main).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default backend address — matches the control plane's default bind.
const DEFAULT_URL: &str = "http://127.0.0.1:8333";
const DEFAULT_INTERVAL_MS: u64 = 2000;

/// Client-side configuration (no secrets).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL.
    #[serde(default = "default_url")]
    pub base_url: String,
    /// Poll interval for all state slices, in milliseconds.
    #[serde(default = "default_interval")]
    pub poll_interval_ms: u64,
}

fn default_url() -> String {
    DEFAULT_URL.into()
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_MS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_url(),
            poll_interval_ms: default_interval(),
        }
    }
}

/// Path to `~/.cockpit/config.yaml`.
fn user_config_path() -> Option<PathBuf> {
    #[cfg(windows)]
    let home = std::env::var("USERPROFILE").ok();
    #[cfg(not(windows))]
    let home = std::env::var("HOME").ok();
    home.map(|p| PathBuf::from(p).join(".cockpit").join("config.yaml"))
}

impl ClientConfig {
    /// Load config from disk, falling back to env vars, then defaults.
    pub fn load() -> Self {
        let mut config = user_config_path()
            .and_then(|p| Self::load_from(&p))
            .unwrap_or_default();

        if let Ok(url) = std::env::var("COCKPIT_URL") {
            config.base_url = url;
        }
        if let Some(ms) = std::env::var("COCKPIT_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.poll_interval_ms = ms;
        }

        config
    }

    /// Read and parse one config file. Missing or malformed yields None.
    pub fn load_from(path: &std::path::Path) -> Option<Self> {
        let text = std::fs::read_to_string(path).ok()?;
        Self::parse(&text)
    }

    /// Parse a YAML config document. Malformed input yields None.
    pub fn parse(text: &str) -> Option<Self> {
        serde_yaml::from_str(text).ok()
    }
}
