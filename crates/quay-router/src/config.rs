//! Interface configuration, persisted to disk.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use quay_api::Scheme;

/// How routes are written to the address bar.
///
/// Read once when the codec is constructed and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingMode {
    /// Native browser paths, e.g. `/nodes/seed.example.com`.
    Path,
    /// The whole address packed after a leading `#`.
    Hash,
}

/// A repository pinned to the home view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedRepo {
    /// Repository id.
    pub rid: String,
    /// Node that seeds it, in `hostname[:port]` form.
    pub host: String,
}

/// Interface configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Port assumed for nodes addressed without an explicit port.
    pub default_httpd_port: u16,

    /// Port assumed for local nodes addressed without an explicit port.
    pub default_local_httpd_port: u16,

    /// Scheme assumed for public nodes.
    pub default_httpd_scheme: Scheme,

    /// Address-bar encoding mode.
    pub routing_mode: RoutingMode,

    /// Repositories shown on the home view.
    pub pinned_repos: Vec<PinnedRepo>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_httpd_port: 8080,
            default_local_httpd_port: 8081,
            default_httpd_scheme: Scheme::Https,
            routing_mode: RoutingMode::Path,
            pinned_repos: Vec::new(),
        }
    }
}

impl Config {
    /// Returns the config file path.
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("quay").join("config.json"))
    }

    /// Loads configuration from disk, or returns defaults if not found.
    #[must_use]
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            tracing::warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(?path, "Config file not found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    tracing::info!(?path, "Loaded configuration");
                    config
                }
                Err(e) => {
                    tracing::warn!(?path, error = %e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(?path, error = %e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Saves configuration to disk.
    pub fn save(&self) -> Result<(), String> {
        let Some(path) = Self::config_path() else {
            return Err("Could not determine config directory".to_string());
        };

        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                return Err(format!("Failed to create config directory: {e}"));
            }
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {e}"))?;

        fs::write(&path, contents).map_err(|e| format!("Failed to write config: {e}"))?;

        tracing::info!(?path, "Saved configuration");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip_through_json() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let parsed: Config = serde_json::from_str(r#"{ "routingMode": "hash" }"#).unwrap();
        assert_eq!(parsed.routing_mode, RoutingMode::Hash);
        assert_eq!(parsed.default_httpd_port, 8080);
        assert_eq!(parsed.default_local_httpd_port, 8081);
    }
}
