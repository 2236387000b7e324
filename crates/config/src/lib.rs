//! Configuration model for Keyward suites and automation sessions.
//!
//! A [`Config`] is constructed for one target platform, optionally overlaid
//! from a flat JSON file, and then consumed read-only by the driver, the
//! locator resolution engine, and the keyword layer.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use keyward_core_types::{Platform, SelectorStrategy};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file does not exist: {path}")]
    NotFound { path: String },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Connection details of the remote automation server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: Option<String>,
    pub protocol: Option<String>,
}

/// Log verbosity requested from the automation client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    #[default]
    Silent,
}

/// Suite-level configuration.
///
/// Defaults mirror what the file format leaves implicit: a 3 s wait budget
/// polled every 500 ms, xpath as the preferred selector strategy, and
/// self-healing enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default = "Config::default_desktop")]
pub struct Config {
    pub platform: Platform,
    pub server: Option<ServerConfig>,
    pub log_level: LogLevel,
    pub parallel_execution: u32,
    pub desired_capabilities: serde_json::Map<String, serde_json::Value>,
    pub connection_retry_timeout_ms: u64,
    pub connection_retry_count: u32,
    pub wait_for_timeout_ms: u64,
    pub wait_for_interval_ms: u64,
    pub default_selector: SelectorStrategy,
    pub self_healing_enabled: bool,
}

impl Config {
    pub fn new(platform: Platform) -> Self {
        Config {
            platform,
            server: None,
            log_level: LogLevel::Silent,
            parallel_execution: 1,
            desired_capabilities: serde_json::Map::new(),
            connection_retry_timeout_ms: 120_000,
            connection_retry_count: 3,
            wait_for_timeout_ms: 3_000,
            wait_for_interval_ms: 500,
            default_selector: SelectorStrategy::Xpath,
            self_healing_enabled: true,
        }
    }

    fn default_desktop() -> Self {
        Config::new(Platform::Desktop)
    }

    /// Loads a flat JSON config file over the current values; fields absent
    /// from the file keep their current value.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let overlay: ConfigOverlay =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        overlay.apply(self);

        info!(path = %path.display(), "config loaded");
        Ok(())
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self).expect("config serializes");
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), "config saved");
        Ok(())
    }

    pub fn wait_for_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_for_timeout_ms)
    }

    pub fn wait_for_interval(&self) -> Duration {
        Duration::from_millis(self.wait_for_interval_ms)
    }

    pub fn connection_retry_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_retry_timeout_ms)
    }
}

/// File overlay: every field optional so partial configs merge over defaults.
#[derive(Debug, Default, Deserialize)]
struct ConfigOverlay {
    platform: Option<Platform>,
    server: Option<ServerConfig>,
    log_level: Option<LogLevel>,
    parallel_execution: Option<u32>,
    desired_capabilities: Option<serde_json::Map<String, serde_json::Value>>,
    connection_retry_timeout_ms: Option<u64>,
    connection_retry_count: Option<u32>,
    wait_for_timeout_ms: Option<u64>,
    wait_for_interval_ms: Option<u64>,
    default_selector: Option<SelectorStrategy>,
    self_healing_enabled: Option<bool>,
}

impl ConfigOverlay {
    fn apply(self, config: &mut Config) {
        if let Some(platform) = self.platform {
            config.platform = platform;
        }
        if let Some(server) = self.server {
            config.server = Some(server);
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level;
        }
        if let Some(parallel_execution) = self.parallel_execution {
            config.parallel_execution = parallel_execution;
        }
        if let Some(desired_capabilities) = self.desired_capabilities {
            config.desired_capabilities = desired_capabilities;
        }
        if let Some(timeout) = self.connection_retry_timeout_ms {
            config.connection_retry_timeout_ms = timeout;
        }
        if let Some(count) = self.connection_retry_count {
            config.connection_retry_count = count;
        }
        if let Some(timeout) = self.wait_for_timeout_ms {
            config.wait_for_timeout_ms = timeout;
        }
        if let Some(interval) = self.wait_for_interval_ms {
            config.wait_for_interval_ms = interval;
        }
        if let Some(default_selector) = self.default_selector {
            config.default_selector = default_selector;
        }
        if let Some(enabled) = self.self_healing_enabled {
            config.self_healing_enabled = enabled;
        }
    }
}
