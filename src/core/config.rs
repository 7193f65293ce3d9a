//! Configuration management for the Sift tool server.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{Result, SiftError};
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sandbox: SandboxConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub events: EventsConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Search sandbox configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SandboxConfig {
    /// Trusted root; every search must stay inside it
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Descend into symlinked directories (targets must stay inside
    /// the trusted root)
    #[serde(default)]
    pub follow_symlinks: bool,
}

/// Walk limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// Maximum entries returned by one search
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Maximum recursion depth (1 = direct children only)
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

/// Event stream timing
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventsConfig {
    /// Seconds between heartbeats
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,

    /// Seconds after connect before the tool readiness event
    #[serde(default = "default_tool_update_delay")]
    pub tool_update_delay_secs: u64,
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    7001
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_max_entries() -> usize {
    10_000
}

fn default_max_depth() -> usize {
    32
}

fn default_heartbeat_interval() -> u64 {
    30
}

fn default_tool_update_delay() -> u64 {
    5
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            follow_symlinks: false,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            max_depth: default_max_depth(),
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_secs: default_heartbeat_interval(),
            tool_update_delay_secs: default_tool_update_delay(),
        }
    }
}

impl EventsConfig {
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    pub fn tool_update_delay(&self) -> Duration {
        Duration::from_secs(self.tool_update_delay_secs)
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| SiftError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. SIFT_CONFIG env var
    /// 2. XDG config file (~/.config/sift/config.toml)
    /// 3. ./sift.toml
    /// 4. Defaults
    ///
    /// Environment overrides are applied on top. Validation is left
    /// to the caller so CLI flags can still be merged.
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("SIFT_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("sift.toml").exists() {
                Self::from_file("sift.toml")?
            } else {
                Self::default()
            }
        };

        config.merge_env();

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Server configuration
        if let Ok(host) = env::var("SIFT_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("SIFT_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        // Sandbox configuration
        if let Ok(base_dir) = env::var("SIFT_BASE_DIR") {
            self.sandbox.base_dir = PathBuf::from(base_dir);
        }
        if let Ok(follow) = env::var("SIFT_FOLLOW_SYMLINKS") {
            if let Ok(f) = follow.parse() {
                self.sandbox.follow_symlinks = f;
            }
        }

        // Limits configuration
        if let Ok(max_entries) = env::var("SIFT_MAX_ENTRIES") {
            if let Ok(n) = max_entries.parse() {
                self.limits.max_entries = n;
            }
        }
        if let Ok(max_depth) = env::var("SIFT_MAX_DEPTH") {
            if let Ok(n) = max_depth.parse() {
                self.limits.max_depth = n;
            }
        }

        // Events configuration
        if let Ok(interval) = env::var("SIFT_HEARTBEAT_INTERVAL_SECS") {
            if let Ok(secs) = interval.parse() {
                self.events.heartbeat_interval_secs = secs;
            }
        }
        if let Ok(delay) = env::var("SIFT_TOOL_UPDATE_DELAY_SECS") {
            if let Ok(secs) = delay.parse() {
                self.events.tool_update_delay_secs = secs;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(SiftError::ConfigError("Port must be non-zero".to_string()));
        }

        if self.sandbox.base_dir.as_os_str().is_empty() {
            return Err(SiftError::ConfigError(
                "Base directory must not be empty".to_string(),
            ));
        }

        if self.limits.max_entries == 0 {
            return Err(SiftError::ConfigError(
                "Max entries must be non-zero".to_string(),
            ));
        }

        if self.limits.max_depth == 0 {
            return Err(SiftError::ConfigError(
                "Max depth must be non-zero".to_string(),
            ));
        }

        if self.events.heartbeat_interval_secs == 0 {
            return Err(SiftError::ConfigError(
                "Heartbeat interval must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen: {}:{}", self.server.host, self.server.port);
        tracing::info!("  Base dir: {:?}", self.sandbox.base_dir);
        tracing::info!("  Follow symlinks: {}", self.sandbox.follow_symlinks);
        tracing::info!("  Max entries: {}", self.limits.max_entries);
        tracing::info!("  Max depth: {}", self.limits.max_depth);
        tracing::info!(
            "  Heartbeat interval: {}s",
            self.events.heartbeat_interval_secs
        );
        tracing::info!("  Tool update delay: {}s", self.events.tool_update_delay_secs);
    }
}
