//! Configuration file loading and management
//!
//! This module handles loading and parsing the daemon configuration from
//! `$XDG_CONFIG_HOME/panelforge/config.toml`. If the configuration file doesn't
//! exist, a default configuration is created with documented comments.

use anyhow::{Context, Result};
use panelforge_host::{ExtensionDescriptor, HostConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main daemon configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Daemon-specific configuration
    pub daemon: DaemonConfig,
    /// Extension host configuration
    #[serde(default)]
    pub host: HostConfig,
    /// Extensions to load, in order
    #[serde(default)]
    pub extensions: Vec<ExtensionDescriptor>,
}

/// Daemon process configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DaemonConfig {
    /// Log level (trace, debug, info, warn, error)
    /// Default: "info"
    pub log_level: String,
    /// Timeout for fetching an extension source, in seconds
    /// Default: 15
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_fetch_timeout_secs() -> u64 {
    15
}

impl Default for Config {
    fn default() -> Self {
        Self {
            daemon: DaemonConfig::default(),
            host: HostConfig::default(),
            extensions: Vec::new(),
        }
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from the specified path
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// The parsed configuration or an error if loading/parsing fails
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default XDG config location
    ///
    /// If the configuration file doesn't exist, creates a default configuration
    /// file with documented comments.
    pub fn load_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_file(&config_path)?;
        }

        Self::load(&config_path)
    }

    /// Get the default configuration file path
    ///
    /// Returns `$XDG_CONFIG_HOME/panelforge/config.toml`
    pub fn default_config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "raibid-labs", "panelforge")
            .context("Failed to determine project directories")?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Create a default configuration file with documented comments
    pub fn create_default_file(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, Self::default_config_content())
            .with_context(|| format!("Failed to write default config file: {}", path.display()))?;

        tracing::info!("Created default configuration file at: {}", path.display());
        Ok(())
    }

    /// Generate the default configuration file content with comments
    fn default_config_content() -> String {
        r#"# Panelforge Daemon Configuration
# This file configures which extensions the daemon loads and how.

[daemon]
# Log level: trace, debug, info, warn, error
# RUST_LOG takes precedence when set.
# Default: "info"
log_level = "info"

# Seconds to wait for an extension source before giving up on it
# Default: 15
fetch_timeout_secs = 15

[host]
# Print host diagnostics and extension debug messages
# Default: false
debug = false

# Never load extensions; emitted events stay queued
# Default: false
disabled = false

# Delay before an event listener runs, in milliseconds
# Default: 100
dispatch_delay_ms = 100

# per_extension: every extension keeps its own listener per event
# single: one listener per event, last registration wins
# Default: "per_extension"
dispatch_mode = "per_extension"

# Extensions are loaded in the order listed. Each URL must serve a
# manifest naming one of the daemon's built-in entry points:
#
#   [extension]
#   id = "page-export"
#   name = "Page Export"
#   version = "0.1.0"
#
# [[extensions]]
# identity = "page-export"
# url = "https://extensions.example.com/page-export.toml"
#
# [[extensions]]
# identity = "referrer-notes"
# url = "https://extensions.example.com/referrer-notes.toml"
"#
        .to_string()
    }

    /// Validate the configuration
    ///
    /// Ensures all configuration values are valid and within acceptable ranges.
    pub fn validate(&self) -> Result<()> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.daemon.log_level.as_str()) {
            anyhow::bail!(
                "Invalid log_level: {}. Must be one of: {}",
                self.daemon.log_level,
                valid_log_levels.join(", ")
            );
        }

        if self.daemon.fetch_timeout_secs == 0 {
            anyhow::bail!("daemon.fetch_timeout_secs must be greater than 0");
        }

        let mut identities = HashSet::new();
        for (index, extension) in self.extensions.iter().enumerate() {
            if extension.identity.trim().is_empty() {
                anyhow::bail!("extensions[{}]: identity cannot be empty", index);
            }
            if extension.url.trim().is_empty() {
                anyhow::bail!(
                    "Extension '{}': url cannot be empty",
                    extension.identity
                );
            }
            if !identities.insert(extension.identity.as_str()) {
                anyhow::bail!(
                    "Extension identity '{}' is listed more than once",
                    extension.identity
                );
            }
        }

        Ok(())
    }

    /// Extension fetch timeout as a `Duration`
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.daemon.fetch_timeout_secs)
    }
}
