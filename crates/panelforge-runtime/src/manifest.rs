//! Extension manifest parsing.
//!
//! The source text served at an extension's URL is a `manifest.toml`-style
//! document describing the extension and naming the entry point the host
//! should run for it.

use crate::error::{RuntimeError, RuntimeResult};
use serde::{Deserialize, Serialize};

/// Extension manifest structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionManifest {
    /// Extension metadata.
    pub extension: ExtensionMetadata,
}

/// Extension metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionMetadata {
    /// Unique identifier for the extension.
    pub id: String,

    /// Human-readable name.
    pub name: String,

    /// Version string (semver).
    pub version: String,

    /// Extension description.
    #[serde(default)]
    pub description: Option<String>,

    /// Extension author(s).
    #[serde(default)]
    pub authors: Vec<String>,

    /// Homepage URL.
    #[serde(default)]
    pub homepage: Option<String>,

    /// Name of the program to run (defaults to the extension ID).
    #[serde(default)]
    pub entry_point: Option<String>,
}

impl ExtensionManifest {
    /// Parse a manifest from a TOML string.
    pub fn parse(content: &str) -> RuntimeResult<Self> {
        let manifest: ExtensionManifest = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate the manifest.
    fn validate(&self) -> RuntimeResult<()> {
        if self.extension.id.trim().is_empty() {
            return Err(RuntimeError::InvalidManifest(
                "Extension ID cannot be empty".to_string(),
            ));
        }

        if self.extension.name.trim().is_empty() {
            return Err(RuntimeError::InvalidManifest(
                "Extension name cannot be empty".to_string(),
            ));
        }

        if self.extension.version.trim().is_empty() {
            return Err(RuntimeError::InvalidManifest(
                "Extension version cannot be empty".to_string(),
            ));
        }

        if matches!(&self.extension.entry_point, Some(entry) if entry.trim().is_empty()) {
            return Err(RuntimeError::InvalidManifest(
                "Entry point cannot be empty when given".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the name of the program this extension runs.
    pub fn entry_point(&self) -> &str {
        self.extension
            .entry_point
            .as_deref()
            .unwrap_or(&self.extension.id)
    }
}
