//! Error types for the panelforge runtime.

use thiserror::Error;

/// Errors that can occur while retrieving or resolving an extension.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The transport failed before a response was received.
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The server answered with a non-success status.
    #[error("Fetching {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// Failed to parse or validate an extension manifest.
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    /// The manifest names an entry point the host does not provide.
    #[error("Unknown entry point: {0}")]
    UnknownEntryPoint(String),

    /// An event or panel name outside the closed vocabulary.
    #[error("Unknown {kind}: {name}")]
    UnknownName { kind: &'static str, name: String },

    /// No tokio runtime to schedule deferred work on.
    #[error("No async runtime available: {0}")]
    NoAsyncRuntime(String),

    /// TOML parsing error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = std::result::Result<T, RuntimeError>;
