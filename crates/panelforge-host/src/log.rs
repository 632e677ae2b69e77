//! Debug-gated logging.
//!
//! The host never raises to its callers; everything that goes wrong is
//! reported here instead, and only when the instance runs with `debug`.

use std::fmt::Display;
use std::sync::Arc;

/// Log level for host and extension messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

const HOST_SCOPE: &str = "host";

/// A `tracing` front end that is silent unless enabled.
#[derive(Debug, Clone)]
pub struct HostLog {
    enabled: bool,
    scope: Arc<str>,
}

impl HostLog {
    /// Create a host-scoped logger.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            scope: Arc::from(HOST_SCOPE),
        }
    }

    /// A logger that tags every message with an extension identity.
    pub fn scoped(&self, identity: &str) -> Self {
        Self {
            enabled: self.enabled,
            scope: Arc::from(identity),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Identity this logger reports under (`host` for the instance itself).
    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn log(&self, level: LogLevel, message: impl Display) {
        if !self.enabled {
            return;
        }

        let scope = &*self.scope;
        match level {
            LogLevel::Trace => tracing::trace!(extension = %scope, "{}", message),
            LogLevel::Debug => tracing::debug!(extension = %scope, "{}", message),
            LogLevel::Info => tracing::info!(extension = %scope, "{}", message),
            LogLevel::Warn => tracing::warn!(extension = %scope, "{}", message),
            LogLevel::Error => tracing::error!(extension = %scope, "{}", message),
        }
    }

    pub fn debug(&self, message: impl Display) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: impl Display) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: impl Display) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: impl Display) {
        self.log(LogLevel::Error, message);
    }
}
