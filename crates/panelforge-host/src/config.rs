//! Host configuration and extension descriptors.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How emitted events reach listeners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Each extension keeps its own listener per event type. Delivery is
    /// deferred through the scheduler by the configured delay.
    #[default]
    PerExtension,

    /// One listener per event type; the last registration wins. Delivery
    /// is still deferred through the scheduler, without the extra delay.
    Single,
}

/// Host instance configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Emit host diagnostics and extension debug messages.
    pub debug: bool,

    /// Never load extensions. The host stays uninitialized and queues
    /// every emitted event.
    pub disabled: bool,

    /// Delay before a listener is invoked in `PerExtension` mode.
    /// Default: 100
    pub dispatch_delay_ms: u64,

    /// Listener bookkeeping and delivery strategy.
    pub dispatch_mode: DispatchMode,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            debug: false,
            disabled: false,
            dispatch_delay_ms: 100,
            dispatch_mode: DispatchMode::PerExtension,
        }
    }
}

impl HostConfig {
    /// Listener dispatch delay as a `Duration`.
    pub fn dispatch_delay(&self) -> Duration {
        Duration::from_millis(self.dispatch_delay_ms)
    }
}

/// Where to load an extension from and the identity it runs under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionDescriptor {
    /// URL serving the extension manifest.
    pub url: String,

    /// Namespace for the extension's listeners and panel tabs.
    pub identity: String,
}

impl ExtensionDescriptor {
    pub fn new(url: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            identity: identity.into(),
        }
    }
}
