//! # panelforge-host
//!
//! In-process extension host for panelforge dashboards.
//!
//! This crate loads extensions by URL and gives each one a capability
//! surface through which it can:
//!
//! - Listen for dashboard events (`load`, `filters-update`, ...)
//! - Add rows to the export menu
//! - Add, update and remove tabs on dashboard panels
//! - Write debug logs tagged with its identity
//!
//! ## Lifecycle
//!
//! Events emitted before [`ExtensionHost::initialize`] completes are queued
//! and delivered in order once every extension has loaded. Extensions that
//! fail to load are replaced with a no-op program; the host itself never
//! returns an error from its runtime surface.

pub mod bus;
pub mod config;
pub mod hooks;
pub mod host;
pub mod loader;
pub mod log;
pub mod program;
pub mod registry;
pub mod scheduler;
pub mod surface;

pub use bus::{EventBus, PendingEmission, Phase};
pub use config::{DispatchMode, ExtensionDescriptor, HostConfig};
pub use hooks::{Callback, HostHooks};
pub use host::{ExtensionHost, HostBuilder};
pub use loader::{ExtensionLoader, LoadOutcome, LoadReport};
pub use log::{HostLog, LogLevel};
pub use program::{ExtensionProgram, FnProgram, NoopProgram, ProgramCatalog};
pub use registry::{ExportRowRegistry, PanelTabKey, PanelTabRegistry};
pub use scheduler::{QueuedScheduler, Scheduler, Task, TokioScheduler};
pub use surface::ExtensionApi;
