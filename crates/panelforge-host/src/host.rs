//! The host instance.
//!
//! [`ExtensionHost`] is the aggregate root embedders hold on to. It owns the
//! event bus, both registries, the extension list and the loader, and is the
//! only place lifecycle operations (initialize, emit, destroy) are exposed.

use crate::bus::{EventBus, Phase};
use crate::config::{ExtensionDescriptor, HostConfig};
use crate::hooks::HostHooks;
use crate::loader::{ExtensionLoader, LoadReport};
use crate::log::HostLog;
use crate::program::ProgramCatalog;
use crate::registry::{ExportRowRegistry, PanelTabKey, PanelTabRegistry};
use crate::scheduler::{Scheduler, TokioScheduler};
use crate::surface::ExtensionApi;
use panelforge_runtime::{EventType, HttpFetcher, Payload, RuntimeResult, SourceFetcher};
use parking_lot::Mutex;
use std::sync::Arc;

/// State shared between the host and the capability surfaces it hands out.
pub(crate) struct HostCore {
    pub(crate) bus: EventBus,
    pub(crate) export_rows: ExportRowRegistry,
    pub(crate) panel_tabs: PanelTabRegistry,
    pub(crate) log: HostLog,
}

struct HostInner {
    config: HostConfig,
    core: Arc<HostCore>,
    extensions: Mutex<Vec<ExtensionDescriptor>>,
    loader: ExtensionLoader,
}

/// An extension host bound to one dashboard.
///
/// Cloning yields another handle to the same instance.
///
/// # Example
///
/// ```no_run
/// use panelforge_host::{ExtensionDescriptor, ExtensionHost, HostConfig};
/// use panelforge_runtime::EventType;
/// use serde_json::json;
///
/// # async fn example() -> panelforge_runtime::RuntimeResult<()> {
/// let host = ExtensionHost::builder()
///     .extension(ExtensionDescriptor::new("https://ext.example/csv.toml", "csv-export"))
///     .config(HostConfig { debug: true, ..HostConfig::default() })
///     .build()?;
///
/// // Queued until every extension has loaded.
/// host.emit(EventType::Load, json!({ "page": "/" }));
/// host.initialize().await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ExtensionHost {
    inner: Arc<HostInner>,
}

impl ExtensionHost {
    pub fn builder() -> HostBuilder {
        HostBuilder::default()
    }

    pub fn config(&self) -> &HostConfig {
        &self.inner.config
    }

    /// Extension descriptors, in load order.
    pub fn extensions(&self) -> Vec<ExtensionDescriptor> {
        self.inner.extensions.lock().clone()
    }

    pub fn phase(&self) -> Phase {
        self.inner.core.bus.phase()
    }

    pub fn is_ready(&self) -> bool {
        self.phase() == Phase::Ready
    }

    /// Load every extension and become ready.
    ///
    /// Returns `None` without doing anything when the host is disabled or
    /// was already initialized, and `None` if the host was destroyed while
    /// extensions were loading. Otherwise returns once all extensions have
    /// settled and the queued events have been flushed.
    pub async fn initialize(&self) -> Option<LoadReport> {
        let core = &self.inner.core;

        if self.inner.config.disabled {
            core.log.info("Extensions are disabled, not loading");
            return None;
        }

        if let Err(phase) = core.bus.begin_loading() {
            core.log
                .info(format_args!("Already initialized ({:?}), ignoring", phase));
            return None;
        }

        let descriptors = self.extensions();
        core.log
            .info(format_args!("Loading {} extension(s)", descriptors.len()));

        let report = self
            .inner
            .loader
            .load_all(
                &descriptors,
                |identity| ExtensionApi::new(identity, Arc::clone(core)),
                &core.log,
            )
            .await;

        let flushed = core.bus.mark_ready();
        if core.bus.phase() == Phase::Destroyed {
            core.log.warn(format_args!(
                "Host destroyed while loading, {} extension(s) settled",
                report.total()
            ));
            return None;
        }
        core.log.info(format_args!(
            "Ready: {} loaded, {} fell back, {} failed, {} queued event(s) flushed",
            report.loaded.len(),
            report.fallbacks.len(),
            report.failed.len(),
            flushed
        ));

        Some(report)
    }

    /// Emit an event to extensions, queueing it if the host is not ready.
    pub fn emit(&self, event: EventType, payload: Payload) {
        self.inner.core.bus.emit(event, payload);
    }

    /// Tear the instance down.
    ///
    /// Clears listeners, queued events, the extension list and both
    /// registries. Hooks are not called for the cleared registrations, and
    /// capability surfaces still held by extensions are refused from here on.
    pub fn destroy(&self) {
        let core = &self.inner.core;
        core.bus.destroy();
        self.inner.extensions.lock().clear();
        let rows = core.export_rows.close();
        let tabs = core.panel_tabs.close();
        core.log.info(format_args!(
            "Destroyed host ({} export row(s), {} panel tab(s) dropped)",
            rows, tabs
        ));
    }

    /// Build the capability surface for `identity`.
    ///
    /// The loader uses this for every fetched extension; embedders can use
    /// it to attach extensions compiled into the dashboard itself.
    pub fn capability_surface(&self, identity: &str) -> ExtensionApi {
        ExtensionApi::new(identity, Arc::clone(&self.inner.core))
    }

    /// Number of events waiting for readiness.
    pub fn pending_len(&self) -> usize {
        self.inner.core.bus.pending_len()
    }

    pub fn listener_count(&self, event: EventType) -> usize {
        self.inner.core.bus.listener_count(event)
    }

    /// Registered export row names, sorted.
    pub fn export_rows(&self) -> Vec<String> {
        self.inner.core.export_rows.names()
    }

    /// Registered panel tabs, sorted.
    pub fn panel_tabs(&self) -> Vec<PanelTabKey> {
        self.inner.core.panel_tabs.keys()
    }
}

/// Builder for [`ExtensionHost`].
#[derive(Default)]
pub struct HostBuilder {
    extensions: Vec<ExtensionDescriptor>,
    config: HostConfig,
    hooks: Option<Arc<dyn HostHooks>>,
    fetcher: Option<Arc<dyn SourceFetcher>>,
    scheduler: Option<Arc<dyn Scheduler>>,
    catalog: ProgramCatalog,
}

impl HostBuilder {
    /// Append an extension to the load list.
    pub fn extension(mut self, descriptor: ExtensionDescriptor) -> Self {
        self.extensions.push(descriptor);
        self
    }

    pub fn extensions(mut self, descriptors: impl IntoIterator<Item = ExtensionDescriptor>) -> Self {
        self.extensions.extend(descriptors);
        self
    }

    pub fn config(mut self, config: HostConfig) -> Self {
        self.config = config;
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn HostHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Source fetcher (defaults to [`HttpFetcher`]).
    pub fn fetcher(mut self, fetcher: Arc<dyn SourceFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Listener scheduler (defaults to a [`TokioScheduler`] on the runtime
    /// `build` is called from).
    pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Programs extension manifests may name as their entry point.
    pub fn catalog(mut self, catalog: ProgramCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Fails if no scheduler was given and the caller is not running on a
    /// tokio runtime.
    pub fn build(self) -> RuntimeResult<ExtensionHost> {
        let fetcher: Arc<dyn SourceFetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpFetcher::new()?),
        };
        let scheduler: Arc<dyn Scheduler> = match self.scheduler {
            Some(scheduler) => scheduler,
            None => Arc::new(TokioScheduler::try_current()?),
        };

        let log = HostLog::new(self.config.debug);
        let core = Arc::new(HostCore {
            bus: EventBus::new(&self.config, scheduler, log.clone()),
            export_rows: ExportRowRegistry::new(self.hooks.clone()),
            panel_tabs: PanelTabRegistry::new(self.hooks),
            log,
        });

        Ok(ExtensionHost {
            inner: Arc::new(HostInner {
                config: self.config,
                core,
                extensions: Mutex::new(self.extensions),
                loader: ExtensionLoader::new(fetcher, Arc::new(self.catalog)),
            }),
        })
    }
}
