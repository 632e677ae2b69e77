//! The capability surface handed to each extension.
//!
//! An [`ExtensionApi`] is built fresh for one extension identity and exposes
//! only listener, export-row and panel-tab management plus debug logging.
//! Host lifecycle operations (initialize, destroy, emit) are not reachable
//! from it.

use crate::hooks::Callback;
use crate::host::HostCore;
use crate::log::HostLog;
use crate::registry::PanelTabKey;
use panelforge_runtime::{EventType, PanelId, Payload};
use std::fmt;
use std::sync::Arc;

/// Identity-bound view of the host for one extension.
#[derive(Clone)]
pub struct ExtensionApi {
    identity: Arc<str>,
    core: Arc<HostCore>,
    log: HostLog,
}

impl ExtensionApi {
    pub(crate) fn new(identity: &str, core: Arc<HostCore>) -> Self {
        let log = core.log.scoped(identity);
        Self {
            identity: Arc::from(identity),
            core,
            log,
        }
    }

    /// Identity this surface is bound to.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Listen for `event`. Replaces this extension's previous listener for
    /// the same event.
    pub fn add_event_listener<F>(&self, event: EventType, listener: F) -> bool
    where
        F: Fn(Payload) + Send + Sync + 'static,
    {
        let listener: Callback = Arc::new(listener);
        self.core
            .bus
            .add_listener(event, &self.identity, listener, &self.log)
    }

    /// Stop listening for `event`.
    pub fn remove_event_listener(&self, event: EventType) -> bool {
        self.core
            .bus
            .remove_listener(event, &self.identity, &self.log)
    }

    /// Add a row to the dashboard's export menu.
    ///
    /// Row names are global: a name another extension already uses is
    /// rejected.
    pub fn add_export_data_row<F>(&self, name: &str, handler: F) -> bool
    where
        F: Fn(Payload) + Send + Sync + 'static,
    {
        let handler: Callback = Arc::new(handler);
        self.core.export_rows.add(name, handler, &self.log)
    }

    pub fn remove_export_data_row(&self, name: &str) -> bool {
        self.core.export_rows.remove(name, &self.log)
    }

    /// Add a tab to `panel`. Each extension may own one tab per panel.
    pub fn add_panel_tab(&self, panel: PanelId, title: &str, content: Payload) -> bool {
        self.core
            .panel_tabs
            .add(self.tab_key(panel), title, &content, &self.log)
    }

    /// Replace the content of this extension's tab on `panel`.
    pub fn update_panel_tab(&self, panel: PanelId, content: Payload) -> bool {
        self.core
            .panel_tabs
            .update(&self.tab_key(panel), &content, &self.log)
    }

    pub fn remove_panel_tab(&self, panel: PanelId) -> bool {
        self.core
            .panel_tabs
            .remove(&self.tab_key(panel), &self.log)
    }

    /// Log a message tagged with this extension's identity. Only printed
    /// when the host runs in debug mode.
    pub fn debug(&self, message: impl fmt::Display) {
        self.log.debug(message);
    }

    fn tab_key(&self, panel: PanelId) -> PanelTabKey {
        PanelTabKey::new(&*self.identity, panel)
    }
}

impl fmt::Debug for ExtensionApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionApi")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}
