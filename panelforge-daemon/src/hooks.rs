//! Host hooks for running without a dashboard.
//!
//! The daemon has no UI to mutate, so every registration the extensions make
//! is logged and the export handlers are kept so they can be triggered.

use panelforge_host::{Callback, HostHooks, PanelTabKey};
use panelforge_runtime::Payload;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use tracing::info;

/// Hooks that log every UI mutation.
#[derive(Default)]
pub struct LoggingHooks {
    export_handlers: Mutex<BTreeMap<String, Callback>>,
}

impl LoggingHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the export rows currently shown.
    pub fn export_rows(&self) -> Vec<String> {
        self.export_handlers.lock().keys().cloned().collect()
    }

    /// Run the handler behind an export row, as if the user picked it.
    ///
    /// Returns `false` if no row with that name is shown.
    pub fn trigger_export(&self, name: &str, payload: Payload) -> bool {
        let handler = self.export_handlers.lock().get(name).cloned();

        match handler {
            Some(handler) => {
                handler(payload);
                true
            }
            None => false,
        }
    }
}

impl HostHooks for LoggingHooks {
    fn on_add_export_data_row(&self, name: &str, handler: Callback) {
        info!(row = %name, "Export row added");
        self.export_handlers.lock().insert(name.to_string(), handler);
    }

    fn on_remove_export_data_row(&self, name: &str) {
        info!(row = %name, "Export row removed");
        self.export_handlers.lock().remove(name);
    }

    fn on_add_panel_tab(&self, tab: &PanelTabKey, title: &str, content: &Payload) {
        info!(tab = %tab, title = %title, content = %content, "Panel tab added");
    }

    fn on_update_panel_tab(&self, tab: &PanelTabKey, content: &Payload) {
        info!(tab = %tab, content = %content, "Panel tab updated");
    }

    fn on_remove_panel_tab(&self, tab: &PanelTabKey) {
        info!(tab = %tab, "Panel tab removed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_trigger_export() {
        let hooks = LoggingHooks::new();
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        hooks.on_add_export_data_row(
            "Export CSV",
            Arc::new(move |payload: Payload| *sink.lock() = Some(payload)),
        );

        assert_eq!(hooks.export_rows(), vec!["Export CSV".to_string()]);
        assert!(hooks.trigger_export("Export CSV", json!({"range": "30d"})));
        assert_eq!(*seen.lock(), Some(json!({"range": "30d"})));

        hooks.on_remove_export_data_row("Export CSV");
        assert!(!hooks.trigger_export("Export CSV", json!(null)));
    }
}
