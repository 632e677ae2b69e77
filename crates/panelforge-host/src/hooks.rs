//! Callbacks the embedding dashboard provides to mutate its UI.
//!
//! The registries only decide whether a mutation is allowed; presentation is
//! entirely the embedder's business and happens through these hooks.

use crate::registry::PanelTabKey;
use panelforge_runtime::Payload;
use std::sync::Arc;

/// Callback taking an opaque payload. Used for event listeners and export
/// row handlers.
pub type Callback = Arc<dyn Fn(Payload) + Send + Sync>;

/// UI hooks implemented by the embedding dashboard.
///
/// Every method defaults to a no-op so embedders only implement what they
/// render.
pub trait HostHooks: Send + Sync {
    /// A new export row was registered. `handler` runs when the user picks
    /// the row.
    fn on_add_export_data_row(&self, _name: &str, _handler: Callback) {}

    fn on_remove_export_data_row(&self, _name: &str) {}

    fn on_add_panel_tab(&self, _tab: &PanelTabKey, _title: &str, _content: &Payload) {}

    fn on_update_panel_tab(&self, _tab: &PanelTabKey, _content: &Payload) {}

    fn on_remove_panel_tab(&self, _tab: &PanelTabKey) {}
}
