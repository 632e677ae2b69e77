//! Extension programs compiled into the daemon.
//!
//! Manifests fetched from extension URLs select one of these by entry point.

use panelforge_host::{ExtensionApi, ProgramCatalog};
use panelforge_runtime::{EventType, PanelId, Payload};
use serde_json::json;

/// Entry point of the page export extension.
pub const PAGE_EXPORT: &str = "page-export";

/// Entry point of the referrer notes extension.
pub const REFERRER_NOTES: &str = "referrer-notes";

/// Catalog with every built-in program registered.
pub fn builtin_catalog() -> ProgramCatalog {
    let mut catalog = ProgramCatalog::new();
    catalog
        .register_fn(PAGE_EXPORT, page_export)
        .register_fn(REFERRER_NOTES, referrer_notes);
    catalog
}

/// Adds an "Export CSV" row and reports the pages it sees loaded.
fn page_export(api: ExtensionApi) {
    let handler_api = api.clone();
    api.add_export_data_row("Export CSV", move |filters| {
        handler_api.debug(format_args!("Exporting pages as CSV with filters {}", filters));
    });

    let listener_api = api.clone();
    api.add_event_listener(EventType::Load, move |payload| {
        let page = payload.get("page").and_then(Payload::as_str).unwrap_or("?");
        listener_api.debug(format_args!("Page loaded: {}", page));
    });
}

/// Keeps a tab on the referrers panel in sync with the active filters.
fn referrer_notes(api: ExtensionApi) {
    api.add_panel_tab(PanelId::Referrers, "Notes", json!({ "filters": null }));

    let listener_api = api.clone();
    api.add_event_listener(EventType::FiltersUpdate, move |filters| {
        listener_api.update_panel_tab(PanelId::Referrers, json!({ "filters": filters }));
    });
}
