//! Name registries for extension-contributed UI.
//!
//! Both registries enforce uniqueness and forward accepted mutations to the
//! embedder's [`HostHooks`]. Rejected mutations are logged and otherwise
//! have no effect. A closed registry rejects everything.

use crate::hooks::{Callback, HostHooks};
use crate::log::HostLog;
use panelforge_runtime::{PanelId, Payload};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

struct Entries<T> {
    set: BTreeSet<T>,
    closed: bool,
}

impl<T: Ord> Entries<T> {
    fn new() -> Self {
        Self {
            set: BTreeSet::new(),
            closed: false,
        }
    }

    fn close(&mut self) -> usize {
        let count = self.set.len();
        self.set.clear();
        self.closed = true;
        count
    }
}

/// Registry of export rows, keyed by display name.
pub struct ExportRowRegistry {
    names: Mutex<Entries<String>>,
    hooks: Option<Arc<dyn HostHooks>>,
}

impl ExportRowRegistry {
    /// Create an empty registry forwarding to `hooks`.
    pub fn new(hooks: Option<Arc<dyn HostHooks>>) -> Self {
        Self {
            names: Mutex::new(Entries::new()),
            hooks,
        }
    }

    /// Register an export row. Returns `false` if the name is taken or the
    /// registry is closed.
    pub fn add(&self, name: &str, handler: Callback, log: &HostLog) -> bool {
        {
            let mut names = self.names.lock();
            if names.closed {
                drop(names);
                log.warn(format_args!("Host destroyed, ignoring export data row '{}'", name));
                return false;
            }
            if !names.set.insert(name.to_string()) {
                drop(names);
                log.warn(format_args!("Export data row '{}' already exists", name));
                return false;
            }
        }

        log.debug(format_args!("Added export data row '{}'", name));
        if let Some(hooks) = &self.hooks {
            hooks.on_add_export_data_row(name, handler);
        }
        true
    }

    /// Remove an export row. Returns `false` if it was never registered.
    pub fn remove(&self, name: &str, log: &HostLog) -> bool {
        {
            let mut names = self.names.lock();
            if names.closed {
                drop(names);
                log.warn(format_args!("Host destroyed, ignoring removal of '{}'", name));
                return false;
            }
            if !names.set.remove(name) {
                drop(names);
                log.warn(format_args!("Export data row '{}' does not exist", name));
                return false;
            }
        }

        log.debug(format_args!("Removed export data row '{}'", name));
        if let Some(hooks) = &self.hooks {
            hooks.on_remove_export_data_row(name);
        }
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.lock().set.contains(name)
    }

    /// Registered row names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.names.lock().set.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.names.lock().set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.lock().set.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.names.lock().closed
    }

    /// Forget every row without notifying the hooks and refuse further
    /// mutations. Returns how many rows were dropped.
    pub fn close(&self) -> usize {
        self.names.lock().close()
    }
}

/// Key of a panel tab: the owning extension plus the panel it lives on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelTabKey {
    pub identity: String,
    pub panel: PanelId,
}

impl PanelTabKey {
    pub fn new(identity: impl Into<String>, panel: PanelId) -> Self {
        Self {
            identity: identity.into(),
            panel,
        }
    }
}

impl fmt::Display for PanelTabKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.identity, self.panel)
    }
}

/// Registry of panel tabs, keyed by (identity, panel).
pub struct PanelTabRegistry {
    keys: Mutex<Entries<PanelTabKey>>,
    hooks: Option<Arc<dyn HostHooks>>,
}

impl PanelTabRegistry {
    /// Create an empty registry forwarding to `hooks`.
    pub fn new(hooks: Option<Arc<dyn HostHooks>>) -> Self {
        Self {
            keys: Mutex::new(Entries::new()),
            hooks,
        }
    }

    /// Register a tab. Returns `false` if this extension already has a tab
    /// on the panel or the registry is closed.
    pub fn add(&self, key: PanelTabKey, title: &str, content: &Payload, log: &HostLog) -> bool {
        {
            let mut keys = self.keys.lock();
            if keys.closed {
                drop(keys);
                log.warn(format_args!("Host destroyed, ignoring panel tab '{}'", key));
                return false;
            }
            if !keys.set.insert(key.clone()) {
                drop(keys);
                log.warn(format_args!("Panel tab '{}' already exists", key));
                return false;
            }
        }

        log.debug(format_args!("Added panel tab '{}'", key));
        if let Some(hooks) = &self.hooks {
            hooks.on_add_panel_tab(&key, title, content);
        }
        true
    }

    /// Replace the content of an existing tab. The registry itself is
    /// unchanged.
    pub fn update(&self, key: &PanelTabKey, content: &Payload, log: &HostLog) -> bool {
        {
            let keys = self.keys.lock();
            if keys.closed {
                drop(keys);
                log.warn(format_args!("Host destroyed, ignoring update of '{}'", key));
                return false;
            }
            if !keys.set.contains(key) {
                drop(keys);
                log.warn(format_args!("Panel tab '{}' does not exist", key));
                return false;
            }
        }

        if let Some(hooks) = &self.hooks {
            hooks.on_update_panel_tab(key, content);
        }
        true
    }

    /// Remove a tab. Returns `false` if it was never registered.
    pub fn remove(&self, key: &PanelTabKey, log: &HostLog) -> bool {
        {
            let mut keys = self.keys.lock();
            if keys.closed {
                drop(keys);
                log.warn(format_args!("Host destroyed, ignoring removal of '{}'", key));
                return false;
            }
            if !keys.set.remove(key) {
                drop(keys);
                log.warn(format_args!("Panel tab '{}' does not exist", key));
                return false;
            }
        }

        log.debug(format_args!("Removed panel tab '{}'", key));
        if let Some(hooks) = &self.hooks {
            hooks.on_remove_panel_tab(key);
        }
        true
    }

    pub fn contains(&self, key: &PanelTabKey) -> bool {
        self.keys.lock().set.contains(key)
    }

    /// Registered tab keys, sorted by identity then panel.
    pub fn keys(&self) -> Vec<PanelTabKey> {
        self.keys.lock().set.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.keys.lock().set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.lock().set.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.keys.lock().closed
    }

    /// Forget every tab without notifying the hooks and refuse further
    /// mutations.
    pub fn close(&self) -> usize {
        self.keys.lock().close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Default)]
    struct CountingHooks {
        rows_added: Mutex<Vec<String>>,
        rows_removed: Mutex<Vec<String>>,
        tabs_added: Mutex<Vec<String>>,
        tabs_updated: Mutex<Vec<(String, Payload)>>,
        tabs_removed: Mutex<Vec<String>>,
    }

    impl HostHooks for CountingHooks {
        fn on_add_export_data_row(&self, name: &str, _handler: Callback) {
            self.rows_added.lock().push(name.to_string());
        }

        fn on_remove_export_data_row(&self, name: &str) {
            self.rows_removed.lock().push(name.to_string());
        }

        fn on_add_panel_tab(&self, tab: &PanelTabKey, _title: &str, _content: &Payload) {
            self.tabs_added.lock().push(tab.to_string());
        }

        fn on_update_panel_tab(&self, tab: &PanelTabKey, content: &Payload) {
            self.tabs_updated.lock().push((tab.to_string(), content.clone()));
        }

        fn on_remove_panel_tab(&self, tab: &PanelTabKey) {
            self.tabs_removed.lock().push(tab.to_string());
        }
    }

    fn noop_handler() -> Callback {
        Arc::new(|_: Payload| {})
    }

    #[test]
    fn test_export_row_duplicate_rejected() {
        let hooks = Arc::new(CountingHooks::default());
        let registry = ExportRowRegistry::new(Some(hooks.clone()));
        let log = HostLog::new(false);

        assert!(registry.add("Export CSV", noop_handler(), &log));
        assert!(!registry.add("Export CSV", noop_handler(), &log));

        assert_eq!(registry.len(), 1);
        assert_eq!(*hooks.rows_added.lock(), vec!["Export CSV".to_string()]);
    }

    #[test]
    fn test_export_row_remove_absent() {
        let hooks = Arc::new(CountingHooks::default());
        let registry = ExportRowRegistry::new(Some(hooks.clone()));
        let log = HostLog::new(false);

        assert!(!registry.remove("Export PDF", &log));
        assert!(hooks.rows_removed.lock().is_empty());

        registry.add("Export PDF", noop_handler(), &log);
        assert!(registry.remove("Export PDF", &log));
        assert!(registry.is_empty());
        assert_eq!(*hooks.rows_removed.lock(), vec!["Export PDF".to_string()]);

        // A removed name can be registered again.
        assert!(registry.add("Export PDF", noop_handler(), &log));
    }

    #[test]
    fn test_registry_without_hooks_still_tracks_names() {
        let registry = ExportRowRegistry::new(None);
        let log = HostLog::new(false);

        assert!(registry.add("b", noop_handler(), &log));
        assert!(registry.add("a", noop_handler(), &log));
        assert_eq!(registry.names(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(registry.close(), 2);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_closed_registries_reject_and_stay_silent() {
        let hooks = Arc::new(CountingHooks::default());
        let rows = ExportRowRegistry::new(Some(hooks.clone()));
        let tabs = PanelTabRegistry::new(Some(hooks.clone()));
        let log = HostLog::new(false);
        let key = PanelTabKey::new("ext-a", PanelId::Pages);

        rows.add("Export CSV", noop_handler(), &log);
        tabs.add(key.clone(), "Notes", &json!(null), &log);
        assert_eq!(rows.close(), 1);
        assert_eq!(tabs.close(), 1);
        assert!(rows.is_closed() && tabs.is_closed());

        assert!(!rows.add("Export CSV", noop_handler(), &log));
        assert!(!rows.remove("Export CSV", &log));
        assert!(!tabs.add(key.clone(), "Notes", &json!(null), &log));
        assert!(!tabs.update(&key, &json!(1), &log));
        assert!(!tabs.remove(&key, &log));

        assert!(rows.is_empty() && tabs.is_empty());
        assert_eq!(hooks.rows_added.lock().len(), 1);
        assert_eq!(hooks.tabs_added.lock().len(), 1);
        assert!(hooks.rows_removed.lock().is_empty());
        assert!(hooks.tabs_updated.lock().is_empty());
        assert!(hooks.tabs_removed.lock().is_empty());
    }

    #[test]
    fn test_panel_tab_composite_key() {
        let hooks = Arc::new(CountingHooks::default());
        let registry = PanelTabRegistry::new(Some(hooks.clone()));
        let log = HostLog::new(false);

        let first = PanelTabKey::new("ext-a", PanelId::Pages);
        let second = PanelTabKey::new("ext-b", PanelId::Pages);

        assert!(registry.add(first.clone(), "Notes", &json!(null), &log));
        assert!(registry.add(second.clone(), "Notes", &json!(null), &log));
        assert!(!registry.add(first.clone(), "Notes again", &json!(null), &log));

        assert_eq!(registry.len(), 2);
        assert_eq!(
            *hooks.tabs_added.lock(),
            vec!["ext-a-pages".to_string(), "ext-b-pages".to_string()]
        );
    }

    #[test]
    fn test_panel_tab_update_requires_existing() {
        let hooks = Arc::new(CountingHooks::default());
        let registry = PanelTabRegistry::new(Some(hooks.clone()));
        let log = HostLog::new(false);
        let key = PanelTabKey::new("ext-a", PanelId::Referrers);

        assert!(!registry.update(&key, &json!({"rows": 1}), &log));
        assert!(hooks.tabs_updated.lock().is_empty());

        registry.add(key.clone(), "Referrer notes", &json!({"rows": 0}), &log);
        assert!(registry.update(&key, &json!({"rows": 2}), &log));
        assert_eq!(registry.len(), 1);
        assert_eq!(
            *hooks.tabs_updated.lock(),
            vec![("ext-a-referrers".to_string(), json!({"rows": 2}))]
        );
    }

    #[test]
    fn test_panel_tab_remove() {
        let hooks = Arc::new(CountingHooks::default());
        let registry = PanelTabRegistry::new(Some(hooks.clone()));
        let log = HostLog::new(false);
        let key = PanelTabKey::new("ext-a", PanelId::Os);

        assert!(!registry.remove(&key, &log));
        registry.add(key.clone(), "OS", &json!(null), &log);
        assert!(registry.remove(&key, &log));
        assert!(!registry.contains(&key));
        assert_eq!(*hooks.tabs_removed.lock(), vec!["ext-a-os".to_string()]);
    }
}
