//! Extension programs and the catalog that resolves them.
//!
//! Extension code is compiled into the embedding application and registered
//! in a [`ProgramCatalog`] under an entry-point name. The source fetched
//! from an extension's URL is a manifest that selects one of those entries.

use crate::surface::ExtensionApi;
use async_trait::async_trait;
use panelforge_runtime::{ExtensionManifest, RuntimeError, RuntimeResult};
use std::collections::HashMap;
use std::sync::Arc;

/// Entry point of an extension.
///
/// `run` receives the extension's capability surface and is considered
/// finished when the returned future completes.
#[async_trait]
pub trait ExtensionProgram: Send + Sync {
    async fn run(&self, api: ExtensionApi);
}

/// Program substituted for extensions that failed to load.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgram;

#[async_trait]
impl ExtensionProgram for NoopProgram {
    async fn run(&self, _api: ExtensionApi) {}
}

/// Adapts a synchronous closure into a program.
pub struct FnProgram<F>(F);

impl<F> FnProgram<F>
where
    F: Fn(ExtensionApi) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> ExtensionProgram for FnProgram<F>
where
    F: Fn(ExtensionApi) + Send + Sync,
{
    async fn run(&self, api: ExtensionApi) {
        (self.0)(api)
    }
}

/// Programs available to extensions, by entry-point name.
#[derive(Default, Clone)]
pub struct ProgramCatalog {
    programs: HashMap<String, Arc<dyn ExtensionProgram>>,
}

impl ProgramCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `program` under `entry_point`, replacing any previous one.
    pub fn register<P>(&mut self, entry_point: impl Into<String>, program: P) -> &mut Self
    where
        P: ExtensionProgram + 'static,
    {
        self.programs.insert(entry_point.into(), Arc::new(program));
        self
    }

    /// Register a synchronous closure under `entry_point`.
    pub fn register_fn<F>(&mut self, entry_point: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(ExtensionApi) + Send + Sync + 'static,
    {
        self.register(entry_point, FnProgram::new(f))
    }

    pub fn contains(&self, entry_point: &str) -> bool {
        self.programs.contains_key(entry_point)
    }

    /// Registered entry-point names, sorted.
    pub fn entry_points(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.programs.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Resolve fetched source text to a program.
    ///
    /// Blank source is the empty program. Anything else must be a manifest
    /// whose entry point is registered.
    pub fn resolve(&self, source: &str) -> RuntimeResult<Arc<dyn ExtensionProgram>> {
        if source.trim().is_empty() {
            return Ok(Arc::new(NoopProgram));
        }

        let manifest = ExtensionManifest::parse(source)?;
        let entry_point = manifest.entry_point();
        self.programs
            .get(entry_point)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownEntryPoint(entry_point.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
[extension]
id = "csv-export"
name = "CSV Export"
version = "0.1.0"
entry_point = "export"
"#;

    #[test]
    fn test_resolve_blank_source() {
        let catalog = ProgramCatalog::new();
        assert!(catalog.resolve("").is_ok());
        assert!(catalog.resolve("  \n").is_ok());
    }

    #[test]
    fn test_resolve_known_entry_point() {
        let mut catalog = ProgramCatalog::new();
        catalog.register_fn("export", |_api| {});

        assert!(catalog.contains("export"));
        assert!(catalog.resolve(MANIFEST).is_ok());
    }

    #[test]
    fn test_resolve_unknown_entry_point() {
        let mut catalog = ProgramCatalog::new();
        catalog.register("something-else", NoopProgram);

        let err = catalog.resolve(MANIFEST).err().unwrap();
        assert!(matches!(err, RuntimeError::UnknownEntryPoint(name) if name == "export"));
    }

    #[test]
    fn test_resolve_garbage() {
        let catalog = ProgramCatalog::new();
        assert!(catalog.resolve("function(api) { }").is_err());
    }

    #[test]
    fn test_entry_points_sorted() {
        let mut catalog = ProgramCatalog::new();
        catalog
            .register("zeta", NoopProgram)
            .register_fn("alpha", |_api| {});
        assert_eq!(catalog.entry_points(), vec!["alpha", "zeta"]);
        assert_eq!(catalog.len(), 2);
    }
}
