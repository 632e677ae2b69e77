//! Extension loading.
//!
//! Each extension is fetched, resolved and run as its own tokio task. A
//! failure anywhere along that path swaps in the no-op program so one broken
//! extension never holds back the others. The loader returns only once every
//! extension has settled.

use crate::config::ExtensionDescriptor;
use crate::log::HostLog;
use crate::program::{ExtensionProgram, NoopProgram, ProgramCatalog};
use crate::surface::ExtensionApi;
use panelforge_runtime::{RuntimeResult, SourceFetcher};
use std::sync::Arc;
use tokio::task::JoinSet;

/// How a single extension ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Its own program ran to completion.
    Loaded,
    /// Retrieval or resolution failed; the no-op program ran instead.
    Fallback,
    /// The program panicked while running.
    Failed,
}

/// Summary of an `initialize` run, by extension identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    pub fallbacks: Vec<String>,
    pub failed: Vec<String>,
}

impl LoadReport {
    fn record(&mut self, identity: String, outcome: LoadOutcome) {
        match outcome {
            LoadOutcome::Loaded => self.loaded.push(identity),
            LoadOutcome::Fallback => self.fallbacks.push(identity),
            LoadOutcome::Failed => self.failed.push(identity),
        }
    }

    /// Total number of extensions that settled.
    pub fn total(&self) -> usize {
        self.loaded.len() + self.fallbacks.len() + self.failed.len()
    }

    fn sort(&mut self) {
        self.loaded.sort();
        self.fallbacks.sort();
        self.failed.sort();
    }
}

/// Fetches and runs extension programs.
#[derive(Clone)]
pub struct ExtensionLoader {
    fetcher: Arc<dyn SourceFetcher>,
    catalog: Arc<ProgramCatalog>,
}

impl ExtensionLoader {
    pub fn new(fetcher: Arc<dyn SourceFetcher>, catalog: Arc<ProgramCatalog>) -> Self {
        Self { fetcher, catalog }
    }

    /// Fetch and resolve the program for one extension.
    pub async fn resolve(
        &self,
        descriptor: &ExtensionDescriptor,
    ) -> RuntimeResult<Arc<dyn ExtensionProgram>> {
        let source = self
            .fetcher
            .fetch(&descriptor.url)
            .await?
            .into_success(&descriptor.url)?;
        self.catalog.resolve(&source)
    }

    /// Fetch the program for one extension, substituting the no-op program
    /// on any failure.
    pub async fn resolve_or_noop(
        &self,
        descriptor: &ExtensionDescriptor,
        log: &HostLog,
    ) -> (Arc<dyn ExtensionProgram>, LoadOutcome) {
        match self.resolve(descriptor).await {
            Ok(program) => (program, LoadOutcome::Loaded),
            Err(e) => {
                log.error(format_args!(
                    "Failed to load extension from {}: {}",
                    descriptor.url, e
                ));
                (Arc::new(NoopProgram), LoadOutcome::Fallback)
            }
        }
    }

    /// Load and run every extension concurrently and wait for all of them.
    ///
    /// `surface` builds the capability surface for an identity.
    pub async fn load_all<F>(
        &self,
        descriptors: &[ExtensionDescriptor],
        surface: F,
        log: &HostLog,
    ) -> LoadReport
    where
        F: Fn(&str) -> ExtensionApi,
    {
        let mut tasks = JoinSet::new();

        for descriptor in descriptors {
            let loader = self.clone();
            let descriptor = descriptor.clone();
            let api = surface(&descriptor.identity);
            let log = log.scoped(&descriptor.identity);

            tasks.spawn(async move {
                let (program, outcome) = loader.resolve_or_noop(&descriptor, &log).await;

                // Run in its own task so a panicking extension settles as
                // failed instead of tearing down the join.
                let run = tokio::spawn(async move { program.run(api).await });
                let outcome = match run.await {
                    Ok(()) => outcome,
                    Err(e) => {
                        log.error(format_args!("Extension program aborted: {}", e));
                        LoadOutcome::Failed
                    }
                };

                log.debug(format_args!("Extension settled: {:?}", outcome));
                (descriptor.identity, outcome)
            });
        }

        let mut report = LoadReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((identity, outcome)) => report.record(identity, outcome),
                Err(e) => log.error(format_args!("Extension loader task failed: {}", e)),
            }
        }

        report.sort();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelforge_runtime::{FetchedSource, RuntimeError, StaticFetcher};

    const MANIFEST: &str = r#"
[extension]
id = "hello"
name = "Hello"
version = "0.1.0"
"#;

    fn loader(fetcher: StaticFetcher) -> ExtensionLoader {
        let mut catalog = ProgramCatalog::new();
        catalog.register_fn("hello", |_api| {});
        ExtensionLoader::new(Arc::new(fetcher), Arc::new(catalog))
    }

    #[tokio::test]
    async fn test_resolve_success() {
        let loader = loader(StaticFetcher::new().with_source("https://x/hello.toml", MANIFEST));
        let descriptor = ExtensionDescriptor::new("https://x/hello.toml", "hello");
        assert!(loader.resolve(&descriptor).await.is_ok());
    }

    #[tokio::test]
    async fn test_resolve_http_error() {
        let loader = loader(StaticFetcher::new().with_response(
            "https://x/hello.toml",
            FetchedSource {
                status: 500,
                body: MANIFEST.to_string(),
            },
        ));
        let descriptor = ExtensionDescriptor::new("https://x/hello.toml", "hello");

        let err = loader.resolve(&descriptor).await.err().unwrap();
        assert!(matches!(err, RuntimeError::HttpStatus { status: 500, .. }));

        let (_, outcome) = loader.resolve_or_noop(&descriptor, &HostLog::new(false)).await;
        assert_eq!(outcome, LoadOutcome::Fallback);
    }

    #[tokio::test]
    async fn test_resolve_transport_error_falls_back() {
        let loader = loader(StaticFetcher::new());
        let descriptor = ExtensionDescriptor::new("https://x/missing.toml", "missing");

        let (_, outcome) = loader.resolve_or_noop(&descriptor, &HostLog::new(false)).await;
        assert_eq!(outcome, LoadOutcome::Fallback);
    }

    #[test]
    fn test_report_total() {
        let mut report = LoadReport::default();
        report.record("b".into(), LoadOutcome::Loaded);
        report.record("a".into(), LoadOutcome::Loaded);
        report.record("c".into(), LoadOutcome::Failed);
        report.sort();
        assert_eq!(report.loaded, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(report.total(), 3);
    }
}
