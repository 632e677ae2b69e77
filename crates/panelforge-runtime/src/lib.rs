//! # panelforge-runtime
//!
//! Shared building blocks for the panelforge extension host.
//!
//! This crate provides:
//! - The event and panel vocabulary shared by the host and its extensions
//! - Extension manifest parsing
//! - Retrieval of extension sources by URL
//!
//! ## Extension Sources
//!
//! An extension is published as a small TOML manifest reachable by URL:
//!
//! ```toml
//! [extension]
//! id = "csv-export"
//! name = "CSV Export"
//! version = "0.1.0"
//! entry_point = "csv-export"
//! ```
//!
//! The manifest names an entry point that the embedding application has
//! compiled in. An empty source is a valid extension that does nothing.

pub mod error;
pub mod fetch;
pub mod manifest;
pub mod vocabulary;

pub use error::{RuntimeError, RuntimeResult};
pub use fetch::{FetchedSource, HttpFetcher, SourceFetcher, StaticFetcher};
pub use manifest::{ExtensionManifest, ExtensionMetadata};
pub use vocabulary::{EventType, PanelId, Payload};
