// ABOUTME: Main library entry point for the flathunter rental listing crawler.
// ABOUTME: Re-exports the public API: Pipeline, search, SearchProfile, FilterCriteria, NormalizedListing, Snapshot.

//! Flathunter - crawls paginated rental searches and extracts structured listings.
//!
//! A search walks every result page of a category, extracts each card's
//! primary fields, optionally enriches it from its detail page and filters
//! the result on rent, size and room bounds. Field-level problems never
//! abort a session; they are collected as diagnostics next to the listings.
//!
//! # Example
//!
//! ```no_run
//! use flathunter_core::{search, Category, FilterCriteria, HttpSource, SearchProfile};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = HttpSource::builder().build()?;
//!     let profile = SearchProfile::new(Category::Flat);
//!     let filter = FilterCriteria::new(500, 2000, 40, 120).with_rooms(2.0, 4.0);
//!     let outcome = search(&source, &profile, Some(&filter), Some(2))?;
//!     println!("{}", serde_json::to_string_pretty(&outcome.listings)?);
//!     Ok(())
//! }
//! ```

pub mod diagnostics;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod filter;
pub mod models;
pub mod normalize;
pub mod options;
pub mod pipeline;
pub mod profile;
pub mod site;
pub mod snapshot;
pub mod source;

pub use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Scope};
pub use crate::error::{
    ConfigError, SearchError, SnapshotError, StructureError, TransportError, TransportKind,
};
pub use crate::filter::{matches, FilterCriteria, Filterable};
pub use crate::models::{Contact, Field, NormalizedListing};
pub use crate::options::{HttpSourceBuilder, SearchOptions, SourceOptions};
pub use crate::pipeline::{search, Pipeline, SearchOutcome};
pub use crate::profile::{Category, SearchProfile};
pub use crate::site::{ImmobilierCh, ListingSite};
pub use crate::snapshot::Snapshot;
pub use crate::source::{DocumentSource, HttpSource, MemorySource};
