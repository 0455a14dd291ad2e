//! mediabinder - print-ready PDF binder catalogs from a Plex library
//!
//! Compiles a Plex Media Server library into a paginated PDF: a cover
//! page, a table of contents, and per-section card grids with poster
//! artwork.
//!
//! # Architecture
//!
//! The pipeline is sequential and runs front to back once per build:
//! - raw library records are normalized into uniform entries
//! - entries are sorted and grouped into sections
//! - artwork is resolved through an on-disk cache (fetch once, reuse
//!   across runs); failures degrade single entries to placeholders
//! - the assembled document is laid out into a block stream under
//!   declarative page/grid rules
//! - a document engine (WeasyPrint) paginates and emits the PDF
//!
//! # Modules
//!
//! - `library`: Plex HTTP client and wire types
//! - `domain`: normalized entries and the catalog document tree
//! - `catalog`: sorting and section assembly
//! - `assets`: on-disk artwork cache
//! - `layout`: layout rules and the engine applying them
//! - `adapters`: document renderer boundary (WeasyPrint)
//! - `pipeline`: end-to-end orchestration
//! - `cli`: command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Build a catalog (credentials may come from PLEX_URL/PLEX_TOKEN)
//! mediabinder build --url http://192.168.1.100:32400 --token XXXX
//!
//! # Inspect resolved configuration
//! mediabinder config
//! ```

pub mod adapters;
pub mod assets;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod layout;
pub mod library;
pub mod pipeline;
pub mod progress;

// Re-export main types at crate root for convenience
pub use assets::{AssetCache, FetchError, ResolveStats, ThumbFetcher};
pub use domain::{CatalogDocument, CatalogEntry, CatalogSection, EntryDetails, EntryKind};
pub use layout::{LayoutRules, RenderDocument};
pub use pipeline::{BuildOptions, CatalogPipeline, PipelineReport};
pub use progress::{AssetOutcome, ConsoleReporter, ProgressReporter, Stage};
