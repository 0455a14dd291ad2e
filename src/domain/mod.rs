//! Data structures for the catalog pipeline.
//!
//! `entry` holds the normalized per-item model, `document` the assembled
//! section tree handed to the layout engine.

pub mod document;
pub mod entry;

pub use document::{CatalogDocument, CatalogSection};
pub use entry::{CatalogEntry, EntryDetails, EntryKind};
