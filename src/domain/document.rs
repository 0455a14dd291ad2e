//! The assembled catalog document tree.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::entry::CatalogEntry;

/// A named, ordered group of entries (e.g. "Movies", "TV Shows").
///
/// Entries are sorted ascending by title, case-insensitive, ties keeping
/// source order. Present in the document even when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSection {
    pub name: String,
    pub entries: Vec<CatalogEntry>,
}

impl CatalogSection {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The full catalog, built once per run and never restructured afterwards.
///
/// Asset resolution only fills in `resolved_asset_path` on the entries; the
/// section ordering and membership are fixed at assembly time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub title: String,
    pub generated_on: NaiveDate,
    pub sections: Vec<CatalogSection>,
}

impl CatalogDocument {
    /// Aggregate entry count across every section.
    pub fn total_entries(&self) -> usize {
        self.sections.iter().map(|s| s.len()).sum()
    }
}
