//! Normalized catalog entries.
//!
//! A `CatalogEntry` is the uniform shape every raw library record is mapped
//! into before sorting, artwork resolution, and layout. Normalization is
//! pure and total: missing optional fields become defaults, never errors.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::library::records::MediaRecord;

/// Maximum number of genres carried on a card.
const MAX_GENRES: usize = 3;

/// Which top-level kind of work an entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// A feature film.
    Film,

    /// A multi-season series.
    Series,
}

impl EntryKind {
    /// Cache subdirectory for this asset class.
    pub fn cache_subdir(&self) -> &'static str {
        match self {
            EntryKind::Film => "movies",
            EntryKind::Series => "shows",
        }
    }

    /// The Plex section type string for this kind.
    pub fn plex_type(&self) -> &'static str {
        match self {
            EntryKind::Film => "movie",
            EntryKind::Series => "show",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Film => write!(f, "film"),
            EntryKind::Series => write!(f, "series"),
        }
    }
}

/// Kind-specific detail of an entry.
///
/// Films carry a runtime, series carry season/episode counts. Encoding this
/// as an enum means an entry can never hold both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryDetails {
    Film {
        /// Runtime in whole minutes (milliseconds truncated, not rounded).
        duration_minutes: Option<u32>,
    },
    Series {
        season_count: u32,
        episode_count: u32,
    },
}

/// One item to render in the catalog.
///
/// Immutable after normalization except for `resolved_asset_path`, which
/// the asset cache fills in exactly once (or leaves `None` permanently).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Display title; also the sort key (case-insensitive).
    pub title: String,

    /// Release/first-air year, when the library knows it.
    pub year: Option<i32>,

    /// Content rating, "NR" when the library has none.
    pub content_rating: String,

    /// Up to [`MAX_GENRES`] genre tags in source order.
    pub genres: Vec<String>,

    /// Film runtime or series unit counts.
    pub details: EntryDetails,

    /// Stable upstream identifier (Plex rating key).
    pub rating_key: String,

    /// Opaque remote thumbnail reference understood by the asset cache.
    pub remote_thumb_ref: Option<String>,

    /// Local artwork path once resolved; `None` renders a placeholder.
    pub resolved_asset_path: Option<PathBuf>,
}

impl CatalogEntry {
    /// Normalize one raw library record into an entry of the given kind.
    pub fn from_record(record: &MediaRecord, kind: EntryKind) -> Self {
        let details = match kind {
            EntryKind::Film => EntryDetails::Film {
                duration_minutes: record
                    .duration
                    .filter(|ms| *ms > 0)
                    .map(|ms| (ms / 60_000) as u32),
            },
            EntryKind::Series => EntryDetails::Series {
                season_count: record.child_count.unwrap_or(0),
                episode_count: record.leaf_count.unwrap_or(0),
            },
        };

        Self {
            title: record.title.clone(),
            year: record.year,
            content_rating: record
                .content_rating
                .clone()
                .unwrap_or_else(|| "NR".to_string()),
            genres: record
                .genres
                .iter()
                .take(MAX_GENRES)
                .map(|g| g.tag.clone())
                .collect(),
            details,
            rating_key: record.rating_key.clone(),
            remote_thumb_ref: record.thumb.clone(),
            resolved_asset_path: None,
        }
    }

    /// The kind this entry was normalized as.
    pub fn kind(&self) -> EntryKind {
        match self.details {
            EntryDetails::Film { .. } => EntryKind::Film,
            EntryDetails::Series { .. } => EntryKind::Series,
        }
    }
}
