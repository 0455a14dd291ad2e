//! Wire types for the Plex JSON API.
//!
//! Only the fields the catalog needs are modeled; everything else in the
//! responses is ignored.

use serde::Deserialize;

/// Every Plex response nests its payload under `MediaContainer`.
#[derive(Debug, Deserialize)]
pub struct MediaContainerResponse<T> {
    #[serde(rename = "MediaContainer")]
    pub media_container: T,
}

/// Server identity payload from `GET /`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerIdentity {
    pub friendly_name: Option<String>,
}

/// Payload of `GET /library/sections`.
#[derive(Debug, Deserialize)]
pub struct SectionDirectory {
    #[serde(default, rename = "Directory")]
    pub directories: Vec<SectionInfo>,
}

/// One library section as listed by the server.
#[derive(Debug, Deserialize)]
pub struct SectionInfo {
    pub key: String,
    pub title: String,
    #[serde(rename = "type")]
    pub section_type: String,
}

/// Payload of `GET /library/sections/{key}/all`.
#[derive(Debug, Deserialize)]
pub struct SectionContents {
    #[serde(default, rename = "Metadata")]
    pub metadata: Vec<MediaRecord>,
}

/// One raw library record, before normalization.
///
/// `duration` is in milliseconds. `child_count`/`leaf_count` are the season
/// and episode counts on show records and absent on movie records.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    pub rating_key: String,
    pub title: String,
    pub year: Option<i32>,
    pub content_rating: Option<String>,
    pub duration: Option<u64>,
    pub child_count: Option<u32>,
    pub leaf_count: Option<u32>,
    pub thumb: Option<String>,
    #[serde(default, rename = "Genre")]
    pub genres: Vec<GenreTag>,
}

/// A single genre tag as Plex returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct GenreTag {
    pub tag: String,
}
