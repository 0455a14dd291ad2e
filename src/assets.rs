//! On-disk artwork cache keyed by stable entry identity.
//!
//! The cache is a plain key-value store on the filesystem: one subdirectory
//! per asset class (movies, shows), one JPEG per entry. A file that exists
//! is reused across runs without any network access; a missing file is
//! fetched through the [`ThumbFetcher`] boundary and written atomically
//! (full payload to a `.part` file, then renamed). Per-entry failures are
//! reported and swallowed here; they never abort the run.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;

use crate::domain::{CatalogEntry, EntryKind};
use crate::progress::{AssetOutcome, ProgressReporter};

/// Failure of a single binary payload fetch.
///
/// Messages must already have credentials redacted by the implementor;
/// these strings end up verbatim in progress output.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected status {status}")]
    Status { status: u16 },
}

/// Binary fetch boundary: turns an opaque thumbnail reference into bytes.
#[async_trait]
pub trait ThumbFetcher: Send + Sync {
    async fn fetch(&self, thumb_ref: &str) -> Result<Vec<u8>, FetchError>;
}

/// Tally of per-entry outcomes for one resolution pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResolveStats {
    pub cached: usize,
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ResolveStats {
    fn record(&mut self, outcome: &AssetOutcome) {
        match outcome {
            AssetOutcome::Cached => self.cached += 1,
            AssetOutcome::Downloaded => self.downloaded += 1,
            AssetOutcome::Skipped => self.skipped += 1,
            AssetOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Filesystem artwork cache.
pub struct AssetCache<'a> {
    root: PathBuf,
    fetcher: &'a dyn ThumbFetcher,
}

impl<'a> AssetCache<'a> {
    pub fn new(root: impl Into<PathBuf>, fetcher: &'a dyn ThumbFetcher) -> Self {
        Self {
            root: root.into(),
            fetcher,
        }
    }

    /// Resolve artwork for every entry in sequence, mutating
    /// `resolved_asset_path` in place and reporting one outcome per entry.
    ///
    /// Only creating the cache subdirectory can fail; everything per-entry
    /// degrades that entry to the placeholder state instead.
    pub async fn resolve_all(
        &self,
        entries: &mut [CatalogEntry],
        kind: EntryKind,
        reporter: &dyn ProgressReporter,
    ) -> Result<ResolveStats> {
        let dir = self.root.join(kind.cache_subdir());
        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("failed to create cache directory: {}", dir.display()))?;

        let total = entries.len();
        let mut stats = ResolveStats::default();

        for (i, entry) in entries.iter_mut().enumerate() {
            let outcome = self.resolve(entry, &dir).await;
            reporter.entry(i + 1, total, &entry.title, &outcome);
            stats.record(&outcome);
        }

        Ok(stats)
    }

    /// Resolve one entry against the given asset-class directory.
    async fn resolve(&self, entry: &mut CatalogEntry, dir: &Path) -> AssetOutcome {
        let Some(thumb_ref) = entry.remote_thumb_ref.clone() else {
            return AssetOutcome::Skipped;
        };

        let path = dir.join(cache_file_name(entry));

        // Re-run fast path: an existing file is trusted as-is, no network.
        if path.exists() {
            entry.resolved_asset_path = Some(path);
            return AssetOutcome::Cached;
        }

        match self.fetch_and_store(&thumb_ref, &path).await {
            Ok(()) => {
                entry.resolved_asset_path = Some(path);
                AssetOutcome::Downloaded
            }
            Err(e) => AssetOutcome::Failed(format!("{:#}", e)),
        }
    }

    async fn fetch_and_store(&self, thumb_ref: &str, path: &Path) -> Result<()> {
        let bytes = self.fetcher.fetch(thumb_ref).await?;

        // The final name only ever holds a complete payload, so a crash
        // mid-write can't poison the re-run fast path.
        let partial = path.with_extension("jpg.part");
        fs::write(&partial, &bytes)
            .await
            .with_context(|| format!("failed to write {}", partial.display()))?;
        fs::rename(&partial, path)
            .await
            .with_context(|| format!("failed to move {} into place", partial.display()))?;

        Ok(())
    }
}

/// Cache file name for an entry: sanitized title, year in parentheses when
/// known, and the stable rating key so two distinct works sharing a title
/// and year never collide onto one file.
pub fn cache_file_name(entry: &CatalogEntry) -> String {
    let mut name = sanitize_title(&entry.title);
    if name.is_empty() {
        name = format!("media_{}", entry.rating_key);
    }
    if let Some(year) = entry.year {
        name.push_str(&format!(" ({})", year));
    }
    format!("{}_{}.jpg", name, entry.rating_key)
}

/// Strip everything outside word characters, hyphens, parentheses, and
/// spaces, then collapse runs of whitespace.
fn sanitize_title(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| {
            c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '-' | '(' | ')')
        })
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntryDetails;

    fn entry(title: &str, year: Option<i32>, rating_key: &str) -> CatalogEntry {
        CatalogEntry {
            title: title.to_string(),
            year,
            content_rating: "NR".to_string(),
            genres: Vec::new(),
            details: EntryDetails::Film {
                duration_minutes: None,
            },
            rating_key: rating_key.to_string(),
            remote_thumb_ref: None,
            resolved_asset_path: None,
        }
    }

    #[test]
    fn sanitize_strips_punctuation_and_collapses_whitespace() {
        assert_eq!(sanitize_title("Spider-Man: No Way Home"), "Spider-Man No Way Home");
        assert_eq!(sanitize_title("  What's   Up,  Doc?  "), "Whats Up Doc");
        assert_eq!(sanitize_title("(500) Days of Summer"), "(500) Days of Summer");
    }

    #[test]
    fn file_name_appends_year_and_rating_key() {
        let e = entry("The Matrix", Some(1999), "42");
        assert_eq!(cache_file_name(&e), "The Matrix (1999)_42.jpg");
    }

    #[test]
    fn file_name_without_year_omits_parentheses() {
        let e = entry("Unknown", None, "7");
        assert_eq!(cache_file_name(&e), "Unknown_7.jpg");
    }

    #[test]
    fn unsanitizable_title_falls_back_to_rating_key() {
        let e = entry("???", None, "99");
        assert_eq!(cache_file_name(&e), "media_99_99.jpg");
    }

    #[test]
    fn same_title_and_year_distinct_keys_do_not_collide() {
        let a = entry("Dune", Some(2021), "1");
        let b = entry("Dune", Some(2021), "2");
        assert_ne!(cache_file_name(&a), cache_file_name(&b));
    }
}
