//! Asset Cache Integration Tests
//!
//! Exercises the on-disk artwork cache against an in-memory fetcher:
//! cache idempotence across runs, skip and failure handling, and
//! per-entry failure isolation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;

use mediabinder::assets::{AssetCache, FetchError, ThumbFetcher};
use mediabinder::domain::{CatalogEntry, EntryDetails, EntryKind};
use mediabinder::progress::{AssetOutcome, ProgressReporter, Stage};

/// In-memory fetcher with per-reference payloads and a fetch counter.
struct FakeFetcher {
    payloads: HashMap<String, Vec<u8>>,
    fetches: AtomicUsize,
}

impl FakeFetcher {
    fn new(payloads: HashMap<String, Vec<u8>>) -> Self {
        Self {
            payloads,
            fetches: AtomicUsize::new(0),
        }
    }

    fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ThumbFetcher for FakeFetcher {
    async fn fetch(&self, thumb_ref: &str) -> Result<Vec<u8>, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.payloads
            .get(thumb_ref)
            .cloned()
            .ok_or(FetchError::Status { status: 404 })
    }
}

/// Reporter that records every per-entry outcome.
#[derive(Default)]
struct CollectingReporter {
    entries: Mutex<Vec<(String, AssetOutcome)>>,
}

impl ProgressReporter for CollectingReporter {
    fn stage(&self, _stage: Stage) {}

    fn entry(&self, _index: usize, _total: usize, title: &str, outcome: &AssetOutcome) {
        self.entries
            .lock()
            .unwrap()
            .push((title.to_string(), outcome.clone()));
    }
}

fn entry(title: &str, rating_key: &str, thumb: Option<&str>) -> CatalogEntry {
    CatalogEntry {
        title: title.to_string(),
        year: Some(2020),
        content_rating: "NR".to_string(),
        genres: Vec::new(),
        details: EntryDetails::Film {
            duration_minutes: Some(100),
        },
        rating_key: rating_key.to_string(),
        remote_thumb_ref: thumb.map(String::from),
        resolved_asset_path: None,
    }
}

#[tokio::test]
async fn entry_without_thumb_never_fetches() {
    let temp = TempDir::new().unwrap();
    let fetcher = FakeFetcher::new(HashMap::new());
    let cache = AssetCache::new(temp.path(), &fetcher);
    let reporter = CollectingReporter::default();

    let mut entries = vec![entry("No Art", "1", None)];
    let stats = cache
        .resolve_all(&mut entries, EntryKind::Film, &reporter)
        .await
        .unwrap();

    assert_eq!(fetcher.fetch_count(), 0);
    assert_eq!(stats.skipped, 1);
    assert!(entries[0].resolved_asset_path.is_none());
}

#[tokio::test]
async fn second_run_hits_the_cache_without_fetching() {
    let temp = TempDir::new().unwrap();
    let payloads: HashMap<String, Vec<u8>> =
        [("/thumb/1".to_string(), vec![0xFF, 0xD8, 0xFF])].into();
    let fetcher = FakeFetcher::new(payloads);
    let reporter = CollectingReporter::default();

    let mut first = vec![entry("The Matrix", "1", Some("/thumb/1"))];
    {
        let cache = AssetCache::new(temp.path(), &fetcher);
        let stats = cache
            .resolve_all(&mut first, EntryKind::Film, &reporter)
            .await
            .unwrap();
        assert_eq!(stats.downloaded, 1);
        assert_eq!(fetcher.fetch_count(), 1);
    }

    // Fresh cache over the same directory: zero network, identical path.
    let mut second = vec![entry("The Matrix", "1", Some("/thumb/1"))];
    let cache = AssetCache::new(temp.path(), &fetcher);
    let stats = cache
        .resolve_all(&mut second, EntryKind::Film, &reporter)
        .await
        .unwrap();

    assert_eq!(stats.cached, 1);
    assert_eq!(fetcher.fetch_count(), 1);
    assert_eq!(first[0].resolved_asset_path, second[0].resolved_asset_path);
}

#[tokio::test]
async fn cached_file_holds_the_fetched_payload() {
    let temp = TempDir::new().unwrap();
    let payloads: HashMap<String, Vec<u8>> = [("/thumb/9".to_string(), b"poster".to_vec())].into();
    let fetcher = FakeFetcher::new(payloads);
    let cache = AssetCache::new(temp.path(), &fetcher);
    let reporter = CollectingReporter::default();

    let mut entries = vec![entry("Dune", "9", Some("/thumb/9"))];
    cache
        .resolve_all(&mut entries, EntryKind::Film, &reporter)
        .await
        .unwrap();

    let path = entries[0].resolved_asset_path.as_ref().unwrap();
    assert!(path.starts_with(temp.path().join("movies")));
    assert_eq!(std::fs::read(path).unwrap(), b"poster");
    // No partial file left behind.
    assert!(!path.with_extension("jpg.part").exists());
}

#[tokio::test]
async fn one_bad_thumb_among_ten_degrades_only_that_entry() {
    let temp = TempDir::new().unwrap();
    let mut payloads = HashMap::new();
    for i in 0..10 {
        if i != 3 {
            payloads.insert(format!("/thumb/{}", i), vec![i as u8]);
        }
    }
    let fetcher = FakeFetcher::new(payloads);
    let cache = AssetCache::new(temp.path(), &fetcher);
    let reporter = CollectingReporter::default();

    let mut entries: Vec<CatalogEntry> = (0..10)
        .map(|i| {
            entry(
                &format!("Title {}", i),
                &i.to_string(),
                Some(&format!("/thumb/{}", i)),
            )
        })
        .collect();

    let stats = cache
        .resolve_all(&mut entries, EntryKind::Film, &reporter)
        .await
        .unwrap();

    assert_eq!(stats.downloaded, 9);
    assert_eq!(stats.failed, 1);
    assert!(entries[3].resolved_asset_path.is_none());
    assert_eq!(
        entries.iter().filter(|e| e.resolved_asset_path.is_some()).count(),
        9
    );

    // Exactly one failure reported, naming the entry.
    let reported = reporter.entries.lock().unwrap();
    let failures: Vec<_> = reported.iter().filter(|(_, o)| o.is_failure()).collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "Title 3");
}

#[tokio::test]
async fn asset_classes_get_their_own_subdirectories() {
    let temp = TempDir::new().unwrap();
    let payloads: HashMap<String, Vec<u8>> = [
        ("/thumb/m".to_string(), vec![1]),
        ("/thumb/s".to_string(), vec![2]),
    ]
    .into();
    let fetcher = FakeFetcher::new(payloads);
    let cache = AssetCache::new(temp.path(), &fetcher);
    let reporter = CollectingReporter::default();

    let mut movies = vec![entry("Movie", "m1", Some("/thumb/m"))];
    let mut shows = vec![CatalogEntry {
        details: EntryDetails::Series {
            season_count: 2,
            episode_count: 20,
        },
        ..entry("Show", "s1", Some("/thumb/s"))
    }];

    cache
        .resolve_all(&mut movies, EntryKind::Film, &reporter)
        .await
        .unwrap();
    cache
        .resolve_all(&mut shows, EntryKind::Series, &reporter)
        .await
        .unwrap();

    assert!(movies[0]
        .resolved_asset_path
        .as_ref()
        .unwrap()
        .starts_with(temp.path().join("movies")));
    assert!(shows[0]
        .resolved_asset_path
        .as_ref()
        .unwrap()
        .starts_with(temp.path().join("shows")));
}
