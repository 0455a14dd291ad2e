//! Progress reporting for the catalog run.
//!
//! The pipeline emits structured events (stage transitions and one outcome
//! per entry during artwork resolution) through a reporter trait, keeping
//! the pipeline logic free of console concerns.

use std::fmt;

/// A coarse stage of the run, announced once when it begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    PullingMovies,
    PullingShows,
    ResolvingMovieArt,
    ResolvingShowArt,
    LayingOut,
    Rendering,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Stage::PullingMovies => "Pulling movies...",
            Stage::PullingShows => "Pulling TV shows...",
            Stage::ResolvingMovieArt => "Resolving movie posters...",
            Stage::ResolvingShowArt => "Resolving show posters...",
            Stage::LayingOut => "Laying out catalog...",
            Stage::Rendering => "Rendering PDF...",
        };
        write!(f, "{}", text)
    }
}

/// How artwork resolution ended for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOutcome {
    /// File already on disk; no network access.
    Cached,

    /// Fetched and written this run.
    Downloaded,

    /// Entry has no thumbnail reference; nothing to do.
    Skipped,

    /// Fetch or write failed; entry falls back to a placeholder.
    Failed(String),
}

impl AssetOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, AssetOutcome::Failed(_))
    }
}

impl fmt::Display for AssetOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetOutcome::Cached => write!(f, "cached"),
            AssetOutcome::Downloaded => write!(f, "downloaded"),
            AssetOutcome::Skipped => write!(f, "no poster"),
            AssetOutcome::Failed(reason) => write!(f, "FAILED: {}", reason),
        }
    }
}

/// Consumer of progress events.
pub trait ProgressReporter: Send + Sync {
    /// A stage of the run is starting.
    fn stage(&self, stage: Stage);

    /// Artwork resolution finished for one entry. `index` is 1-based.
    fn entry(&self, index: usize, total: usize, title: &str, outcome: &AssetOutcome);
}

/// Reporter that writes one tracing line per event.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn stage(&self, stage: Stage) {
        tracing::info!("{}", stage);
    }

    fn entry(&self, index: usize, total: usize, title: &str, outcome: &AssetOutcome) {
        if outcome.is_failure() {
            tracing::warn!("  [{}/{}] {} -- {}", index, total, title, outcome);
        } else {
            tracing::info!("  [{}/{}] {} -- {}", index, total, title, outcome);
        }
    }
}
