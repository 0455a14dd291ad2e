//! The catalog compilation pipeline.
//!
//! Sequential and blocking by design: pull and normalize both sections,
//! assemble the document, resolve artwork one entry at a time, lay out
//! once, render once. Library failures abort the run; per-entry artwork
//! failures never do.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::adapters::DocumentRenderer;
use crate::assets::{AssetCache, ResolveStats};
use crate::catalog;
use crate::domain::{CatalogEntry, EntryKind};
use crate::layout::{self, LayoutRules};
use crate::library::PlexClient;
use crate::progress::{ProgressReporter, Stage};

/// Everything a single build needs beyond the collaborators.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub title: String,
    pub output: PathBuf,
    pub cache_dir: PathBuf,
    pub movie_section: String,
    pub show_section: String,
    pub rules: LayoutRules,
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub movie_count: usize,
    pub show_count: usize,
    pub movie_stats: ResolveStats,
    pub show_stats: ResolveStats,
    pub output: PathBuf,
}

impl PipelineReport {
    /// Entries that ended up with placeholder artwork due to a failure.
    pub fn failed_assets(&self) -> usize {
        self.movie_stats.failed + self.show_stats.failed
    }
}

/// Orchestrates one catalog build against a connected library.
pub struct CatalogPipeline<'a> {
    client: &'a PlexClient,
    renderer: &'a dyn DocumentRenderer,
    reporter: &'a dyn ProgressReporter,
}

impl<'a> CatalogPipeline<'a> {
    pub fn new(
        client: &'a PlexClient,
        renderer: &'a dyn DocumentRenderer,
        reporter: &'a dyn ProgressReporter,
    ) -> Self {
        Self {
            client,
            renderer,
            reporter,
        }
    }

    /// Run the full pipeline and return a report.
    #[instrument(skip(self, options), fields(title = %options.title))]
    pub async fn run(&self, options: &BuildOptions) -> Result<PipelineReport> {
        self.reporter.stage(Stage::PullingMovies);
        let movies = self
            .pull_section(&options.movie_section, EntryKind::Film)
            .await?;
        info!(count = movies.len(), section = %options.movie_section, "movies found");

        self.reporter.stage(Stage::PullingShows);
        let shows = self
            .pull_section(&options.show_section, EntryKind::Series)
            .await?;
        info!(count = shows.len(), section = %options.show_section, "shows found");

        let mut document = catalog::assemble(
            &options.title,
            &options.movie_section,
            movies,
            &options.show_section,
            shows,
        );

        let cache = AssetCache::new(&options.cache_dir, self.client);

        self.reporter.stage(Stage::ResolvingMovieArt);
        let movie_stats = cache
            .resolve_all(
                &mut document.sections[0].entries,
                EntryKind::Film,
                self.reporter,
            )
            .await?;

        self.reporter.stage(Stage::ResolvingShowArt);
        let show_stats = cache
            .resolve_all(
                &mut document.sections[1].entries,
                EntryKind::Series,
                self.reporter,
            )
            .await?;

        self.reporter.stage(Stage::LayingOut);
        let render_document = layout::layout(&document, options.rules.clone());

        self.reporter.stage(Stage::Rendering);
        self.renderer
            .render(&render_document, &options.output)
            .await
            .with_context(|| {
                format!(
                    "renderer '{}' failed for {}",
                    self.renderer.name(),
                    options.output.display()
                )
            })?;

        let report = PipelineReport {
            movie_count: document.sections[0].len(),
            show_count: document.sections[1].len(),
            movie_stats,
            show_stats,
            output: options.output.clone(),
        };

        info!(
            output = %report.output.display(),
            failed_assets = report.failed_assets(),
            "catalog generated"
        );

        Ok(report)
    }

    async fn pull_section(&self, section: &str, kind: EntryKind) -> Result<Vec<CatalogEntry>> {
        let records = self.client.list_entries(section, kind).await?;
        Ok(records
            .iter()
            .map(|r| CatalogEntry::from_record(r, kind))
            .collect())
    }
}
