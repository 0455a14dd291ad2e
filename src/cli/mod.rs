//! Command-line interface for mediabinder.
//!
//! `build` runs the full catalog pipeline; `config` prints the resolved
//! configuration for debugging.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::adapters::WeasyPrintRenderer;
use crate::config;
use crate::layout::LayoutRules;
use crate::library::PlexClient;
use crate::pipeline::{BuildOptions, CatalogPipeline};
use crate::progress::ConsoleReporter;

/// mediabinder - print-ready PDF binder catalogs from a Plex library
#[derive(Parser, Debug)]
#[command(name = "mediabinder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the catalog PDF
    Build {
        /// Plex server URL, e.g. http://192.168.1.100:32400
        #[arg(long, env = "PLEX_URL")]
        url: Option<String>,

        /// Plex auth token
        #[arg(long, env = "PLEX_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Catalog title
        #[arg(long, default_value = "Movie & TV Library")]
        title: String,

        /// Output PDF path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Library section holding movies
        #[arg(long)]
        movies_section: Option<String>,

        /// Library section holding TV shows
        #[arg(long)]
        shows_section: Option<String>,

        /// Poster cache directory
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Build {
                url,
                token,
                title,
                output,
                movies_section,
                shows_section,
                cache_dir,
            } => {
                build(
                    url,
                    token,
                    title,
                    output,
                    movies_section,
                    shows_section,
                    cache_dir,
                )
                .await
            }
            Commands::Config => show_config(),
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn build(
    url: Option<String>,
    token: Option<String>,
    title: String,
    output: Option<PathBuf>,
    movies_section: Option<String>,
    shows_section: Option<String>,
    cache_dir: Option<PathBuf>,
) -> Result<()> {
    let cfg = config::load()?;

    // Connection parameters are validated before any work happens.
    let url = url.ok_or_else(|| {
        anyhow::anyhow!("--url is required (or set the PLEX_URL environment variable)")
    })?;
    let token = token.ok_or_else(|| {
        anyhow::anyhow!("--token is required (or set the PLEX_TOKEN environment variable)")
    })?;

    let options = BuildOptions {
        title,
        output: output.unwrap_or(cfg.output),
        cache_dir: cache_dir.unwrap_or(cfg.cache_dir),
        movie_section: movies_section.unwrap_or(cfg.movie_section),
        show_section: shows_section.unwrap_or(cfg.show_section),
        rules: LayoutRules::default(),
    };

    let client = PlexClient::connect(
        &url,
        &token,
        Duration::from_secs(cfg.fetch_timeout_seconds),
    )
    .await?;
    let renderer = WeasyPrintRenderer::new();
    let reporter = ConsoleReporter;

    let pipeline = CatalogPipeline::new(&client, &renderer, &reporter);
    let report = pipeline.run(&options).await?;

    println!(
        "Catalog: {} movies, {} shows",
        report.movie_count, report.show_count
    );
    if report.failed_assets() > 0 {
        eprintln!(
            "{} poster(s) could not be fetched and render as placeholders",
            report.failed_assets()
        );
    }
    println!("PDF saved to {}", report.output.display());

    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config() -> Result<()> {
    let cfg = config::load()?;

    println!("mediabinder configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:         {}", cfg.home.display());
    println!("  Poster cache: {}", cfg.cache_dir.display());
    println!("  Output:       {}", cfg.output.display());
    println!();
    println!("Sections:");
    println!("  Movies:   {}", cfg.movie_section);
    println!("  TV shows: {}", cfg.show_section);
    println!();
    println!("Fetch timeout: {}s", cfg.fetch_timeout_seconds);

    Ok(())
}
