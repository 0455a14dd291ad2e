//! Configuration for mediabinder paths and section names.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (MEDIABINDER_HOME, MEDIABINDER_CACHE_DIR)
//! 2. Config file (.mediabinder/config.yaml)
//! 3. Defaults (~/.mediabinder)
//!
//! Config file discovery:
//! - Searches current directory and parents for .mediabinder/config.yaml
//! - Paths in the config file are relative to the config file's parent
//!
//! Plex credentials are not configuration of this module; they come from
//! the CLI (or PLEX_URL/PLEX_TOKEN) and are validated before any work.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub sections: Option<SectionsConfig>,
    #[serde(default)]
    pub fetch: Option<FetchConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Poster cache directory (relative to config file)
    pub cache: Option<String>,
    /// Default output path (relative to config file)
    pub output: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionsConfig {
    pub movies: Option<String>,
    pub shows: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    pub timeout_seconds: Option<u64>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// mediabinder home (default cache parent)
    pub home: PathBuf,
    /// Poster cache root; one subdirectory per asset class inside
    pub cache_dir: PathBuf,
    /// Default output path when the CLI gives none
    pub output: PathBuf,
    /// Plex library section holding movies
    pub movie_section: String,
    /// Plex library section holding TV shows
    pub show_section: String,
    /// HTTP timeout for library queries and poster fetches
    pub fetch_timeout_seconds: u64,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".mediabinder").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Load configuration from all sources
pub fn load() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".mediabinder");

    let home = std::env::var("MEDIABINDER_HOME")
        .map(PathBuf::from)
        .unwrap_or(default_home);

    let config_file = find_config_file();

    let mut cache_dir = home.join("posters");
    let mut output = PathBuf::from("catalog.pdf");
    let mut movie_section = "Movies".to_string();
    let mut show_section = "TV Shows".to_string();
    let mut timeout = 30u64;

    if let Some(ref config_path) = config_file {
        let config = load_config_file(config_path)?;

        // Base directory is the parent of .mediabinder/
        let base_dir = config_path
            .parent()
            .and_then(|p| p.parent())
            .unwrap_or(Path::new("."));

        if let Some(ref cache) = config.paths.cache {
            cache_dir = resolve_path(base_dir, cache);
        }
        if let Some(ref out) = config.paths.output {
            output = resolve_path(base_dir, out);
        }
        if let Some(sections) = config.sections {
            if let Some(movies) = sections.movies {
                movie_section = movies;
            }
            if let Some(shows) = sections.shows {
                show_section = shows;
            }
        }
        if let Some(t) = config.fetch.and_then(|f| f.timeout_seconds) {
            timeout = t;
        }
    }

    if let Ok(env_cache) = std::env::var("MEDIABINDER_CACHE_DIR") {
        cache_dir = PathBuf::from(env_cache);
    }

    Ok(ResolvedConfig {
        home,
        cache_dir,
        output,
        movie_section,
        show_section,
        fetch_timeout_seconds: timeout,
        config_file,
    })
}
