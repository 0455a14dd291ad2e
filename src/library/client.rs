//! Thin client for the Plex Media Server JSON API.
//!
//! Covers the three calls the catalog needs: server identity (connection
//! check), listing a library section's records, and fetching thumbnail
//! bytes. Query failures are fatal to the run; thumbnail fetch failures
//! are typed and handled by the asset cache. Every error message has the
//! token redacted before it can reach logs or progress output.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::assets::{FetchError, ThumbFetcher};
use crate::domain::EntryKind;

use super::records::{
    MediaContainerResponse, MediaRecord, SectionContents, SectionDirectory, ServerIdentity,
};

/// Connected Plex server handle.
pub struct PlexClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl PlexClient {
    /// Connect to a server and verify it answers.
    pub async fn connect(url: &str, token: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        let plex = Self {
            base_url: url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            client,
        };

        let identity: MediaContainerResponse<ServerIdentity> = plex
            .get_json("/")
            .await
            .with_context(|| format!("failed to connect to Plex at {}", url))?;

        let name = identity
            .media_container
            .friendly_name
            .unwrap_or_else(|| "unknown".to_string());
        info!(server = %name, "Connected to Plex");

        Ok(plex)
    }

    /// List the raw records of a named library section.
    ///
    /// A missing section is fatal; the error names the sections that do
    /// exist so the caller can correct the name.
    pub async fn list_entries(
        &self,
        section_name: &str,
        kind: EntryKind,
    ) -> Result<Vec<MediaRecord>> {
        let sections: MediaContainerResponse<SectionDirectory> = self
            .get_json("/library/sections")
            .await
            .context("failed to list library sections")?;
        let directories = sections.media_container.directories;

        let section = directories
            .iter()
            .find(|s| s.title == section_name)
            .ok_or_else(|| {
                let available: Vec<&str> =
                    directories.iter().map(|s| s.title.as_str()).collect();
                anyhow::anyhow!(
                    "library section '{}' not found; available sections: {}",
                    section_name,
                    available.join(", ")
                )
            })?;

        if section.section_type != kind.plex_type() {
            tracing::warn!(
                section = %section.title,
                expected = kind.plex_type(),
                actual = %section.section_type,
                "section type does not match requested kind"
            );
        }

        let contents: MediaContainerResponse<SectionContents> = self
            .get_json(&format!("/library/sections/{}/all", section.key))
            .await
            .with_context(|| format!("failed to list entries of section '{}'", section_name))?;

        Ok(contents.media_container.metadata)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .header("X-Plex-Token", &self.token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("{}", self.redact(e.to_string())))?
            .error_for_status()
            .map_err(|e| anyhow::anyhow!("{}", self.redact(e.to_string())))?;

        response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("{}", self.redact(e.to_string())))
    }

    /// Strip the token out of a message destined for logs or errors.
    fn redact(&self, message: String) -> String {
        if self.token.is_empty() {
            message
        } else {
            message.replace(&self.token, "[REDACTED]")
        }
    }
}

#[async_trait]
impl ThumbFetcher for PlexClient {
    async fn fetch(&self, thumb_ref: &str) -> Result<Vec<u8>, FetchError> {
        let url = format!("{}{}?X-Plex-Token={}", self.base_url, thumb_ref, self.token);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(self.redact(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(self.redact(e.to_string())))?;

        Ok(bytes.to_vec())
    }
}
