//! Adapter interfaces for external systems.
//!
//! The only external system the pipeline drives is the document engine
//! that turns a laid-out catalog into a paginated PDF.

pub mod weasyprint;

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

use crate::layout::RenderDocument;

pub use weasyprint::WeasyPrintRenderer;

/// Boundary to a document engine.
///
/// Implementations receive the fully laid-out structure plus its rules and
/// are responsible for pagination and emission; the core never looks at
/// the produced artifact.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Human-readable renderer name.
    fn name(&self) -> &str;

    /// Emit the document to `destination`.
    async fn render(&self, document: &RenderDocument, destination: &Path) -> Result<()>;

    /// Verify the renderer is usable before a run commits to it.
    async fn health_check(&self) -> Result<()>;
}
