//! WeasyPrint renderer: laid-out document -> HTML + CSS -> PDF.
//!
//! The layout rules translate one-for-one into a stylesheet (page size,
//! binding margin, footer counter, grid and card dimensions, break policy)
//! and the block stream into an HTML body. The `weasyprint` binary does
//! the actual pagination and PDF emission as a subprocess.

use std::fmt::Write as _;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;

use crate::layout::{Artwork, FlowBlock, LayoutRules, RenderDocument};

use super::DocumentRenderer;

const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(300);

/// Renderer driving the `weasyprint` CLI.
pub struct WeasyPrintRenderer {
    binary_path: String,
    render_timeout: Duration,
}

impl Default for WeasyPrintRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl WeasyPrintRenderer {
    pub fn new() -> Self {
        Self {
            binary_path: "weasyprint".to_string(),
            render_timeout: DEFAULT_RENDER_TIMEOUT,
        }
    }

    /// Use a specific binary instead of whatever is on PATH.
    pub fn with_binary_path(binary_path: impl Into<String>) -> Self {
        Self {
            binary_path: binary_path.into(),
            render_timeout: DEFAULT_RENDER_TIMEOUT,
        }
    }

    async fn run_subprocess(&self, html: &Path, css: &Path, destination: &Path) -> Result<()> {
        let child = Command::new(&self.binary_path)
            .arg(html)
            .arg(destination)
            .arg("-s")
            .arg(css)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn '{}'", self.binary_path))?;

        let output = timeout(self.render_timeout, child.wait_with_output())
            .await
            .with_context(|| {
                format!("weasyprint timed out after {:?}", self.render_timeout)
            })?
            .context("failed to wait for weasyprint")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let exit_code = output.status.code().unwrap_or(-1);
            anyhow::bail!(
                "weasyprint failed with exit code {}: {}",
                exit_code,
                stderr.trim()
            );
        }

        Ok(())
    }
}

#[async_trait]
impl DocumentRenderer for WeasyPrintRenderer {
    fn name(&self) -> &str {
        "weasyprint"
    }

    async fn render(&self, document: &RenderDocument, destination: &Path) -> Result<()> {
        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("failed to create output directory: {}", parent.display())
                })?;
            }
        }

        let work_dir = tempfile::tempdir().context("failed to create work directory")?;
        let html_path = work_dir.path().join("catalog.html");
        let css_path = work_dir.path().join("catalog.css");

        tokio::fs::write(&html_path, document_html(document))
            .await
            .context("failed to write catalog HTML")?;
        tokio::fs::write(&css_path, stylesheet(&document.rules))
            .await
            .context("failed to write catalog stylesheet")?;

        self.run_subprocess(&html_path, &css_path, destination).await
    }

    async fn health_check(&self) -> Result<()> {
        let output = Command::new(&self.binary_path)
            .arg("--version")
            .output()
            .await
            .context("failed to run weasyprint health check")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("weasyprint health check failed: {}", stderr);
        }

        Ok(())
    }
}

/// Render the block stream as an HTML body.
pub fn document_html(document: &RenderDocument) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n",
        escape_html(&document.title)
    );

    for block in &document.blocks {
        match block {
            FlowBlock::Cover {
                section_counts,
                total_entries,
            } => {
                let counts = section_counts
                    .iter()
                    .map(|(name, count)| format!("{}: {}", escape_html(name), count))
                    .collect::<Vec<_>>()
                    .join(" &bull; ");
                let _ = write!(
                    html,
                    "<section class=\"cover\">\n<h1>{}</h1>\n<p class=\"generated\">Generated {}</p>\n<p class=\"counts\">{} titles &mdash; {}</p>\n</section>\n",
                    escape_html(&document.title),
                    document.generated_on.format("%B %-d, %Y"),
                    total_entries,
                    counts
                );
            }
            FlowBlock::TableOfContents { lines } => {
                let _ = write!(html, "<section class=\"toc\">\n<h2>Contents</h2>\n<ul>\n");
                for line in lines {
                    let _ = write!(
                        html,
                        "<li><span class=\"toc-section\">{}</span><span class=\"toc-count\">{}</span></li>\n",
                        escape_html(&line.section),
                        line.entry_count
                    );
                }
                let _ = write!(html, "</ul>\n</section>\n");
            }
            FlowBlock::SectionDivider {
                name,
                entry_count,
                break_after,
            } => {
                let class = if *break_after {
                    "divider"
                } else {
                    "divider no-break"
                };
                let _ = write!(
                    html,
                    "<section class=\"{}\">\n<h2>{}</h2>\n<p>{} titles</p>\n</section>\n",
                    class,
                    escape_html(name),
                    entry_count
                );
            }
            FlowBlock::CardGrid { section, cards } => {
                let _ = write!(
                    html,
                    "<section class=\"grid\" data-section=\"{}\">\n",
                    escape_html(section)
                );
                for card in cards {
                    let _ = write!(html, "<div class=\"card\">\n");
                    match &card.artwork {
                        Artwork::Poster(path) => {
                            let _ = write!(
                                html,
                                "<img class=\"poster\" src=\"{}\" alt=\"\">\n",
                                escape_html(&path.display().to_string())
                            );
                        }
                        Artwork::Placeholder => {
                            let _ = write!(
                                html,
                                "<div class=\"poster placeholder\"><span>{}</span></div>\n",
                                escape_html(&card.title)
                            );
                        }
                    }
                    let _ = write!(
                        html,
                        "<p class=\"card-title\">{}</p>\n<p class=\"meta\">{}</p>\n",
                        escape_html(&card.title),
                        escape_html(&card.meta_line)
                    );
                    if let Some(genres) = &card.genre_line {
                        let _ = write!(
                            html,
                            "<p class=\"genres\">{}</p>\n",
                            escape_html(genres)
                        );
                    }
                    if let Some(detail) = &card.detail_line {
                        let _ = write!(
                            html,
                            "<p class=\"detail\">{}</p>\n",
                            escape_html(detail)
                        );
                    }
                    let _ = write!(html, "</div>\n");
                }
                let _ = write!(html, "</section>\n");
            }
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Translate the layout rules into CSS for WeasyPrint.
pub fn stylesheet(rules: &LayoutRules) -> String {
    let page = &rules.page;
    let grid = &rules.grid;
    let fonts = &rules.fonts;

    let footer = if page.numbered_footer {
        // Page number centered in every footer; the cover page is exempt.
        format!(
            "@page {{\n  size: {w}pt {h}pt;\n  margin: {t}pt {o}pt {b}pt {bind}pt;\n  @bottom-center {{\n    content: counter(page);\n    font-family: {body};\n    font-size: {size}pt;\n  }}\n}}\n@page :first {{\n  @bottom-center {{ content: none; }}\n}}\n",
            w = page.width_pt,
            h = page.height_pt,
            t = page.margin_top_pt,
            o = page.margin_outer_pt,
            b = page.margin_bottom_pt,
            bind = page.margin_binding_pt,
            body = fonts.body_family,
            size = fonts.body_size_pt,
        )
    } else {
        format!(
            "@page {{\n  size: {w}pt {h}pt;\n  margin: {t}pt {o}pt {b}pt {bind}pt;\n}}\n",
            w = page.width_pt,
            h = page.height_pt,
            t = page.margin_top_pt,
            o = page.margin_outer_pt,
            b = page.margin_bottom_pt,
            bind = page.margin_binding_pt,
        )
    };

    format!(
        r#"{footer}
body {{
  font-family: {body_family};
  font-size: {body_size}pt;
  color: #1a1a1a;
}}

h1, h2 {{
  font-family: {heading_family};
  font-weight: normal;
}}

.cover {{
  page-break-after: always;
  text-align: center;
  padding-top: 200pt;
}}

.cover h1 {{
  font-size: 36pt;
  margin-bottom: 12pt;
}}

.cover .generated,
.cover .counts {{
  font-size: 12pt;
  color: #555;
}}

.toc {{
  page-break-after: always;
}}

.toc h2 {{
  font-size: 24pt;
  border-bottom: 1pt solid #999;
  padding-bottom: 6pt;
}}

.toc ul {{
  list-style: none;
  padding: 0;
}}

.toc li {{
  display: flex;
  justify-content: space-between;
  font-size: 12pt;
  padding: 6pt 0;
  border-bottom: 0.5pt dotted #bbb;
}}

.divider {{
  page-break-after: always;
  text-align: center;
  padding-top: 300pt;
}}

.divider.no-break {{
  page-break-after: auto;
}}

.divider h2 {{
  font-size: 30pt;
}}

.divider p {{
  font-size: 12pt;
  color: #555;
}}

.grid {{
  display: flex;
  flex-wrap: wrap;
  gap: {gutter}pt;
}}

.card {{
  width: {card_width}pt;
  break-inside: avoid;
  page-break-inside: avoid;
  margin-bottom: {gutter}pt;
}}

.poster {{
  width: {poster_width}pt;
  height: {poster_height}pt;
  object-fit: cover;
}}

.poster.placeholder {{
  display: flex;
  align-items: center;
  justify-content: center;
  text-align: center;
  border: 1pt solid #999;
  background: #f2f2f2;
  font-size: {title_size}pt;
  padding: 6pt;
  box-sizing: border-box;
}}

.card-title {{
  font-size: {title_size}pt;
  font-weight: bold;
  margin: 4pt 0 2pt 0;
}}

.card .meta,
.card .genres,
.card .detail {{
  margin: 1pt 0;
  color: #444;
}}
"#,
        footer = footer,
        body_family = fonts.body_family,
        heading_family = fonts.heading_family,
        body_size = fonts.body_size_pt,
        title_size = fonts.title_size_pt,
        gutter = grid.gutter_pt,
        card_width = grid.card_width_pt,
        poster_width = grid.poster_width_pt,
        poster_height = grid.poster_height_pt,
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
