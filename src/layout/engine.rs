//! Turns an assembled catalog into a renderable block stream.
//!
//! The engine is pure: it walks the document once and emits front matter,
//! section dividers, and card grids in order, deciding break policy and
//! substituting placeholders for unresolved artwork. Card order inside a
//! grid is exactly the assembled entry order.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::domain::{CatalogDocument, CatalogEntry, EntryDetails};

use super::rules::LayoutRules;

/// The laid-out document handed to a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderDocument {
    pub title: String,
    pub generated_on: NaiveDate,
    pub rules: LayoutRules,
    pub blocks: Vec<FlowBlock>,
}

/// One flowed content block. Blocks appear in render order.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowBlock {
    /// Cover page: title, generation date, aggregate counts. Always forces
    /// a page break after itself.
    Cover {
        section_counts: Vec<(String, usize)>,
        total_entries: usize,
    },

    /// One line per section with its entry count. Breaks after itself.
    TableOfContents { lines: Vec<TocLine> },

    /// Full-page section marker. `break_after` is false only when this is
    /// the final block of the document, so an empty trailing section never
    /// produces a blank page.
    SectionDivider {
        name: String,
        entry_count: usize,
        break_after: bool,
    },

    /// Wrapping multi-column grid of entry cards. May be empty.
    CardGrid { section: String, cards: Vec<Card> },
}

/// A table-of-contents line.
#[derive(Debug, Clone, PartialEq)]
pub struct TocLine {
    pub section: String,
    pub entry_count: usize,
}

/// One entry card, fully formatted for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub artwork: Artwork,
    pub title: String,

    /// "year • rating", or just the rating when the year is unknown.
    pub meta_line: String,

    /// Comma-joined genres; `None` when the entry has no genres.
    pub genre_line: Option<String>,

    /// Runtime or unit-count line; `None` for a film without a runtime.
    pub detail_line: Option<String>,
}

/// Poster image or a same-sized text placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Artwork {
    Poster(PathBuf),
    Placeholder,
}

/// Lay out the assembled document under the given rules.
pub fn layout(document: &CatalogDocument, rules: LayoutRules) -> RenderDocument {
    let section_counts: Vec<(String, usize)> = document
        .sections
        .iter()
        .map(|s| (s.name.clone(), s.len()))
        .collect();

    let mut blocks = Vec::with_capacity(2 + document.sections.len() * 2);

    blocks.push(FlowBlock::Cover {
        section_counts: section_counts.clone(),
        total_entries: document.total_entries(),
    });

    blocks.push(FlowBlock::TableOfContents {
        lines: section_counts
            .iter()
            .map(|(section, entry_count)| TocLine {
                section: section.clone(),
                entry_count: *entry_count,
            })
            .collect(),
    });

    let last_index = document.sections.len().saturating_sub(1);
    for (i, section) in document.sections.iter().enumerate() {
        // An empty trailing section's divider is the document's last page;
        // forcing a break there would emit a blank page after it.
        let break_after = !(i == last_index && section.is_empty());

        blocks.push(FlowBlock::SectionDivider {
            name: section.name.clone(),
            entry_count: section.len(),
            break_after,
        });

        blocks.push(FlowBlock::CardGrid {
            section: section.name.clone(),
            cards: section.entries.iter().map(card_for_entry).collect(),
        });
    }

    RenderDocument {
        title: document.title.clone(),
        generated_on: document.generated_on,
        rules,
        blocks,
    }
}

/// Format one entry as a card, substituting a placeholder when artwork
/// never resolved.
fn card_for_entry(entry: &CatalogEntry) -> Card {
    let artwork = match &entry.resolved_asset_path {
        Some(path) => Artwork::Poster(path.clone()),
        None => Artwork::Placeholder,
    };

    let meta_line = match entry.year {
        Some(year) => format!("{} • {}", year, entry.content_rating),
        None => entry.content_rating.clone(),
    };

    let genre_line = if entry.genres.is_empty() {
        None
    } else {
        Some(entry.genres.join(", "))
    };

    let detail_line = match &entry.details {
        EntryDetails::Film { duration_minutes } => {
            duration_minutes.map(|m| format!("{} min", m))
        }
        EntryDetails::Series {
            season_count,
            episode_count,
        } => Some(format!(
            "{} • {}",
            pluralize(*season_count, "season"),
            pluralize(*episode_count, "episode")
        )),
    };

    Card {
        artwork,
        title: entry.title.clone(),
        meta_line,
        genre_line,
        detail_line,
    }
}

fn pluralize(count: u32, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CatalogEntry, CatalogSection, EntryDetails};

    fn film(title: &str) -> CatalogEntry {
        CatalogEntry {
            title: title.to_string(),
            year: Some(1999),
            content_rating: "R".to_string(),
            genres: vec!["Action".to_string(), "Sci-Fi".to_string()],
            details: EntryDetails::Film {
                duration_minutes: Some(136),
            },
            rating_key: title.to_string(),
            remote_thumb_ref: None,
            resolved_asset_path: None,
        }
    }

    fn series(title: &str, seasons: u32, episodes: u32) -> CatalogEntry {
        CatalogEntry {
            details: EntryDetails::Series {
                season_count: seasons,
                episode_count: episodes,
            },
            ..film(title)
        }
    }

    fn document(sections: Vec<CatalogSection>) -> CatalogDocument {
        CatalogDocument {
            title: "Test Library".to_string(),
            generated_on: NaiveDate::from_ymd_opt(2026, 8, 23).unwrap(),
            sections,
        }
    }

    #[test]
    fn block_order_is_cover_toc_then_divider_grid_pairs() {
        let doc = document(vec![
            CatalogSection {
                name: "Movies".to_string(),
                entries: vec![film("The Matrix")],
            },
            CatalogSection {
                name: "TV Shows".to_string(),
                entries: vec![series("Lost", 6, 121)],
            },
        ]);

        let rendered = layout(&doc, LayoutRules::default());
        assert!(matches!(rendered.blocks[0], FlowBlock::Cover { .. }));
        assert!(matches!(rendered.blocks[1], FlowBlock::TableOfContents { .. }));
        assert!(matches!(rendered.blocks[2], FlowBlock::SectionDivider { .. }));
        assert!(matches!(rendered.blocks[3], FlowBlock::CardGrid { .. }));
        assert!(matches!(rendered.blocks[4], FlowBlock::SectionDivider { .. }));
        assert!(matches!(rendered.blocks[5], FlowBlock::CardGrid { .. }));
        assert_eq!(rendered.blocks.len(), 6);
    }

    #[test]
    fn cover_carries_aggregate_counts() {
        let doc = document(vec![
            CatalogSection {
                name: "Movies".to_string(),
                entries: vec![film("A"), film("B")],
            },
            CatalogSection {
                name: "TV Shows".to_string(),
                entries: vec![],
            },
        ]);

        let rendered = layout(&doc, LayoutRules::default());
        let FlowBlock::Cover {
            section_counts,
            total_entries,
        } = &rendered.blocks[0]
        else {
            panic!("first block must be the cover");
        };
        assert_eq!(*total_entries, 2);
        assert_eq!(section_counts[1], ("TV Shows".to_string(), 0));
    }

    #[test]
    fn empty_section_keeps_divider_and_empty_grid() {
        let doc = document(vec![
            CatalogSection {
                name: "Movies".to_string(),
                entries: vec![film("A")],
            },
            CatalogSection {
                name: "TV Shows".to_string(),
                entries: vec![],
            },
        ]);

        let rendered = layout(&doc, LayoutRules::default());
        let FlowBlock::SectionDivider {
            entry_count,
            break_after,
            ..
        } = &rendered.blocks[4]
        else {
            panic!("expected trailing divider");
        };
        assert_eq!(*entry_count, 0);
        // The empty grid after it renders nothing, so no trailing break.
        assert!(!*break_after);

        let FlowBlock::CardGrid { cards, .. } = &rendered.blocks[5] else {
            panic!("expected trailing grid");
        };
        assert!(cards.is_empty());
    }

    #[test]
    fn nonempty_trailing_section_divider_still_breaks() {
        let doc = document(vec![
            CatalogSection {
                name: "Movies".to_string(),
                entries: vec![],
            },
            CatalogSection {
                name: "TV Shows".to_string(),
                entries: vec![series("Lost", 6, 121)],
            },
        ]);

        let rendered = layout(&doc, LayoutRules::default());
        let FlowBlock::SectionDivider { break_after, .. } = &rendered.blocks[4] else {
            panic!("expected trailing divider");
        };
        assert!(*break_after);
    }

    #[test]
    fn card_order_matches_entry_order() {
        let doc = document(vec![
            CatalogSection {
                name: "Movies".to_string(),
                entries: vec![film("A"), film("B"), film("C")],
            },
            CatalogSection {
                name: "TV Shows".to_string(),
                entries: vec![],
            },
        ]);

        let rendered = layout(&doc, LayoutRules::default());
        let FlowBlock::CardGrid { cards, .. } = &rendered.blocks[3] else {
            panic!("expected movie grid");
        };
        let titles: Vec<&str> = cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[test]
    fn unresolved_artwork_becomes_placeholder() {
        let mut resolved = film("Resolved");
        resolved.resolved_asset_path = Some(PathBuf::from("/cache/movies/Resolved_1.jpg"));
        let unresolved = film("Unresolved");

        let resolved_card = card_for_entry(&resolved);
        let placeholder_card = card_for_entry(&unresolved);

        assert_eq!(
            resolved_card.artwork,
            Artwork::Poster(PathBuf::from("/cache/movies/Resolved_1.jpg"))
        );
        assert_eq!(placeholder_card.artwork, Artwork::Placeholder);
        assert_eq!(placeholder_card.title, "Unresolved");
    }

    #[test]
    fn film_card_lines() {
        let card = card_for_entry(&film("The Matrix"));
        assert_eq!(card.meta_line, "1999 • R");
        assert_eq!(card.genre_line.as_deref(), Some("Action, Sci-Fi"));
        assert_eq!(card.detail_line.as_deref(), Some("136 min"));
    }

    #[test]
    fn missing_year_renders_rating_alone() {
        let mut entry = film("Undated");
        entry.year = None;
        let card = card_for_entry(&entry);
        assert_eq!(card.meta_line, "R");
    }

    #[test]
    fn empty_genres_omit_the_line() {
        let mut entry = film("Plain");
        entry.genres.clear();
        let card = card_for_entry(&entry);
        assert!(card.genre_line.is_none());
    }

    #[test]
    fn season_count_agrees_in_number() {
        let one = card_for_entry(&series("Mini", 1, 8));
        assert_eq!(one.detail_line.as_deref(), Some("1 season • 8 episodes"));

        let two = card_for_entry(&series("Long", 2, 1));
        assert_eq!(two.detail_line.as_deref(), Some("2 seasons • 1 episode"));
    }
}
