//! Catalog assembly: ordering entries and grouping them into sections.
//!
//! Pure functions with no network or filesystem access. Sorting happens
//! here, once; the layout engine downstream must preserve the order.

use chrono::Local;

use crate::domain::{CatalogDocument, CatalogEntry, CatalogSection};

/// Sort entries ascending by title, case-insensitive. The sort is stable,
/// so entries whose titles compare equal keep their source order.
pub fn sort_entries(entries: &mut [CatalogEntry]) {
    entries.sort_by_cached_key(|e| e.title.to_lowercase());
}

/// Build the catalog document: two sections, each independently sorted,
/// stamped with today's date. Empty sections still appear with count zero.
pub fn assemble(
    title: &str,
    movie_section: &str,
    mut movies: Vec<CatalogEntry>,
    show_section: &str,
    mut shows: Vec<CatalogEntry>,
) -> CatalogDocument {
    sort_entries(&mut movies);
    sort_entries(&mut shows);

    CatalogDocument {
        title: title.to_string(),
        generated_on: Local::now().date_naive(),
        sections: vec![
            CatalogSection {
                name: movie_section.to_string(),
                entries: movies,
            },
            CatalogSection {
                name: show_section.to_string(),
                entries: shows,
            },
        ],
    }
}
