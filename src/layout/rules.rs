//! Declarative layout rules.
//!
//! Page geometry, grid dimensions, and break policy live here as plain
//! data. The layout engine consumes them; the renderer adapter translates
//! them into its own stylesheet language. Nothing in this module computes.

use serde::{Deserialize, Serialize};

/// Full rule set for one catalog document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRules {
    pub page: PageRules,
    pub grid: GridRules,
    pub fonts: FontRules,
}

/// Fixed page size and margins, in points.
///
/// The binding margin sits on the left edge and is wider than the other
/// three to leave room for hole punching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRules {
    pub width_pt: f32,
    pub height_pt: f32,
    pub margin_top_pt: f32,
    pub margin_outer_pt: f32,
    pub margin_bottom_pt: f32,
    pub margin_binding_pt: f32,

    /// Centered page number in the footer of every page except the cover.
    pub numbered_footer: bool,
}

impl PageRules {
    /// Horizontal space available to content.
    pub fn content_width_pt(&self) -> f32 {
        self.width_pt - self.margin_binding_pt - self.margin_outer_pt
    }
}

/// Entry-card grid: fixed column count, fixed card width, cards wrap to
/// new rows and are never split across a page boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRules {
    pub columns: u32,
    pub gutter_pt: f32,
    pub card_width_pt: f32,
    pub poster_width_pt: f32,
    pub poster_height_pt: f32,
}

/// Font choices handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontRules {
    pub body_family: String,
    pub heading_family: String,
    pub body_size_pt: f32,
    pub title_size_pt: f32,
}

impl Default for LayoutRules {
    /// US Letter with a one-inch binding margin and a two-column card grid.
    fn default() -> Self {
        Self {
            page: PageRules {
                width_pt: 612.0,
                height_pt: 792.0,
                margin_top_pt: 36.0,
                margin_outer_pt: 36.0,
                margin_bottom_pt: 36.0,
                margin_binding_pt: 72.0,
                numbered_footer: true,
            },
            grid: GridRules {
                columns: 2,
                gutter_pt: 24.0,
                card_width_pt: 240.0,
                poster_width_pt: 220.0,
                poster_height_pt: 330.0,
            },
            fonts: FontRules {
                body_family: "Helvetica, Arial, sans-serif".to_string(),
                heading_family: "Georgia, 'Times New Roman', serif".to_string(),
                body_size_pt: 9.0,
                title_size_pt: 11.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_page_is_letter_with_binding_margin() {
        let rules = LayoutRules::default();
        assert_eq!(rules.page.width_pt, 612.0);
        assert_eq!(rules.page.height_pt, 792.0);
        assert!(rules.page.margin_binding_pt > rules.page.margin_outer_pt);
    }

    #[test]
    fn default_grid_fits_the_content_width() {
        let rules = LayoutRules::default();
        let grid_width = rules.grid.card_width_pt * rules.grid.columns as f32
            + rules.grid.gutter_pt * (rules.grid.columns - 1) as f32;
        assert!(grid_width <= rules.page.content_width_pt());
    }

    #[test]
    fn default_poster_box_is_two_by_three() {
        let rules = LayoutRules::default();
        assert_eq!(
            rules.grid.poster_height_pt,
            rules.grid.poster_width_pt * 1.5
        );
    }
}
