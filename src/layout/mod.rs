//! Layout: declarative rules plus the engine that applies them.

pub mod engine;
pub mod rules;

pub use engine::{layout, Artwork, Card, FlowBlock, RenderDocument, TocLine};
pub use rules::{FontRules, GridRules, LayoutRules, PageRules};
