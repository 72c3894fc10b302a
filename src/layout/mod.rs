//! Rendered layout: geometry queries and a synthetic text renderer

mod engine;
pub mod font;
mod geometry;
mod line_break;

pub use engine::{TextLayoutRenderer, INDENT_WIDTH};
pub use font::FontMetrics;
pub use geometry::{
    BlockBox, ComputedStyle, Coords, GeometryProvider, GeometrySnapshot, RenderedBlock,
    RenderedLine, Renderer, SnapshotRenderer,
};
pub use line_break::LineBreaker;
