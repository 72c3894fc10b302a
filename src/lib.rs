//! Page-Flow: page-faithful pagination for a continuous rich-text editor
//!
//! The document stays one continuous flow of blocks. After each change the
//! engine measures the rendered blocks against a fixed page profile and
//! decorates the flow with:
//! - Spacers that push content past the end of a page onto the next sheet
//! - A footer carrying the final page number
//! - Real block splits for paragraphs taller than a page
//!
//! Measurement is deferred to the next rendering frame and re-runs until no
//! block needs splitting.

pub mod document;
pub mod editing;
pub mod editor;
pub mod error;
pub mod layout;
pub mod pagination;
pub mod render;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmPaginator;

// Re-export primary types
pub use document::{BlockKind, BlockMeta, Document, ListMarker, ParagraphId};
pub use editing::{Assoc, EditOp, EditResult, PositionMapping};
pub use editor::{FrameOutcome, PaginatedEditor};
pub use error::{DocumentError, PaginationError, Result};
pub use layout::{GeometryProvider, GeometrySnapshot, Renderer, SnapshotRenderer, TextLayoutRenderer};
pub use pagination::{
    measure_pass, paginate, FrameLoop, LayoutMode, Overlay, OverlayKind, OverlaySet, PageProfile,
    PaginationState,
};
pub use render::{DisplayItem, DisplayList, PageChrome};

use serde::{Deserialize, Serialize};

/// Rectangle in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FontMetrics;

    #[test]
    fn test_rect() {
        let rect = Rect::new(0.0, 100.0, 50.0, 20.0);
        assert_eq!(rect.bottom(), 120.0);
    }

    #[test]
    fn test_session_end_to_end() {
        let frames = FrameLoop::new();
        let profile = PageProfile::default();
        let renderer = TextLayoutRenderer::new(profile, FontMetrics::default());
        let mut editor = PaginatedEditor::new(Document::from_text("Hello"), renderer, profile, &frames);

        editor.apply_edit(EditOp::insert(5, ", World!")).unwrap();
        frames.run_until_idle(8).unwrap();

        assert_eq!(editor.text(), "Hello, World!");
        assert_eq!(editor.page_count(), 1);
        assert_eq!(editor.overlays().footer().map(|f| f.anchor), Some(13));
    }
}
