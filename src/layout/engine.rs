//! Synthetic text renderer
//!
//! Lays a document out the way a browser would stack block elements: each
//! block is line-broken to the page content width and placed below the
//! previous one. Used where no live renderer exists (native hosts, tests,
//! benchmarks).

use crate::document::{BlockKind, BlockMeta, Document};
use crate::layout::font::FontMetrics;
use crate::layout::geometry::{
    ComputedStyle, GeometryProvider, GeometrySnapshot, RenderedBlock, RenderedLine, Renderer,
};
use crate::layout::line_break::LineBreaker;
use crate::pagination::PageProfile;
use crate::Rect;

/// Indentation width per list level
pub const INDENT_WIDTH: f32 = 24.0;

/// Renders documents into a [`GeometrySnapshot`] using font metrics
#[derive(Debug)]
pub struct TextLayoutRenderer {
    profile: PageProfile,
    metrics: FontMetrics,
    /// Zoom factor applied to every reported coordinate
    scale: f32,
    /// Multiplier for the margin below each block
    block_spacing: f32,
    line_breaker: LineBreaker,
    snapshot: GeometrySnapshot,
}

impl TextLayoutRenderer {
    pub fn new(profile: PageProfile, metrics: FontMetrics) -> Self {
        Self {
            profile,
            metrics,
            scale: 1.0,
            block_spacing: 1.0,
            line_breaker: LineBreaker::new(),
            snapshot: GeometrySnapshot::default(),
        }
    }

    /// Report geometry zoomed by `scale`
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Scale the margin below blocks; 0 stacks blocks flush
    pub fn with_block_spacing(mut self, block_spacing: f32) -> Self {
        self.block_spacing = block_spacing;
        self
    }

    /// Get indent for block type
    pub fn indent_for(&self, kind: &BlockKind) -> f32 {
        match kind {
            BlockKind::ListItem { indent_level, .. } => *indent_level as f32 * INDENT_WIDTH,
            _ => 0.0,
        }
    }

    fn style_for(&self, kind: &BlockKind) -> ComputedStyle {
        let multiplier = kind.line_height_multiplier();
        let font_size = self.metrics.font_size * multiplier;
        let line_height = match kind {
            BlockKind::Embed { height } => *height as f32,
            _ => self.metrics.line_height * multiplier,
        };

        ComputedStyle {
            margin_top: 0.0,
            margin_bottom: self.metrics.font_size * kind.spacing_after() * self.block_spacing,
            line_height: Some(line_height),
            font_size,
        }
    }

    /// Returns the block and its unscaled height
    fn layout_block(&self, meta: &BlockMeta, text: &str, y: f32) -> (RenderedBlock, f32) {
        let style = self.style_for(&meta.kind);
        let line_height = style.line_height.unwrap_or(self.metrics.line_height);
        let indent = self.indent_for(&meta.kind);
        let width = self.profile.content_width() - indent;

        let ranges = match meta.kind {
            BlockKind::Embed { .. } => vec![0..0],
            _ => self.line_breaker.break_lines(
                text,
                &self.metrics,
                meta.kind.line_height_multiplier(),
                width,
            ),
        };

        let s = self.scale;
        let lines = ranges
            .iter()
            .enumerate()
            .map(|(i, range)| {
                let top = y + i as f32 * line_height;
                RenderedLine {
                    start: range.start,
                    top: top * s,
                    bottom: (top + line_height) * s,
                }
            })
            .collect::<Vec<_>>();

        let height = lines.len() as f32 * line_height;

        let block = RenderedBlock {
            start_offset: meta.start_offset,
            byte_len: meta.byte_len,
            rect: Rect::new(
                (self.profile.margin_left + indent) * s,
                y * s,
                width * s,
                height * s,
            ),
            style,
            lines,
        };
        (block, height)
    }

    /// Lay the whole document out
    pub fn layout(&self, document: &Document) -> GeometrySnapshot {
        let mut snapshot = GeometrySnapshot::new(self.scale);
        let mut y = self.profile.margin_top;

        for (meta, text) in document.blocks_with_text() {
            let style = self.style_for(&meta.kind);
            let (block, height) = self.layout_block(&meta, text, y + style.margin_top);
            y += style.margin_top + height + style.margin_bottom;
            snapshot.push(block);
        }

        snapshot
    }
}

impl Renderer for TextLayoutRenderer {
    fn render(&mut self, document: &Document) -> &dyn GeometryProvider {
        self.snapshot = self.layout(document);
        &self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ListId, ListMarker};

    fn renderer() -> TextLayoutRenderer {
        TextLayoutRenderer::new(PageProfile::default(), FontMetrics::monospace(16.0, 24.0, 8.0))
    }

    #[test]
    fn test_blocks_stack_from_top_margin() {
        let doc = Document::from_text("first\nsecond");
        let snapshot = renderer().layout(&doc);

        assert_eq!(snapshot.blocks.len(), 2);
        assert_eq!(snapshot.blocks[0].rect.y, 96.0);
        assert_eq!(snapshot.blocks[0].rect.height, 24.0);
        // 24px line + 16px paragraph margin
        assert_eq!(snapshot.blocks[1].rect.y, 136.0);
    }

    #[test]
    fn test_long_paragraph_wraps() {
        // 624px content width / 8px per char = 78 chars per line
        let doc = Document::from_text(&"word ".repeat(100));
        let snapshot = renderer().layout(&doc);
        let block = &snapshot.blocks[0];

        assert!(block.lines.len() > 5);
        assert_eq!(block.rect.height, block.lines.len() as f32 * 24.0);
    }

    #[test]
    fn test_scale_applies_to_coordinates() {
        let doc = Document::from_text("zoomed");
        let snapshot = renderer().with_scale(2.0).layout(&doc);

        assert_eq!(snapshot.scale, 2.0);
        assert_eq!(snapshot.blocks[0].rect.y, 192.0);
        assert_eq!(snapshot.blocks[0].rect.height, 48.0);
        assert_eq!(snapshot.blocks[0].style.line_height, Some(24.0));
    }

    #[test]
    fn test_embed_and_list_styles() {
        let doc = Document::from_blocks([
            (BlockKind::Embed { height: 300 }, ""),
            (
                BlockKind::ListItem {
                    list_id: ListId(1),
                    indent_level: 2,
                    marker: ListMarker::Bullet,
                },
                "item",
            ),
        ]);
        let snapshot = renderer().with_block_spacing(0.0).layout(&doc);

        assert_eq!(snapshot.blocks[0].rect.height, 300.0);
        assert_eq!(snapshot.blocks[1].rect.y, 396.0);
        assert_eq!(snapshot.blocks[1].rect.x, 96.0 + 48.0);
    }

    #[test]
    fn test_renderer_tracks_document() {
        let mut renderer = renderer();
        let doc = Document::from_text("a\nb\nc");
        let geometry = renderer.render(&doc);
        assert!(geometry.coords_at(4).is_some());
        assert!(geometry.coords_at(6).is_none());
    }
}
