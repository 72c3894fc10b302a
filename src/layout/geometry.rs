//! Rendered geometry as seen by the pagination engine
//!
//! The engine never talks to a renderer directly. It reads boxes, computed
//! styles and per-offset coordinates through [`GeometryProvider`], so the
//! same algorithm runs against a live renderer or a synthetic fixture.

use crate::document::{BlockMeta, Document};
use crate::Rect;
use serde::{Deserialize, Serialize};

/// Computed style values the engine needs, in unscaled CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComputedStyle {
    pub margin_top: f32,
    pub margin_bottom: f32,
    /// `None` when the style reports a non-numeric value such as `normal`
    pub line_height: Option<f32>,
    pub font_size: f32,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            margin_top: 0.0,
            margin_bottom: 0.0,
            line_height: None,
            font_size: 16.0,
        }
    }
}

impl ComputedStyle {
    /// Line height, falling back to `font_size * fallback_factor`
    pub fn resolved_line_height(&self, fallback_factor: f32) -> f32 {
        match self.line_height {
            Some(lh) if lh > 0.0 && lh.is_finite() => lh,
            _ => self.font_size * fallback_factor,
        }
    }
}

/// A block's rendered box (in reported, possibly zoomed pixels) and its style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockBox {
    pub rect: Rect,
    pub style: ComputedStyle,
}

/// Vertical extent of the line holding an offset, in reported pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coords {
    pub top: f32,
    pub bottom: f32,
}

/// Read-only view of the current rendered layout
pub trait GeometryProvider {
    /// Ratio between reported pixels and layout pixels (zoom level)
    fn scale(&self) -> f32 {
        1.0
    }

    /// The rendered box of a top-level block, if it has been rendered
    fn block_box(&self, block: &BlockMeta) -> Option<BlockBox>;

    /// Coordinates of the line containing an absolute document offset
    fn coords_at(&self, offset: usize) -> Option<Coords>;
}

/// Something that renders a document and exposes the resulting geometry
pub trait Renderer {
    fn render(&mut self, document: &Document) -> &dyn GeometryProvider;
}

/// One rendered line: content from `start` (relative to the block) onwards
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedLine {
    pub start: usize,
    pub top: f32,
    pub bottom: f32,
}

/// Rendered geometry of one top-level block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedBlock {
    /// Absolute offset of the block's content, the anchor it is keyed by
    pub start_offset: usize,
    pub byte_len: usize,
    pub rect: Rect,
    #[serde(default)]
    pub style: ComputedStyle,
    /// Lines in visual order. May be empty for atomic blocks.
    #[serde(default)]
    pub lines: Vec<RenderedLine>,
}

impl RenderedBlock {
    /// Block whose content is spread evenly over lines of `line_height`
    /// reported pixels, filling `rect`
    pub fn with_uniform_lines(
        block: &BlockMeta,
        rect: Rect,
        style: ComputedStyle,
        line_height: f32,
    ) -> Self {
        let line_count = if line_height > 0.0 {
            ((rect.height / line_height).round() as usize).max(1)
        } else {
            1
        };
        let per_line = block.byte_len.div_ceil(line_count).max(1);

        let lines = (0..line_count)
            .map(|i| {
                let top = rect.y + i as f32 * line_height;
                RenderedLine {
                    start: (i * per_line).min(block.byte_len),
                    top,
                    bottom: top + line_height,
                }
            })
            .collect();

        Self {
            start_offset: block.start_offset,
            byte_len: block.byte_len,
            rect,
            style,
            lines,
        }
    }

    fn end_offset(&self) -> usize {
        self.start_offset + self.byte_len
    }

    fn coords_at_local(&self, local: usize) -> Coords {
        let idx = self.lines.partition_point(|line| line.start <= local);
        match idx.checked_sub(1).and_then(|i| self.lines.get(i)) {
            Some(line) => Coords {
                top: line.top,
                bottom: line.bottom,
            },
            None => Coords {
                top: self.rect.y,
                bottom: self.rect.bottom(),
            },
        }
    }
}

/// Geometry captured at one point in time, either computed by a renderer in
/// this crate or measured by the host and pushed in as JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeometrySnapshot {
    pub scale: f32,
    /// Ordered by `start_offset`
    pub blocks: Vec<RenderedBlock>,
}

impl Default for GeometrySnapshot {
    fn default() -> Self {
        Self {
            scale: 1.0,
            blocks: Vec::new(),
        }
    }
}

impl GeometrySnapshot {
    pub fn new(scale: f32) -> Self {
        Self {
            scale,
            blocks: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        let mut snapshot: Self = serde_json::from_str(json)?;
        snapshot.blocks.sort_by_key(|b| b.start_offset);
        Ok(snapshot)
    }

    /// Add a block. Blocks must be pushed in document order.
    pub fn push(&mut self, block: RenderedBlock) {
        debug_assert!(self
            .blocks
            .last()
            .map_or(true, |last| last.start_offset < block.start_offset));
        self.blocks.push(block);
    }

    fn block_containing(&self, offset: usize) -> Option<&RenderedBlock> {
        let idx = self.blocks.partition_point(|b| b.start_offset <= offset);
        let block = self.blocks.get(idx.checked_sub(1)?)?;
        (offset <= block.end_offset()).then_some(block)
    }
}

impl GeometryProvider for GeometrySnapshot {
    fn scale(&self) -> f32 {
        self.scale
    }

    fn block_box(&self, block: &BlockMeta) -> Option<BlockBox> {
        let idx = self
            .blocks
            .binary_search_by_key(&block.start_offset, |b| b.start_offset)
            .ok()?;
        let rendered = &self.blocks[idx];
        Some(BlockBox {
            rect: rendered.rect,
            style: rendered.style,
        })
    }

    fn coords_at(&self, offset: usize) -> Option<Coords> {
        let block = self.block_containing(offset)?;
        Some(block.coords_at_local(offset - block.start_offset))
    }
}

/// Renderer backed by whatever snapshot the host pushed last
#[derive(Debug, Clone, Default)]
pub struct SnapshotRenderer {
    snapshot: GeometrySnapshot,
}

impl SnapshotRenderer {
    pub fn new(snapshot: GeometrySnapshot) -> Self {
        Self { snapshot }
    }

    pub fn update(&mut self, snapshot: GeometrySnapshot) {
        self.snapshot = snapshot;
    }

    pub fn snapshot(&self) -> &GeometrySnapshot {
        &self.snapshot
    }
}

impl Renderer for SnapshotRenderer {
    fn render(&mut self, _document: &Document) -> &dyn GeometryProvider {
        &self.snapshot
    }
}
