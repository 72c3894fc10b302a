//! Layout measurement engine
//!
//! A pass walks the top-level blocks in document order, accumulating the
//! height used on the current page. It ends with either a full overlay set or
//! a single split request for an oversized text block. A split mutates the
//! document, so the pass stops there and the next pass measures the result.

use crate::document::{BlockMeta, Document, ParagraphId};
use crate::editing::EditOp;
use crate::error::{PaginationError, Result};
use crate::layout::{GeometryProvider, Renderer};
use crate::pagination::split::find_split_offset;
use crate::pagination::{LayoutMode, OverlayBuilder, OverlaySet, PageProfile};

/// Per-pass measurement of one rendered block, in layout pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockGeometry {
    /// Rendered top edge, in reported (scaled) pixels
    pub top: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub line_height: f32,
}

impl BlockGeometry {
    /// Measure a block. `None` when the block has not been rendered.
    pub fn measure(
        block: &BlockMeta,
        geometry: &dyn GeometryProvider,
        profile: &PageProfile,
    ) -> Option<Self> {
        let block_box = geometry.block_box(block)?;
        let scale = effective_scale(geometry);

        Some(Self {
            top: block_box.rect.y,
            height: block_box.rect.height / scale,
            margin_top: finite_or_zero(block_box.style.margin_top),
            margin_bottom: finite_or_zero(block_box.style.margin_bottom),
            line_height: block_box
                .style
                .resolved_line_height(profile.line_height_fallback),
        })
    }

    /// Height including vertical margins
    pub fn effective_height(&self) -> f32 {
        self.height + self.margin_top + self.margin_bottom
    }

    /// Rendered line count. An unknown line height counts as unbounded.
    pub fn line_count(&self) -> f32 {
        if self.line_height > 0.0 {
            self.height / self.line_height
        } else {
            f32::INFINITY
        }
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn effective_scale(geometry: &dyn GeometryProvider) -> f32 {
    let scale = geometry.scale();
    if scale > 0.0 && scale.is_finite() {
        scale
    } else {
        1.0
    }
}

/// Result of one measurement pass
#[derive(Debug, Clone, PartialEq)]
pub enum PassOutcome {
    /// Every block was placed
    Paginated {
        overlays: OverlaySet,
        page_count: usize,
    },
    /// An oversized block has to be split at absolute offset `at` first
    Split { block: ParagraphId, at: usize },
}

/// Accumulated page budget during a pass
struct PassState<'a> {
    profile: &'a PageProfile,
    layout_mode: LayoutMode,
    budget: f32,
    page_number: usize,
    overlays: OverlayBuilder,
}

impl PassState<'_> {
    fn content_height(&self) -> f32 {
        self.profile.content_height()
    }

    /// Spacer height that moves following content from the current page to
    /// the next one, given the space still left on the current page
    fn break_height(&self, remaining: f32) -> f32 {
        match self.layout_mode {
            LayoutMode::Grid => remaining,
            LayoutMode::Paged => remaining + self.profile.page_separation(),
        }
    }

    /// Push the block starting at `anchor` to a fresh page
    fn page_break(&mut self, anchor: usize) {
        let remaining = (self.content_height() - self.budget).max(0.0);
        let height = self.break_height(remaining);
        self.overlays.spacer(anchor, height);
        self.page_number += 1;
    }

    fn is_massive(&self, block: &BlockMeta, geom: &BlockGeometry) -> bool {
        block.kind.is_textblock()
            && geom.line_count() > self.profile.massive_min_lines
            && geom.effective_height() > self.content_height()
    }
}

/// Run one measurement pass against the current rendered geometry
pub fn measure_pass(
    document: &Document,
    geometry: &dyn GeometryProvider,
    profile: &PageProfile,
    layout_mode: LayoutMode,
) -> PassOutcome {
    let scale = effective_scale(geometry);
    let mut pass = PassState {
        profile,
        layout_mode,
        budget: 0.0,
        page_number: 1,
        overlays: OverlayBuilder::new(),
    };

    for block in document.blocks() {
        let Some(geom) = BlockGeometry::measure(&block, geometry, profile) else {
            log::trace!("block {:?} is not rendered, skipping", block.id);
            continue;
        };

        let effective_height = geom.effective_height();
        if !(effective_height > 0.0) {
            log::trace!("block {:?} has no height, skipping", block.id);
            continue;
        }

        if pass.is_massive(&block, &geom) {
            let available = pass.content_height() - pass.budget;

            if available <= 0.0 {
                // Page is full: the block opens the next sheet unmeasured.
                // The spacer is the sheet separation in both layout modes.
                pass.overlays
                    .spacer(block.start_offset, profile.page_separation());
                pass.page_number += 1;
                pass.budget = 0.0;
                log::trace!(
                    "massive block {:?} carried to page {}",
                    block.id,
                    pass.page_number
                );
                continue;
            }

            let target_y = geom.top + available * scale;
            let offset = find_split_offset(geometry, block.start_offset, block.byte_len, target_y);

            if offset > 0 && offset < block.byte_len {
                let at = block.start_offset + offset;
                log::debug!(
                    "splitting block {:?} at {} ({}px left on page {})",
                    block.id,
                    at,
                    available,
                    pass.page_number
                );
                return PassOutcome::Split { block: block.id, at };
            }

            log::debug!("no interior split point for block {:?}, leaving it whole", block.id);
            continue;
        }

        if pass.budget + effective_height > pass.content_height() {
            pass.page_break(block.start_offset);
            pass.budget = effective_height;
            log::trace!("block {:?} opens page {}", block.id, pass.page_number);
        } else {
            pass.budget += effective_height;
        }
    }

    let doc_size = document.len();
    let remainder = pass.content_height() - pass.budget;
    pass.overlays.footer(doc_size, pass.page_number, remainder);

    log::debug!(
        "pagination pass finished: {} pages, {} overlays",
        pass.page_number,
        pass.overlays.len()
    );

    PassOutcome::Paginated {
        overlays: pass.overlays.finish(doc_size),
        page_count: pass.page_number,
    }
}

/// Final result of [`paginate`]
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated {
    pub overlays: OverlaySet,
    pub page_count: usize,
    /// Splits applied to the document on the way
    pub splits: usize,
    /// Measurement passes run, including the last one
    pub passes: usize,
}

/// Re-run measurement until no block needs splitting, applying each
/// requested split to `document` in between.
///
/// This is the frame-driven cycle collapsed into a loop: every split
/// re-renders the document before the next pass. Fails with
/// [`PaginationError::NotConverged`] after `max_passes` passes, and with
/// [`PaginationError::Profile`] before any pass when the profile leaves no
/// content area.
pub fn paginate<R: Renderer + ?Sized>(
    document: &mut Document,
    renderer: &mut R,
    profile: &PageProfile,
    layout_mode: LayoutMode,
    max_passes: usize,
) -> Result<Paginated> {
    profile.validate()?;
    let mut splits = 0;

    for pass in 1..=max_passes {
        let outcome = {
            let geometry = renderer.render(document);
            measure_pass(document, geometry, profile, layout_mode)
        };

        match outcome {
            PassOutcome::Paginated {
                overlays,
                page_count,
            } => {
                return Ok(Paginated {
                    overlays,
                    page_count,
                    splits,
                    passes: pass,
                });
            }
            PassOutcome::Split { at, .. } => {
                let at = document.interior_split_point(at)?;
                document.apply_edit(EditOp::split_block(at))?;
                splits += 1;
            }
        }
    }

    log::warn!("pagination still splitting after {} passes", max_passes);
    Err(PaginationError::NotConverged { passes: max_passes })
}
