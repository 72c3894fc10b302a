//! Split-point locator
//!
//! Maps a vertical coordinate inside an oversized block to a content offset:
//! the smallest offset whose rendered line bottom lies below the target.

use crate::layout::GeometryProvider;

/// Binary search over content offsets `[0, content_size]` of the block whose
/// content starts at `block_start`.
///
/// Offset 0 is never returned as a split (the search lower bound is forced to
/// 1). Returns 0 when no offset renders below `target_y`, or when the
/// geometry cannot resolve an offset. Callers still have to check
/// `0 < offset < content_size` before splitting.
pub fn find_split_offset(
    geometry: &dyn GeometryProvider,
    block_start: usize,
    content_size: usize,
    target_y: f32,
) -> usize {
    let mut low = 0usize;
    let mut high = content_size;
    let mut best = 0usize;

    while low <= high {
        let mid = low + (high - low) / 2;
        if mid == 0 {
            low = 1;
            continue;
        }

        let Some(coords) = geometry.coords_at(block_start + mid) else {
            log::debug!("no coordinates for offset {}", block_start + mid);
            return 0;
        };

        if coords.bottom > target_y {
            best = mid;
            high = mid - 1;
        } else {
            low = mid + 1;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{BlockKind, BlockMeta, ParagraphId};
    use crate::layout::{ComputedStyle, GeometrySnapshot, RenderedBlock};
    use crate::Rect;

    /// 100 bytes over 10 lines of 20px, starting at y = 100
    fn tall_block(start: usize) -> GeometrySnapshot {
        let meta = BlockMeta {
            id: ParagraphId(0),
            kind: BlockKind::Paragraph,
            start_offset: start,
            byte_len: 100,
        };
        let mut snapshot = GeometrySnapshot::new(1.0);
        snapshot.push(RenderedBlock::with_uniform_lines(
            &meta,
            Rect::new(0.0, 100.0, 600.0, 200.0),
            ComputedStyle::default(),
            20.0,
        ));
        snapshot
    }

    #[test]
    fn test_finds_first_offset_below_target() {
        // Line 3 (offsets 30..40) spans 160..180 and is the first to cross 170
        let geometry = tall_block(0);
        assert_eq!(find_split_offset(&geometry, 0, 100, 170.0), 30);
    }

    #[test]
    fn test_target_on_line_boundary_moves_to_next_line() {
        // Line 2 ends exactly at 160, so it still fits
        let geometry = tall_block(0);
        assert_eq!(find_split_offset(&geometry, 0, 100, 160.0), 30);
    }

    #[test]
    fn test_respects_block_start() {
        let geometry = tall_block(50);
        assert_eq!(find_split_offset(&geometry, 50, 100, 170.0), 30);
    }

    #[test]
    fn test_never_returns_zero_as_split() {
        // Everything renders below the target, offset 0 would split nothing
        let geometry = tall_block(0);
        assert_eq!(find_split_offset(&geometry, 0, 100, 50.0), 1);
    }

    #[test]
    fn test_nothing_below_target() {
        let geometry = tall_block(0);
        assert_eq!(find_split_offset(&geometry, 0, 100, 1000.0), 0);
    }

    #[test]
    fn test_empty_block() {
        let geometry = tall_block(0);
        assert_eq!(find_split_offset(&geometry, 0, 0, 150.0), 0);
    }

    #[test]
    fn test_missing_geometry_aborts() {
        let geometry = GeometrySnapshot::default();
        assert_eq!(find_split_offset(&geometry, 0, 100, 150.0), 0);
    }
}
