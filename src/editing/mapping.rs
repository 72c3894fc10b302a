//! Position mapping across edits
//!
//! Every applied edit produces a [`PositionMapping`]: the ordered list of
//! replaced ranges it performed. Anchors that live outside the document
//! content (pagination overlays) are carried through an edit by mapping them.

use smallvec::SmallVec;

/// Which side of an insertion a position sticks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Assoc {
    /// Stay before content inserted exactly at the position
    Before,
    /// Move after content inserted exactly at the position
    #[default]
    After,
}

/// Result of mapping a single position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapResult {
    /// The mapped position
    pub pos: usize,
    /// Whether the content on both sides of the position was removed
    pub deleted: bool,
}

/// One replaced range: `old_len` bytes at `start` became `new_len` bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRange {
    pub start: usize,
    pub old_len: usize,
    pub new_len: usize,
}

impl StepRange {
    pub fn insertion(at: usize, len: usize) -> Self {
        Self {
            start: at,
            old_len: 0,
            new_len: len,
        }
    }

    pub fn deletion(start: usize, end: usize) -> Self {
        Self {
            start,
            old_len: end.saturating_sub(start),
            new_len: 0,
        }
    }

    fn map(&self, pos: usize, assoc: Assoc) -> MapResult {
        let end = self.start + self.old_len;

        if pos < self.start {
            return MapResult { pos, deleted: false };
        }

        if pos > end {
            return MapResult {
                pos: pos - self.old_len + self.new_len,
                deleted: false,
            };
        }

        let side = if self.old_len == 0 {
            assoc
        } else if pos == self.start {
            Assoc::Before
        } else if pos == end {
            Assoc::After
        } else {
            assoc
        };

        let deleted = self.old_len > 0 && pos != self.start && pos != end;
        let pos = match side {
            Assoc::Before => self.start,
            Assoc::After => self.start + self.new_len,
        };

        MapResult { pos, deleted }
    }
}

/// Ordered sequence of replaced ranges, each expressed in the coordinates
/// produced by the steps before it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionMapping {
    steps: SmallVec<[StepRange; 2]>,
}

impl PositionMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a step
    pub fn push(&mut self, step: StepRange) {
        if step.old_len == 0 && step.new_len == 0 {
            return;
        }
        self.steps.push(step);
    }

    /// Append all steps of a mapping that was applied after this one
    pub fn append(&mut self, other: &PositionMapping) {
        self.steps.extend(other.steps.iter().copied());
    }

    /// True when the mapping leaves every position untouched
    pub fn is_identity(&self) -> bool {
        self.steps.is_empty()
    }

    /// Map a position through every step
    pub fn map(&self, pos: usize, assoc: Assoc) -> usize {
        self.map_result(pos, assoc).pos
    }

    /// Map a position and report whether any step deleted around it
    pub fn map_result(&self, pos: usize, assoc: Assoc) -> MapResult {
        let mut pos = pos;
        let mut deleted = false;

        for step in &self.steps {
            let result = step.map(pos, assoc);
            pos = result.pos;
            deleted |= result.deleted;
        }

        MapResult { pos, deleted }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_shifts_following_positions() {
        let mut mapping = PositionMapping::new();
        mapping.push(StepRange::insertion(5, 3));

        assert_eq!(mapping.map(2, Assoc::After), 2);
        assert_eq!(mapping.map(9, Assoc::After), 12);
    }

    #[test]
    fn test_insertion_at_position_respects_assoc() {
        let mut mapping = PositionMapping::new();
        mapping.push(StepRange::insertion(5, 3));

        assert_eq!(mapping.map(5, Assoc::Before), 5);
        assert_eq!(mapping.map(5, Assoc::After), 8);
    }

    #[test]
    fn test_deletion_collapses_range() {
        let mut mapping = PositionMapping::new();
        mapping.push(StepRange::deletion(4, 10));

        assert_eq!(mapping.map(4, Assoc::After), 4);
        assert_eq!(mapping.map(10, Assoc::After), 4);
        assert_eq!(mapping.map(20, Assoc::After), 14);

        let inside = mapping.map_result(7, Assoc::After);
        assert_eq!(inside.pos, 4);
        assert!(inside.deleted);

        let edge = mapping.map_result(10, Assoc::Before);
        assert!(!edge.deleted);
    }

    #[test]
    fn test_steps_compose_in_order() {
        let mut mapping = PositionMapping::new();
        mapping.push(StepRange::insertion(0, 2));
        mapping.push(StepRange::deletion(6, 8));

        // 5 -> 7 after the insertion, then 7 falls inside 6..8
        let result = mapping.map_result(5, Assoc::After);
        assert_eq!(result.pos, 6);
        assert!(result.deleted);
        assert_eq!(mapping.map(10, Assoc::After), 10);
    }

    #[test]
    fn test_empty_steps_are_ignored() {
        let mut mapping = PositionMapping::new();
        mapping.push(StepRange::insertion(3, 0));
        assert!(mapping.is_identity());
    }
}
