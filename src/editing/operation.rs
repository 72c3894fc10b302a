//! Edit operations and results

use crate::document::ParagraphId;
use crate::editing::PositionMapping;
use smallvec::SmallVec;

/// Absolute byte offset in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AbsoluteOffset(pub usize);

/// An atomic edit operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    /// Insert text at a position. Newlines start new blocks.
    Insert {
        position: AbsoluteOffset,
        text: String,
    },
    /// Delete text in a range, merging blocks the range spans
    Delete {
        start: AbsoluteOffset,
        end: AbsoluteOffset,
    },
    /// Split the block containing `position` in two; the tail keeps the block kind
    SplitBlock { position: AbsoluteOffset },
    /// A composite transaction of multiple operations
    Transaction { ops: Vec<EditOp> },
}

impl EditOp {
    /// Create an insert operation
    pub fn insert(position: usize, text: impl Into<String>) -> Self {
        Self::Insert {
            position: AbsoluteOffset(position),
            text: text.into(),
        }
    }

    /// Create a delete operation
    pub fn delete(start: usize, end: usize) -> Self {
        Self::Delete {
            start: AbsoluteOffset(start),
            end: AbsoluteOffset(end),
        }
    }

    /// Create a block split operation
    pub fn split_block(position: usize) -> Self {
        Self::SplitBlock {
            position: AbsoluteOffset(position),
        }
    }

    /// Create a transaction
    pub fn transaction(ops: Vec<EditOp>) -> Self {
        Self::Transaction { ops }
    }
}

/// Result of applying an edit operation
#[derive(Debug, Clone, Default)]
pub struct EditResult {
    /// New document version after this edit
    pub version: u64,
    /// Blocks that were modified
    pub affected_paragraphs: SmallVec<[ParagraphId; 4]>,
    /// Blocks that were created
    pub created_paragraphs: SmallVec<[ParagraphId; 2]>,
    /// Blocks that were deleted (merged away)
    pub deleted_paragraphs: SmallVec<[ParagraphId; 2]>,
    /// Maps positions from before the edit to positions after it
    pub mapping: PositionMapping,
}

impl EditResult {
    /// Fold the result of an edit applied after this one
    pub fn merge(&mut self, later: EditResult) {
        self.version = later.version;
        self.affected_paragraphs.extend(later.affected_paragraphs);
        self.created_paragraphs.extend(later.created_paragraphs);
        self.deleted_paragraphs.extend(later.deleted_paragraphs);
        self.mapping.append(&later.mapping);
    }
}
