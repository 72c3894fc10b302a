//! Block-level element metadata

/// Stable identifier for a top-level block that survives edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ParagraphId(pub u64);

/// Unique identifier for a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListId(pub u64);

/// Type of list marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListMarker {
    Bullet,
    Numbered { ordinal: u32 },
}

/// The kind of block element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockKind {
    /// Regular paragraph
    #[default]
    Paragraph,
    /// Heading with level (1-6)
    Heading { level: u8 },
    /// List item
    ListItem {
        list_id: ListId,
        indent_level: u8,
        marker: ListMarker,
    },
    /// Atomic embedded content (image, table, rule) of a fixed rendered height
    Embed { height: u32 },
}

impl BlockKind {
    /// Get the line height multiplier for this block kind
    pub fn line_height_multiplier(&self) -> f32 {
        match self {
            BlockKind::Paragraph => 1.0,
            BlockKind::Heading { level } => match level {
                1 => 1.5,
                2 => 1.4,
                3 => 1.3,
                _ => 1.2,
            },
            BlockKind::ListItem { .. } => 1.0,
            BlockKind::Embed { .. } => 1.0,
        }
    }

    /// Get the spacing after this block (in em)
    pub fn spacing_after(&self) -> f32 {
        match self {
            BlockKind::Paragraph => 1.0,
            BlockKind::Heading { .. } => 0.5,
            BlockKind::ListItem { .. } => 0.25,
            BlockKind::Embed { .. } => 1.0,
        }
    }

    /// Leaf block holding inline text. Only these can be split.
    pub fn is_textblock(&self) -> bool {
        !matches!(self, BlockKind::Embed { .. })
    }
}

/// Metadata for a top-level block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockMeta {
    pub id: ParagraphId,
    /// The kind of block
    pub kind: BlockKind,
    /// Byte offset where this block's content starts in the document
    pub start_offset: usize,
    /// Content size of this block in bytes
    pub byte_len: usize,
}

impl BlockMeta {
    /// Get the end offset of this block
    pub fn end_offset(&self) -> usize {
        self.start_offset + self.byte_len
    }

    /// Check if an absolute offset falls within this block (ends inclusive)
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start_offset && offset <= self.end_offset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_kind() {
        assert!(BlockKind::Paragraph.is_textblock());
        assert!(BlockKind::Heading { level: 1 }.is_textblock());

        let list = BlockKind::ListItem {
            list_id: ListId(0),
            indent_level: 0,
            marker: ListMarker::Numbered { ordinal: 3 },
        };
        assert!(list.is_textblock());
        assert_eq!(list.spacing_after(), 0.25);

        assert!(!BlockKind::Embed { height: 200 }.is_textblock());
        assert_eq!(BlockKind::Heading { level: 1 }.line_height_multiplier(), 1.5);
    }

    #[test]
    fn test_block_meta_bounds() {
        let meta = BlockMeta {
            id: ParagraphId(3),
            kind: BlockKind::Paragraph,
            start_offset: 10,
            byte_len: 5,
        };
        assert_eq!(meta.end_offset(), 15);
        assert!(meta.contains(10));
        assert!(meta.contains(15));
        assert!(!meta.contains(16));
    }
}
