//! Document model: an ordered sequence of top-level blocks
//!
//! Offsets are flat byte offsets. Each block's content occupies `byte_len`
//! positions and consecutive blocks are separated by one position, so the
//! document text is the block texts joined with `'\n'`.

mod block;

pub use block::{BlockKind, BlockMeta, ListId, ListMarker, ParagraphId};

use crate::editing::{AbsoluteOffset, EditOp, EditResult, StepRange};
use crate::error::DocumentError;
use rustc_hash::FxHasher;
use smallvec::SmallVec;
use std::hash::{Hash, Hasher};
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone)]
struct BlockNode {
    id: ParagraphId,
    kind: BlockKind,
    text: String,
}

/// The main document structure
#[derive(Debug, Clone)]
pub struct Document {
    blocks: Vec<BlockNode>,
    /// Monotonic version counter
    version: u64,
    /// Next block ID to assign
    next_para_id: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a new document holding one empty paragraph
    pub fn new() -> Self {
        Self::from_blocks(std::iter::empty::<(BlockKind, String)>())
    }

    /// Create a document from initial text, one paragraph per line
    pub fn from_text(text: &str) -> Self {
        Self::from_blocks(
            text.split('\n')
                .map(|line| (BlockKind::Paragraph, line.to_string())),
        )
    }

    /// Create a document from explicit blocks.
    ///
    /// Newlines inside block text are not allowed and are replaced by spaces.
    /// Embed blocks never hold text.
    pub fn from_blocks<I, S>(blocks: I) -> Self
    where
        I: IntoIterator<Item = (BlockKind, S)>,
        S: Into<String>,
    {
        let mut doc = Self {
            blocks: Vec::new(),
            version: 0,
            next_para_id: 0,
        };

        for (kind, text) in blocks {
            let text = if kind.is_textblock() {
                text.into().replace('\n', " ")
            } else {
                String::new()
            };
            let id = doc.allocate_id();
            doc.blocks.push(BlockNode { id, kind, text });
        }

        // Ensure at least one block exists
        if doc.blocks.is_empty() {
            let id = doc.allocate_id();
            doc.blocks.push(BlockNode {
                id,
                kind: BlockKind::Paragraph,
                text: String::new(),
            });
        }

        doc
    }

    fn allocate_id(&mut self) -> ParagraphId {
        let id = ParagraphId(self.next_para_id);
        self.next_para_id += 1;
        id
    }

    /// Get the document version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Document size: the largest valid offset
    pub fn len(&self) -> usize {
        let content: usize = self.blocks.iter().map(|b| b.text.len()).sum();
        content + self.blocks.len().saturating_sub(1)
    }

    /// Check if document is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the full document text
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Get block count
    pub fn paragraph_count(&self) -> usize {
        self.blocks.len()
    }

    /// Iterate top-level blocks in document order
    pub fn blocks(&self) -> impl Iterator<Item = BlockMeta> + '_ {
        self.blocks_with_text().map(|(meta, _)| meta)
    }

    /// Iterate top-level blocks in document order together with their text
    pub fn blocks_with_text(&self) -> impl Iterator<Item = (BlockMeta, &str)> + '_ {
        let mut start = 0;
        self.blocks.iter().map(move |node| {
            let meta = BlockMeta {
                id: node.id,
                kind: node.kind,
                start_offset: start,
                byte_len: node.text.len(),
            };
            start += node.text.len() + 1;
            (meta, node.text.as_str())
        })
    }

    fn locate(&self, offset: usize) -> Option<(usize, BlockMeta)> {
        self.blocks().enumerate().find(|(_, meta)| meta.contains(offset))
    }

    /// Hash of the logical content, used to tell content edits apart from
    /// edits that only carry metadata
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        for node in &self.blocks {
            node.kind.hash(&mut hasher);
            node.text.hash(&mut hasher);
        }
        hasher.finish()
    }

    /// Snap an offset inside a text block to a grapheme boundary that leaves
    /// content on both sides of it. Returns the absolute snapped offset.
    pub fn interior_split_point(&self, offset: usize) -> Result<usize, DocumentError> {
        let (index, meta) = self.locate(offset).ok_or(DocumentError::OffsetOutOfRange {
            offset,
            len: self.len(),
        })?;
        if !meta.kind.is_textblock() {
            return Err(DocumentError::NotTextblock { offset });
        }

        let text = &self.blocks[index].text;
        let local = offset - meta.start_offset;
        let boundaries: SmallVec<[usize; 8]> = text
            .grapheme_indices(true)
            .map(|(idx, _)| idx)
            .filter(|&idx| idx > 0)
            .collect();

        let floor = boundaries.iter().copied().filter(|&b| b <= local).last();
        let ceil = boundaries.iter().copied().find(|&b| b >= local);

        floor
            .or(ceil)
            .map(|b| meta.start_offset + b)
            .ok_or(DocumentError::NoInteriorSplit { offset })
    }

    /// Apply an edit operation
    pub fn apply_edit(&mut self, op: EditOp) -> Result<EditResult, DocumentError> {
        match op {
            EditOp::Insert { position, text } => self.apply_insert(position, &text),
            EditOp::Delete { start, end } => self.apply_delete(start, end),
            EditOp::SplitBlock { position } => self.apply_split(position),
            EditOp::Transaction { ops } => {
                // Applied to a scratch copy so a failing step leaves the document untouched
                let mut scratch = self.clone();
                let mut result = EditResult {
                    version: scratch.version,
                    ..EditResult::default()
                };

                for op in ops {
                    let sub_result = scratch.apply_edit(op)?;
                    result.merge(sub_result);
                }

                *self = scratch;
                Ok(result)
            }
        }
    }

    fn text_position(&self, offset: usize) -> Result<(usize, BlockMeta), DocumentError> {
        let (index, meta) = self.locate(offset).ok_or(DocumentError::OffsetOutOfRange {
            offset,
            len: self.len(),
        })?;
        if !self.blocks[index]
            .text
            .is_char_boundary(offset - meta.start_offset)
        {
            return Err(DocumentError::NotCharBoundary { offset });
        }
        Ok((index, meta))
    }

    /// Apply an insert operation
    fn apply_insert(
        &mut self,
        position: AbsoluteOffset,
        text: &str,
    ) -> Result<EditResult, DocumentError> {
        let (index, meta) = self.text_position(position.0)?;
        if !meta.kind.is_textblock() {
            return Err(DocumentError::NotTextblock { offset: position.0 });
        }

        self.version += 1;
        let mut result = EditResult {
            version: self.version,
            ..EditResult::default()
        };
        result.affected_paragraphs.push(meta.id);
        result
            .mapping
            .push(StepRange::insertion(position.0, text.len()));

        let local = position.0 - meta.start_offset;
        let mut segments = text.split('\n');
        let first = segments.next().unwrap_or("");
        let rest: Vec<&str> = segments.collect();

        if rest.is_empty() {
            self.blocks[index].text.insert_str(local, first);
            return Ok(result);
        }

        // Newlines start new blocks of the same kind
        let tail = self.blocks[index].text.split_off(local);
        self.blocks[index].text.push_str(first);

        let last = rest.len() - 1;
        for (i, segment) in rest.into_iter().enumerate() {
            let mut text = segment.to_string();
            if i == last {
                text.push_str(&tail);
            }
            let id = self.allocate_id();
            self.blocks.insert(
                index + 1 + i,
                BlockNode {
                    id,
                    kind: meta.kind,
                    text,
                },
            );
            result.created_paragraphs.push(id);
        }

        Ok(result)
    }

    /// Apply a delete operation
    fn apply_delete(
        &mut self,
        start: AbsoluteOffset,
        end: AbsoluteOffset,
    ) -> Result<EditResult, DocumentError> {
        if start.0 > end.0 {
            return Err(DocumentError::InvalidRange {
                start: start.0,
                end: end.0,
            });
        }

        let (start_index, start_meta) = self.text_position(start.0)?;
        let (end_index, end_meta) = self.text_position(end.0)?;

        self.version += 1;
        let mut result = EditResult {
            version: self.version,
            ..EditResult::default()
        };

        if start.0 == end.0 {
            return Ok(result);
        }

        result.affected_paragraphs.push(start_meta.id);
        result.mapping.push(StepRange::deletion(start.0, end.0));

        let local_start = start.0 - start_meta.start_offset;
        let local_end = end.0 - end_meta.start_offset;

        if start_index == end_index {
            self.blocks[start_index]
                .text
                .replace_range(local_start..local_end, "");
            return Ok(result);
        }

        // Merge the tail of the last block into the first, drop the ones between
        let tail = self.blocks[end_index].text[local_end..].to_string();
        let end_kind = self.blocks[end_index].kind;
        for node in self.blocks.drain(start_index + 1..=end_index) {
            result.deleted_paragraphs.push(node.id);
        }

        let first = &mut self.blocks[start_index];
        first.text.truncate(local_start);
        if !first.kind.is_textblock() {
            first.kind = end_kind;
        }
        first.text.push_str(&tail);

        Ok(result)
    }

    /// Split the block at a position; the new block takes the tail
    fn apply_split(&mut self, position: AbsoluteOffset) -> Result<EditResult, DocumentError> {
        let (index, meta) = self.text_position(position.0)?;
        if !meta.kind.is_textblock() {
            return Err(DocumentError::NotTextblock { offset: position.0 });
        }

        self.version += 1;
        let local = position.0 - meta.start_offset;
        let tail = self.blocks[index].text.split_off(local);
        let id = self.allocate_id();
        self.blocks.insert(
            index + 1,
            BlockNode {
                id,
                kind: meta.kind,
                text: tail,
            },
        );

        let mut result = EditResult {
            version: self.version,
            ..EditResult::default()
        };
        result.affected_paragraphs.push(meta.id);
        result.created_paragraphs.push(id);
        result.mapping.push(StepRange::insertion(position.0, 1));

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Assoc;

    #[test]
    fn test_new_document() {
        let doc = Document::new();
        assert_eq!(doc.len(), 0);
        assert!(doc.is_empty());
        assert_eq!(doc.paragraph_count(), 1);
    }

    #[test]
    fn test_from_text() {
        let doc = Document::from_text("Hello\nWorld");
        assert_eq!(doc.text(), "Hello\nWorld");
        assert_eq!(doc.paragraph_count(), 2);
        assert_eq!(doc.len(), 11);

        let starts: Vec<_> = doc.blocks().map(|b| b.start_offset).collect();
        assert_eq!(starts, vec![0, 6]);
    }

    #[test]
    fn test_insert() {
        let mut doc = Document::new();
        let result = doc.apply_edit(EditOp::insert(0, "Hello")).unwrap();
        assert_eq!(doc.text(), "Hello");
        assert_eq!(result.affected_paragraphs.len(), 1);
        assert_eq!(result.mapping.map(0, Assoc::After), 5);
    }

    #[test]
    fn test_insert_newline_creates_blocks() {
        let mut doc = Document::from_blocks([(BlockKind::Heading { level: 2 }, "Title")]);
        let result = doc.apply_edit(EditOp::insert(2, "a\nb\nc")).unwrap();

        assert_eq!(doc.text(), "Tia\nb\nctle");
        assert_eq!(result.created_paragraphs.len(), 2);
        assert!(doc.blocks().all(|b| b.kind == BlockKind::Heading { level: 2 }));
    }

    #[test]
    fn test_delete() {
        let mut doc = Document::from_text("Hello World");
        doc.apply_edit(EditOp::delete(5, 11)).unwrap();
        assert_eq!(doc.text(), "Hello");
    }

    #[test]
    fn test_delete_across_blocks_merges() {
        let mut doc = Document::from_text("one\ntwo\nthree");
        let result = doc.apply_edit(EditOp::delete(2, 10)).unwrap();
        assert_eq!(doc.text(), "onree");
        assert_eq!(doc.paragraph_count(), 1);
        assert_eq!(result.deleted_paragraphs.len(), 2);
    }

    #[test]
    fn test_split_block_keeps_kind() {
        let mut doc = Document::from_blocks([
            (BlockKind::Paragraph, "abc"),
            (BlockKind::Heading { level: 1 }, "heading"),
        ]);
        let result = doc.apply_edit(EditOp::split_block(7)).unwrap();

        assert_eq!(doc.text(), "abc\nhea\nding");
        let kinds: Vec<_> = doc.blocks().map(|b| b.kind).collect();
        assert_eq!(kinds[2], BlockKind::Heading { level: 1 });
        assert_eq!(result.mapping.map(12, Assoc::After), 13);
    }

    #[test]
    fn test_rejects_bad_offsets() {
        let mut doc = Document::from_text("héllo");
        assert_eq!(
            doc.apply_edit(EditOp::insert(2, "x")).unwrap_err(),
            DocumentError::NotCharBoundary { offset: 2 }
        );
        assert_eq!(
            doc.apply_edit(EditOp::insert(40, "x")).unwrap_err(),
            DocumentError::OffsetOutOfRange { offset: 40, len: 6 }
        );
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn test_failed_transaction_is_atomic() {
        let mut doc = Document::from_text("abc");
        let op = EditOp::transaction(vec![EditOp::insert(0, "x"), EditOp::insert(99, "y")]);
        assert!(doc.apply_edit(op).is_err());
        assert_eq!(doc.text(), "abc");
    }

    #[test]
    fn test_embed_rejects_text() {
        let mut doc = Document::from_blocks([
            (BlockKind::Paragraph, "a"),
            (BlockKind::Embed { height: 300 }, ""),
        ]);
        assert_eq!(
            doc.apply_edit(EditOp::insert(2, "x")).unwrap_err(),
            DocumentError::NotTextblock { offset: 2 }
        );
    }

    #[test]
    fn test_interior_split_point_snaps_to_graphemes() {
        // "e\u{301}" is one grapheme of three bytes
        let doc = Document::from_text("ae\u{301}b");
        assert_eq!(doc.interior_split_point(2), Ok(1));
        assert_eq!(doc.interior_split_point(4), Ok(4));

        let single = Document::from_text("e\u{301}");
        assert_eq!(
            single.interior_split_point(1),
            Err(DocumentError::NoInteriorSplit { offset: 1 })
        );
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let mut doc = Document::from_text("abc");
        let before = doc.fingerprint();
        assert_eq!(before, Document::from_text("abc").fingerprint());

        doc.apply_edit(EditOp::insert(1, "z")).unwrap();
        assert_ne!(doc.fingerprint(), before);
    }
}
