//! Overlay markers: spacers and page footers
//!
//! Overlays are inert, non-editable markers anchored to a document offset.
//! They never occupy offsets themselves.

use crate::editing::{Assoc, PositionMapping};
use serde::Serialize;

/// What an overlay draws
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OverlayKind {
    /// Reserves vertical space to push following content to the next page
    Spacer { height: f32 },
    /// Page number marker, pushed down by `margin_top` to the page's bottom edge
    #[serde(rename_all = "camelCase")]
    Footer { page_number: usize, margin_top: f32 },
}

/// A marker anchored before the content at `anchor`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Overlay {
    pub anchor: usize,
    #[serde(flatten)]
    pub kind: OverlayKind,
}

impl Overlay {
    /// Build a spacer; negative heights collapse to zero
    pub fn spacer(anchor: usize, height: f32) -> Self {
        Self {
            anchor,
            kind: OverlayKind::Spacer {
                height: height.max(0.0),
            },
        }
    }

    /// Build a page footer; negative offsets collapse to zero
    pub fn footer(anchor: usize, page_number: usize, margin_top: f32) -> Self {
        Self {
            anchor,
            kind: OverlayKind::Footer {
                page_number,
                margin_top: margin_top.max(0.0),
            },
        }
    }

    pub fn is_spacer(&self) -> bool {
        matches!(self.kind, OverlayKind::Spacer { .. })
    }

    pub fn is_footer(&self) -> bool {
        matches!(self.kind, OverlayKind::Footer { .. })
    }
}

/// Ordered overlay collection. Replaced wholesale, then only ever remapped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OverlaySet {
    overlays: Vec<Overlay>,
}

impl OverlaySet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a set for a document of size `doc_size`.
    ///
    /// Overlays are ordered by anchor, keeping construction order for equal
    /// anchors. Anchors past the end of the document are dropped.
    pub fn create(doc_size: usize, overlays: Vec<Overlay>) -> Self {
        let before = overlays.len();
        let mut overlays: Vec<Overlay> = overlays
            .into_iter()
            .filter(|o| o.anchor <= doc_size)
            .collect();

        if overlays.len() != before {
            log::warn!(
                "dropped {} overlays anchored past document end {}",
                before - overlays.len(),
                doc_size
            );
        }

        overlays.sort_by_key(|o| o.anchor);
        Self { overlays }
    }

    /// Carry every anchor through an edit.
    ///
    /// Anchors stick to the content after them. An overlay whose surrounding
    /// content was deleted is dropped.
    pub fn map(&self, mapping: &PositionMapping, doc_size: usize) -> Self {
        if mapping.is_identity() {
            return self.clone();
        }

        let overlays = self
            .overlays
            .iter()
            .filter_map(|overlay| {
                let result = mapping.map_result(overlay.anchor, Assoc::After);
                if result.deleted {
                    return None;
                }
                Some(Overlay {
                    anchor: result.pos.min(doc_size),
                    kind: overlay.kind,
                })
            })
            .collect();

        Self { overlays }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Overlay> {
        self.overlays.iter()
    }

    pub fn as_slice(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn spacers(&self) -> impl Iterator<Item = &Overlay> {
        self.overlays.iter().filter(|o| o.is_spacer())
    }

    /// The footer closing the last page, if the set has one
    pub fn footer(&self) -> Option<&Overlay> {
        self.overlays.iter().rev().find(|o| o.is_footer())
    }
}

/// Collects markers during a measurement pass
#[derive(Debug, Default)]
pub struct OverlayBuilder {
    overlays: Vec<Overlay>,
}

impl OverlayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a spacer immediately before the block starting at `anchor`
    pub fn spacer(&mut self, anchor: usize, height: f32) {
        self.overlays.push(Overlay::spacer(anchor, height));
    }

    /// Close the document with a footer carrying the final page number
    pub fn footer(&mut self, doc_size: usize, page_number: usize, margin_top: f32) {
        self.overlays
            .push(Overlay::footer(doc_size, page_number, margin_top));
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn finish(self, doc_size: usize) -> OverlaySet {
        OverlaySet::create(doc_size, self.overlays)
    }
}
