//! Pagination state store
//!
//! The store is the only owner of the pagination state. It changes through
//! exactly two paths: a wholesale replace when a transaction carries
//! [`PaginationMeta`], and an anchor remap for every other transaction.

use crate::editing::PositionMapping;
use crate::pagination::{LayoutMode, OverlaySet};

/// `{ overlays, page_count, layout_mode }`
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationState {
    pub overlays: OverlaySet,
    /// Always at least 1
    pub page_count: usize,
    pub layout_mode: LayoutMode,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::init()
    }
}

/// Pagination instructions attached to a transaction.
/// Each present field replaces the corresponding state field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaginationMeta {
    pub overlays: Option<OverlaySet>,
    pub page_count: Option<usize>,
    pub layout_mode: Option<LayoutMode>,
}

impl PaginationMeta {
    /// The result of a completed measurement pass
    pub fn measured(overlays: OverlaySet, page_count: usize) -> Self {
        Self {
            overlays: Some(overlays),
            page_count: Some(page_count),
            layout_mode: None,
        }
    }

    pub fn layout_mode(mode: LayoutMode) -> Self {
        Self {
            layout_mode: Some(mode),
            ..Self::default()
        }
    }
}

/// What the store needs to know about a committed transaction
#[derive(Debug, Clone, Copy)]
pub struct CommittedTransaction<'a> {
    pub mapping: &'a PositionMapping,
    pub meta: Option<&'a PaginationMeta>,
    /// Size of the document after the transaction
    pub doc_size: usize,
}

impl PaginationState {
    pub fn init() -> Self {
        Self {
            overlays: OverlaySet::empty(),
            page_count: 1,
            layout_mode: LayoutMode::Paged,
        }
    }

    /// Compute the state that follows `self` after a transaction
    pub fn apply(&self, tr: &CommittedTransaction<'_>) -> Self {
        match tr.meta {
            Some(meta) => {
                let mut next = self.clone();
                if let Some(overlays) = &meta.overlays {
                    next.overlays = OverlaySet::create(tr.doc_size, overlays.as_slice().to_vec());
                }
                if let Some(page_count) = meta.page_count {
                    next.page_count = page_count.max(1);
                }
                if let Some(layout_mode) = meta.layout_mode {
                    next.layout_mode = layout_mode;
                }
                next
            }
            None => Self {
                overlays: self.overlays.map(tr.mapping, tr.doc_size),
                page_count: self.page_count,
                layout_mode: self.layout_mode,
            },
        }
    }
}

/// Holds the current pagination state for one editing session
#[derive(Debug, Default)]
pub struct PaginationStore {
    state: PaginationState,
}

impl PaginationStore {
    pub fn init() -> Self {
        Self {
            state: PaginationState::init(),
        }
    }

    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    /// Apply a committed transaction and return the new state
    pub fn apply(&mut self, tr: &CommittedTransaction<'_>) -> &PaginationState {
        self.state = self.state.apply(tr);
        &self.state
    }

    /// Apply a committed transaction. Returns whether the state changed.
    pub fn update(&mut self, tr: &CommittedTransaction<'_>) -> bool {
        let next = self.state.apply(tr);
        let changed = next != self.state;
        self.state = next;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::StepRange;
    use crate::pagination::Overlay;

    fn paginated_store() -> PaginationStore {
        let mut store = PaginationStore::init();
        let overlays = OverlaySet::create(
            40,
            vec![Overlay::spacer(20, 264.0), Overlay::footer(40, 2, 300.0)],
        );
        let meta = PaginationMeta::measured(overlays, 2);
        store.apply(&CommittedTransaction {
            mapping: &PositionMapping::new(),
            meta: Some(&meta),
            doc_size: 40,
        });
        store
    }

    #[test]
    fn test_init() {
        let store = PaginationStore::init();
        assert!(store.state().overlays.is_empty());
        assert_eq!(store.state().page_count, 1);
        assert_eq!(store.state().layout_mode, LayoutMode::Paged);
    }

    #[test]
    fn test_meta_replaces_fields() {
        let store = paginated_store();
        assert_eq!(store.state().page_count, 2);
        assert_eq!(store.state().overlays.len(), 2);
    }

    #[test]
    fn test_partial_meta_keeps_other_fields() {
        let mut store = paginated_store();
        let meta = PaginationMeta::layout_mode(LayoutMode::Grid);
        let state = store.apply(&CommittedTransaction {
            mapping: &PositionMapping::new(),
            meta: Some(&meta),
            doc_size: 40,
        });

        assert_eq!(state.layout_mode, LayoutMode::Grid);
        assert_eq!(state.page_count, 2);
        assert_eq!(state.overlays.len(), 2);
    }

    #[test]
    fn test_page_count_never_zero() {
        let mut store = PaginationStore::init();
        let meta = PaginationMeta {
            page_count: Some(0),
            ..PaginationMeta::default()
        };
        store.apply(&CommittedTransaction {
            mapping: &PositionMapping::new(),
            meta: Some(&meta),
            doc_size: 0,
        });
        assert_eq!(store.state().page_count, 1);
    }

    #[test]
    fn test_content_edit_remaps_and_keeps_counts() {
        let mut store = paginated_store();
        let mut mapping = PositionMapping::new();
        mapping.push(StepRange::insertion(5, 7));

        let state = store.apply(&CommittedTransaction {
            mapping: &mapping,
            meta: None,
            doc_size: 47,
        });

        let anchors: Vec<_> = state.overlays.iter().map(|o| o.anchor).collect();
        assert_eq!(anchors, vec![27, 47]);
        assert_eq!(state.page_count, 2);
        assert_eq!(state.layout_mode, LayoutMode::Paged);
    }

    #[test]
    fn test_update_reports_changes() {
        let mut store = paginated_store();

        let identity = PositionMapping::new();
        assert!(!store.update(&CommittedTransaction {
            mapping: &identity,
            meta: None,
            doc_size: 40,
        }));

        let mut shift = PositionMapping::new();
        shift.push(StepRange::insertion(5, 3));
        assert!(store.update(&CommittedTransaction {
            mapping: &shift,
            meta: None,
            doc_size: 43,
        }));
        assert_eq!(store.state().overlays.as_slice()[0].anchor, 23);

        let same = PaginationMeta::measured(store.state().overlays.clone(), 2);
        assert!(!store.update(&CommittedTransaction {
            mapping: &identity,
            meta: Some(&same),
            doc_size: 43,
        }));
    }
}
