//! Pagination engine
//!
//! Measures rendered blocks against a fixed page profile and decorates the
//! document with spacers and footers so the flowing content reads as
//! discrete pages.

mod measure;
mod overlay;
mod profile;
mod scheduler;
mod split;
mod state;

pub use measure::{measure_pass, paginate, BlockGeometry, Paginated, PassOutcome};
pub use overlay::{Overlay, OverlayBuilder, OverlayKind, OverlaySet};
pub use profile::{LayoutMode, PageProfile};
pub use scheduler::{FrameCallback, FrameHandle, FrameLoop, FrameTicket, RecomputeScheduler};
pub use split::find_split_offset;
pub use state::{CommittedTransaction, PaginationMeta, PaginationState, PaginationStore};
