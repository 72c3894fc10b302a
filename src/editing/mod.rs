//! Editing model: edit operations and position mapping

mod mapping;
mod operation;

pub use mapping::{Assoc, MapResult, PositionMapping, StepRange};
pub use operation::{AbsoluteOffset, EditOp, EditResult};
