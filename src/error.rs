//! Error types

use thiserror::Error;

/// Errors raised by the document when an edit cannot be applied
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("offset {offset} is outside the document (size {len})")]
    OffsetOutOfRange { offset: usize, len: usize },

    #[error("offset {offset} does not fall on a character boundary")]
    NotCharBoundary { offset: usize },

    #[error("invalid range {start}..{end}")]
    InvalidRange { start: usize, end: usize },

    #[error("offset {offset} is not inside a text block")]
    NotTextblock { offset: usize },

    #[error("no interior split point near offset {offset}")]
    NoInteriorSplit { offset: usize },
}

/// Errors surfaced by the pagination session
#[derive(Error, Debug)]
pub enum PaginationError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("invalid host input: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid page profile: {0}")]
    Profile(String),

    #[error("pagination did not settle after {passes} passes")]
    NotConverged { passes: usize },

    #[error("the editing session has been closed")]
    SessionClosed,
}

pub type Result<T> = std::result::Result<T, PaginationError>;
