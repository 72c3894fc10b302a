//! Recompute scheduling
//!
//! Measurement never runs inline with an edit. The scheduler decides whether
//! an edit warrants a pass, and the pass is deferred to the next rendering
//! frame so it reads post-layout geometry. Every new request supersedes the
//! older ones, so a burst of edits costs one pass.

use crate::error::{PaginationError, Result};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Identifies one scheduling request. Only the newest ticket is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameTicket(u64);

impl FrameTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Tracks the last observed document content and the current request
#[derive(Debug, Default)]
pub struct RecomputeScheduler {
    observed: Option<u64>,
    generation: u64,
}

impl RecomputeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe the document after a transaction.
    ///
    /// Returns a ticket when the content differs from the last observation.
    /// The first observation always schedules.
    pub fn observe(&mut self, fingerprint: u64) -> Option<FrameTicket> {
        if self.observed == Some(fingerprint) {
            return None;
        }
        self.observed = Some(fingerprint);
        Some(self.request())
    }

    /// Request a pass regardless of content, superseding earlier tickets
    pub fn request(&mut self) -> FrameTicket {
        self.generation += 1;
        log::trace!("pagination pass requested, generation {}", self.generation);
        FrameTicket(self.generation)
    }

    /// Whether `ticket` is still the latest request
    pub fn is_current(&self, ticket: FrameTicket) -> bool {
        ticket.0 == self.generation
    }

    pub fn observed(&self) -> Option<u64> {
        self.observed
    }
}

/// One-shot callback run on the next frame
pub type FrameCallback = Box<dyn FnOnce()>;

type FrameQueue = RefCell<Vec<FrameCallback>>;

/// Per-frame callback queue, standing in for the host's animation frame.
///
/// Callbacks requested while a frame runs are deferred to the following
/// frame.
#[derive(Clone, Default)]
pub struct FrameLoop {
    queue: Rc<FrameQueue>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a callback for the next frame
    pub fn request_frame(&self, callback: FrameCallback) {
        self.queue.borrow_mut().push(callback);
    }

    /// Number of callbacks waiting for the next frame
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// A handle that does not keep the loop alive
    pub fn handle(&self) -> FrameHandle {
        FrameHandle {
            queue: Rc::downgrade(&self.queue),
        }
    }

    /// Run one frame. Returns the number of callbacks executed.
    pub fn tick(&self) -> usize {
        let callbacks = std::mem::take(&mut *self.queue.borrow_mut());
        let count = callbacks.len();
        for callback in callbacks {
            callback();
        }
        count
    }

    /// Tick until no callback is pending. Returns the number of frames run.
    pub fn run_until_idle(&self, max_frames: usize) -> Result<usize> {
        let mut frames = 0;
        while self.pending() > 0 {
            if frames == max_frames {
                log::warn!("frame queue still busy after {} frames", max_frames);
                return Err(PaginationError::NotConverged { passes: frames });
            }
            self.tick();
            frames += 1;
        }
        Ok(frames)
    }
}

impl fmt::Debug for FrameLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameLoop")
            .field("pending", &self.pending())
            .finish()
    }
}

/// Weak reference to a [`FrameLoop`]
#[derive(Clone, Default)]
pub struct FrameHandle {
    queue: Weak<FrameQueue>,
}

impl FrameHandle {
    /// Queue a callback. Returns false when the loop is gone.
    pub fn request_frame(&self, callback: FrameCallback) -> bool {
        match self.queue.upgrade() {
            Some(queue) => {
                queue.borrow_mut().push(callback);
                true
            }
            None => false,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.queue.strong_count() > 0
    }
}

impl fmt::Debug for FrameHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameHandle")
            .field("attached", &self.is_attached())
            .finish()
    }
}
