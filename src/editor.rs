//! Paginated editing session
//!
//! Owns the document, the renderer and the pagination store, and wires the
//! frame-deferred measurement cycle: every committed transaction updates the
//! store, and content changes schedule a measurement pass for the next
//! frame. A pass either commits new overlays as pagination metadata or
//! splits one oversized block, which is itself a content change and
//! schedules the next pass.

use crate::document::Document;
use crate::editing::{EditOp, EditResult};
use crate::error::{PaginationError, Result};
use crate::layout::Renderer;
use crate::pagination::{
    measure_pass, CommittedTransaction, FrameHandle, FrameLoop, FrameTicket, LayoutMode,
    OverlaySet, PageProfile, PaginationMeta, PaginationState, PaginationStore, PassOutcome,
    RecomputeScheduler,
};
use crate::render::DisplayList;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Callback invoked whenever the pagination state changes
pub type StateSubscriber = Box<dyn FnMut(&PaginationState)>;

/// What the most recent measurement frame did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Overlays and page count were committed
    Paginated { page_count: usize },
    /// A block was split at `at`; another pass follows
    Split { at: usize },
    /// The document refused the requested split
    SplitRejected { at: usize },
}

/// A committed transaction as seen by the session
struct Dispatched {
    result: EditResult,
    ticket: Option<FrameTicket>,
    state_changed: bool,
}

struct Session<R> {
    document: Document,
    renderer: R,
    profile: PageProfile,
    store: PaginationStore,
    scheduler: RecomputeScheduler,
    alive: bool,
    subscribers: Vec<StateSubscriber>,
    last_outcome: Option<FrameOutcome>,
    passes: usize,
}

impl<R: Renderer> Session<R> {
    /// Commit an optional edit and optional pagination metadata as one
    /// transaction
    fn dispatch(&mut self, op: Option<EditOp>, meta: Option<PaginationMeta>) -> Result<Dispatched> {
        let result = match op {
            Some(op) => self.document.apply_edit(op)?,
            None => EditResult {
                version: self.document.version(),
                ..EditResult::default()
            },
        };

        let tr = CommittedTransaction {
            mapping: &result.mapping,
            meta: meta.as_ref(),
            doc_size: self.document.len(),
        };
        let previous_mode = self.store.state().layout_mode;
        let state_changed = self.store.update(&tr);

        let mut ticket = self.scheduler.observe(self.document.fingerprint());
        let mode_changed = meta
            .as_ref()
            .and_then(|m| m.layout_mode)
            .is_some_and(|mode| mode != previous_mode);
        if ticket.is_none() && mode_changed {
            ticket = Some(self.scheduler.request());
        }

        Ok(Dispatched {
            result,
            ticket,
            state_changed,
        })
    }

    /// Measure the current geometry and commit the outcome
    fn measure_and_decorate(&mut self) -> Result<(FrameOutcome, Option<Dispatched>)> {
        self.passes += 1;
        let outcome = {
            let geometry = self.renderer.render(&self.document);
            measure_pass(
                &self.document,
                geometry,
                &self.profile,
                self.store.state().layout_mode,
            )
        };

        match outcome {
            PassOutcome::Paginated {
                overlays,
                page_count,
            } => {
                let meta = PaginationMeta::measured(overlays, page_count);
                let dispatched = self.dispatch(None, Some(meta))?;
                Ok((FrameOutcome::Paginated { page_count }, Some(dispatched)))
            }
            PassOutcome::Split { at, block } => match self.document.interior_split_point(at) {
                Ok(at) => {
                    let dispatched = self.dispatch(Some(EditOp::split_block(at)), None)?;
                    Ok((FrameOutcome::Split { at }, Some(dispatched)))
                }
                Err(err) => {
                    log::warn!("split of block {:?} at {} rejected: {}", block, at, err);
                    Ok((FrameOutcome::SplitRejected { at }, None))
                }
            },
        }
    }
}

/// An editing session with live pagination
pub struct PaginatedEditor<R: Renderer + 'static> {
    session: Rc<RefCell<Session<R>>>,
    frames: FrameHandle,
}

impl<R: Renderer + 'static> PaginatedEditor<R> {
    /// Open a session. The first measurement pass is queued on `frames`.
    pub fn new(document: Document, renderer: R, profile: PageProfile, frames: &FrameLoop) -> Self {
        let mut scheduler = RecomputeScheduler::new();
        let initial = scheduler.observe(document.fingerprint());

        let editor = Self {
            session: Rc::new(RefCell::new(Session {
                document,
                renderer,
                profile,
                store: PaginationStore::init(),
                scheduler,
                alive: true,
                subscribers: Vec::new(),
                last_outcome: None,
                passes: 0,
            })),
            frames: frames.handle(),
        };

        if let Some(ticket) = initial {
            schedule_pass(&editor.session, &editor.frames, ticket);
        }
        editor
    }

    fn commit(&mut self, op: Option<EditOp>, meta: Option<PaginationMeta>) -> Result<EditResult> {
        let dispatched = {
            let mut session = self.session.borrow_mut();
            if !session.alive {
                return Err(PaginationError::SessionClosed);
            }
            session.dispatch(op, meta)?
        };

        if let Some(ticket) = dispatched.ticket {
            schedule_pass(&self.session, &self.frames, ticket);
        }
        if dispatched.state_changed {
            notify(&self.session);
        }
        Ok(dispatched.result)
    }

    /// Apply an edit. Overlays follow the edit immediately; the page layout
    /// catches up on the next frame.
    pub fn apply_edit(&mut self, op: EditOp) -> Result<EditResult> {
        self.commit(Some(op), None)
    }

    /// Switch between paged and grid display and remeasure
    pub fn set_layout_mode(&mut self, mode: LayoutMode) -> Result<()> {
        self.commit(None, Some(PaginationMeta::layout_mode(mode)))?;
        Ok(())
    }

    /// Queue a pass without any content change, e.g. after a zoom or font
    /// change in the renderer
    pub fn request_remeasure(&mut self) -> Result<()> {
        let ticket = {
            let mut session = self.session.borrow_mut();
            if !session.alive {
                return Err(PaginationError::SessionClosed);
            }
            session.scheduler.request()
        };
        schedule_pass(&self.session, &self.frames, ticket);
        Ok(())
    }

    /// Register a callback for pagination state changes
    pub fn subscribe(&mut self, subscriber: impl FnMut(&PaginationState) + 'static) {
        self.session
            .borrow_mut()
            .subscribers
            .push(Box::new(subscriber));
    }

    /// Tear the session down. Frames still queued become no-ops.
    pub fn destroy(&mut self) {
        let mut session = self.session.borrow_mut();
        session.alive = false;
        session.subscribers.clear();
        log::debug!("pagination session closed");
    }

    pub fn is_destroyed(&self) -> bool {
        !self.session.borrow().alive
    }

    pub fn state(&self) -> PaginationState {
        self.session.borrow().store.state().clone()
    }

    pub fn page_count(&self) -> usize {
        self.session.borrow().store.state().page_count
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.session.borrow().store.state().layout_mode
    }

    pub fn overlays(&self) -> OverlaySet {
        self.session.borrow().store.state().overlays.clone()
    }

    pub fn profile(&self) -> PageProfile {
        self.session.borrow().profile
    }

    pub fn last_outcome(&self) -> Option<FrameOutcome> {
        self.session.borrow().last_outcome
    }

    /// Measurement passes run so far
    pub fn passes(&self) -> usize {
        self.session.borrow().passes
    }

    /// Overlay elements and page chrome at the given zoom
    pub fn display_list(&self, zoom: f32) -> DisplayList {
        let session = self.session.borrow();
        DisplayList::build(
            session.document.version(),
            session.store.state(),
            &session.profile,
            zoom,
        )
    }

    /// Get document text
    pub fn text(&self) -> String {
        self.session.borrow().document.text()
    }

    pub fn with_document<T>(&self, f: impl FnOnce(&Document) -> T) -> T {
        f(&self.session.borrow().document)
    }

    /// Access the renderer, e.g. to push fresh host geometry
    pub fn with_renderer_mut<T>(&mut self, f: impl FnOnce(&mut R) -> T) -> T {
        f(&mut self.session.borrow_mut().renderer)
    }
}

impl<R: Renderer + 'static> fmt::Debug for PaginatedEditor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.session.borrow();
        f.debug_struct("PaginatedEditor")
            .field("alive", &session.alive)
            .field("version", &session.document.version())
            .field("page_count", &session.store.state().page_count)
            .field("frames", &self.frames)
            .finish()
    }
}

impl<R: Renderer + 'static> Drop for PaginatedEditor<R> {
    fn drop(&mut self) {
        if let Ok(mut session) = self.session.try_borrow_mut() {
            session.alive = false;
        }
    }
}

/// Queue a measurement pass for `ticket` on the next frame
fn schedule_pass<R: Renderer + 'static>(
    session: &Rc<RefCell<Session<R>>>,
    frames: &FrameHandle,
    ticket: FrameTicket,
) {
    let weak = Rc::downgrade(session);
    let handle = frames.clone();
    let queued = frames.request_frame(Box::new(move || run_frame(weak, handle, ticket)));
    if queued {
        log::debug!("pagination pass scheduled, generation {}", ticket.generation());
    } else {
        log::debug!("frame loop gone, pass {} dropped", ticket.generation());
    }
}

fn run_frame<R: Renderer + 'static>(
    weak: Weak<RefCell<Session<R>>>,
    frames: FrameHandle,
    ticket: FrameTicket,
) {
    let Some(session) = weak.upgrade() else {
        log::debug!("session dropped before frame {}", ticket.generation());
        return;
    };

    let dispatched = {
        let Ok(mut inner) = session.try_borrow_mut() else {
            // Session busy inside a callback, retry next frame
            schedule_pass(&session, &frames, ticket);
            return;
        };
        if !inner.alive {
            log::debug!("session closed, skipping frame {}", ticket.generation());
            return;
        }
        if !inner.scheduler.is_current(ticket) {
            log::trace!("frame {} superseded", ticket.generation());
            return;
        }

        match inner.measure_and_decorate() {
            Ok((outcome, dispatched)) => {
                inner.last_outcome = Some(outcome);
                dispatched
            }
            Err(err) => {
                log::warn!("pagination pass failed: {}", err);
                None
            }
        }
    };

    let Some(dispatched) = dispatched else {
        return;
    };
    if let Some(next) = dispatched.ticket {
        schedule_pass(&session, &frames, next);
    }
    if dispatched.state_changed {
        notify(&session);
    }
}

/// Hand the current state to every subscriber. Subscribers run outside the
/// session borrow so they may query the editor.
fn notify<R: Renderer>(session: &Rc<RefCell<Session<R>>>) {
    let (mut subscribers, state) = {
        let mut inner = session.borrow_mut();
        if !inner.alive {
            return;
        }
        (
            std::mem::take(&mut inner.subscribers),
            inner.store.state().clone(),
        )
    };

    for subscriber in subscribers.iter_mut() {
        subscriber(&state);
    }

    let mut inner = session.borrow_mut();
    if inner.alive {
        subscribers.append(&mut inner.subscribers);
        inner.subscribers = subscribers;
    }
}
