//! WASM bindings for the paginator
//!
//! The host renders the document, measures it and pushes the geometry in as
//! JSON, then drives frames from `requestAnimationFrame`.

use crate::editor::PaginatedEditor;
use crate::error::PaginationError;
use crate::layout::{GeometrySnapshot, SnapshotRenderer};
use crate::pagination::{FrameLoop, LayoutMode, PageProfile};
use crate::{Document, EditOp};
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

impl From<PaginationError> for JsValue {
    fn from(err: PaginationError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// WASM-exposed pagination session
#[wasm_bindgen]
pub struct WasmPaginator {
    editor: PaginatedEditor<SnapshotRenderer>,
    frames: FrameLoop,
}

impl WasmPaginator {
    fn open(text: &str, profile: PageProfile) -> Self {
        let frames = FrameLoop::new();
        let editor = PaginatedEditor::new(
            Document::from_text(text),
            SnapshotRenderer::default(),
            profile,
            &frames,
        );
        Self { editor, frames }
    }
}

#[wasm_bindgen]
impl WasmPaginator {
    /// Create a session with the default page profile (US Letter)
    #[wasm_bindgen(constructor)]
    pub fn new(text: &str) -> Self {
        Self::open(text, PageProfile::default())
    }

    /// Create a session with a JSON page profile; missing fields keep their
    /// defaults
    #[wasm_bindgen(js_name = withProfile)]
    pub fn with_profile(text: &str, profile_json: &str) -> Result<WasmPaginator, JsValue> {
        let profile = PageProfile::from_json(profile_json)?;
        Ok(Self::open(text, profile))
    }

    /// Insert text; newlines start new blocks
    #[wasm_bindgen(js_name = insertText)]
    pub fn insert_text(&mut self, position: usize, text: &str) -> Result<(), JsValue> {
        self.editor.apply_edit(EditOp::insert(position, text))?;
        Ok(())
    }

    /// Delete a range, merging the blocks it spans
    #[wasm_bindgen(js_name = deleteRange)]
    pub fn delete_range(&mut self, start: usize, end: usize) -> Result<(), JsValue> {
        self.editor.apply_edit(EditOp::delete(start, end))?;
        Ok(())
    }

    /// Split the block at `position` (Enter key)
    #[wasm_bindgen(js_name = splitBlock)]
    pub fn split_block(&mut self, position: usize) -> Result<(), JsValue> {
        self.editor.apply_edit(EditOp::split_block(position))?;
        Ok(())
    }

    /// Replace the measured geometry (JSON `GeometrySnapshot`)
    #[wasm_bindgen(js_name = pushGeometry)]
    pub fn push_geometry(&mut self, json: &str) -> Result<(), JsValue> {
        let snapshot = GeometrySnapshot::from_json(json)?;
        self.editor.with_renderer_mut(|renderer| renderer.update(snapshot));
        Ok(())
    }

    /// Queue a pass against the current geometry
    #[wasm_bindgen(js_name = requestRemeasure)]
    pub fn request_remeasure(&mut self) -> Result<(), JsValue> {
        self.editor.request_remeasure()?;
        Ok(())
    }

    /// Run one frame; returns the number of callbacks executed
    #[wasm_bindgen(js_name = runFrame)]
    pub fn run_frame(&self) -> usize {
        self.frames.tick()
    }

    #[wasm_bindgen(js_name = pendingFrames)]
    pub fn pending_frames(&self) -> usize {
        self.frames.pending()
    }

    /// Toggle the grid display
    #[wasm_bindgen(js_name = setGridMode)]
    pub fn set_grid_mode(&mut self, is_grid: bool) -> Result<(), JsValue> {
        self.editor.set_layout_mode(LayoutMode::from_grid_flag(is_grid))?;
        Ok(())
    }

    #[wasm_bindgen(js_name = isGridMode)]
    pub fn is_grid_mode(&self) -> bool {
        self.editor.layout_mode().is_grid()
    }

    /// Get page count
    #[wasm_bindgen(js_name = getPageCount)]
    pub fn get_page_count(&self) -> usize {
        self.editor.page_count()
    }

    /// Get full document text
    #[wasm_bindgen(js_name = getText)]
    pub fn get_text(&self) -> String {
        self.editor.text()
    }

    /// Current overlays as JSON
    #[wasm_bindgen(js_name = getOverlays)]
    pub fn get_overlays(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.editor.overlays())
            .map_err(|err| JsValue::from(PaginationError::from(err)))
    }

    /// Overlay elements and page chrome as JSON
    #[wasm_bindgen(js_name = getRenderData)]
    pub fn get_render_data(&mut self) -> Result<String, JsValue> {
        let zoom = self
            .editor
            .with_renderer_mut(|renderer| renderer.snapshot().scale);
        Ok(self.editor.display_list(zoom).to_json()?)
    }

    /// Call `callback(pageCount)` whenever the pagination state changes
    #[wasm_bindgen(js_name = onStateChange)]
    pub fn on_state_change(&mut self, callback: js_sys::Function) {
        self.editor.subscribe(move |state| {
            let page_count = JsValue::from(state.page_count as u32);
            if let Err(err) = callback.call1(&JsValue::NULL, &page_count) {
                log::warn!("state change callback threw: {:?}", err);
            }
        });
    }

    /// Tear the session down; queued frames become no-ops
    pub fn destroy(&mut self) {
        self.editor.destroy();
    }
}
