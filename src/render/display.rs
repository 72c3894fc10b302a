//! Display list: render-ready representation of the pagination overlays

use crate::error::Result;
use crate::pagination::{Overlay, OverlayKind, PageProfile, PaginationState};
use serde::Serialize;

/// CSS class of a spacer element
pub const SPACER_CLASS: &str = "page-spacer";
/// CSS class of a footer element
pub const FOOTER_CLASS: &str = "page-footer";

/// A display item to render at an anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayItem {
    /// Empty block that pushes the following content to the next page
    PageSpacer { anchor: usize, height: f32 },
    /// Page number marker below the last block
    PageFooter {
        anchor: usize,
        page_number: usize,
        margin_top: f32,
    },
}

impl From<&Overlay> for DisplayItem {
    fn from(overlay: &Overlay) -> Self {
        match overlay.kind {
            OverlayKind::Spacer { height } => DisplayItem::PageSpacer {
                anchor: overlay.anchor,
                height,
            },
            OverlayKind::Footer {
                page_number,
                margin_top,
            } => DisplayItem::PageFooter {
                anchor: overlay.anchor,
                page_number,
                margin_top,
            },
        }
    }
}

impl DisplayItem {
    pub fn anchor(&self) -> usize {
        match self {
            DisplayItem::PageSpacer { anchor, .. } | DisplayItem::PageFooter { anchor, .. } => {
                *anchor
            }
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            DisplayItem::PageSpacer { .. } => SPACER_CLASS,
            DisplayItem::PageFooter { .. } => FOOTER_CLASS,
        }
    }

    /// Inline style for the element
    pub fn style(&self) -> String {
        match self {
            DisplayItem::PageSpacer { height, .. } => format!("height: {}px;", height),
            DisplayItem::PageFooter { margin_top, .. } => format!("margin-top: {}px;", margin_top),
        }
    }

    /// Value of the `data-page-number` attribute, footers only
    pub fn page_number(&self) -> Option<usize> {
        match self {
            DisplayItem::PageFooter { page_number, .. } => Some(*page_number),
            DisplayItem::PageSpacer { .. } => None,
        }
    }

    pub fn to_element(&self) -> HostElement {
        HostElement {
            anchor: self.anchor(),
            class_name: self.class_name(),
            style: self.style(),
            page_number: self.page_number(),
        }
    }
}

/// Element description handed to the host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostElement {
    pub anchor: usize,
    pub class_name: &'static str,
    pub style: String,
    #[serde(rename = "data-page-number", skip_serializing_if = "Option::is_none")]
    pub page_number: Option<usize>,
}

/// Page counter and canvas size for the surrounding UI
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageChrome {
    pub page_count: usize,
    /// Zoom level, 100 is unscaled
    pub zoom_percent: u32,
    /// Height of the backdrop drawing every sheet and the gaps between them
    pub canvas_height: f32,
    pub page_width: f32,
    pub page_height: f32,
}

impl PageChrome {
    pub fn new(page_count: usize, profile: &PageProfile, zoom: f32) -> Self {
        let zoom = if zoom > 0.0 && zoom.is_finite() { zoom } else { 1.0 };
        Self {
            page_count,
            zoom_percent: (zoom * 100.0).round() as u32,
            canvas_height: page_count as f32 * profile.page_stride(),
            page_width: profile.page_width,
            page_height: profile.page_height,
        }
    }

    /// Text for the page counter
    pub fn label(&self) -> String {
        if self.page_count == 1 {
            "1 page".to_string()
        } else {
            format!("{} pages", self.page_count)
        }
    }
}

/// Complete display list for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
    pub version: u64,
    pub chrome: PageChrome,
    pub items: Vec<DisplayItem>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DisplayListJson<'a> {
    version: u64,
    chrome: &'a PageChrome,
    elements: Vec<HostElement>,
}

impl DisplayList {
    /// Build display list from pagination state
    pub fn build(version: u64, state: &PaginationState, profile: &PageProfile, zoom: f32) -> Self {
        Self {
            version,
            chrome: PageChrome::new(state.page_count, profile, zoom),
            items: state.overlays.iter().map(DisplayItem::from).collect(),
        }
    }

    pub fn footer(&self) -> Option<&DisplayItem> {
        self.items
            .iter()
            .rev()
            .find(|item| matches!(item, DisplayItem::PageFooter { .. }))
    }

    pub fn to_json(&self) -> Result<String> {
        let json = DisplayListJson {
            version: self.version,
            chrome: &self.chrome,
            elements: self.items.iter().map(DisplayItem::to_element).collect(),
        };
        Ok(serde_json::to_string(&json)?)
    }
}
