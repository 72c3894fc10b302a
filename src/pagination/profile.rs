//! Page profile: sheet geometry and split heuristics

use crate::error::{PaginationError, Result};
use serde::{Deserialize, Serialize};

/// Display variant for the page canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutMode {
    /// Separate sheets: spacers also cover the bottom margin, gap and top margin
    #[default]
    Paged,
    /// Continuous grid display without inter-page separation
    Grid,
}

impl LayoutMode {
    pub fn from_grid_flag(is_grid: bool) -> Self {
        if is_grid {
            LayoutMode::Grid
        } else {
            LayoutMode::Paged
        }
    }

    pub fn is_grid(&self) -> bool {
        matches!(self, LayoutMode::Grid)
    }
}

/// Fixed page geometry for a document, in CSS pixels.
///
/// Defaults describe US Letter at 96 DPI with one-inch margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageProfile {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    /// Vertical gap between two sheets
    pub page_gap: f32,
    /// A text block must span strictly more lines than this to be split
    pub massive_min_lines: f32,
    /// Line height as a multiple of font size when the style has none
    pub line_height_fallback: f32,
}

impl Default for PageProfile {
    fn default() -> Self {
        Self {
            page_width: 816.0,   // 8.5" at 96 DPI
            page_height: 1056.0, // 11" at 96 DPI
            margin_top: 96.0,
            margin_bottom: 96.0,
            margin_left: 96.0,
            margin_right: 96.0,
            page_gap: 48.0,
            massive_min_lines: 3.0,
            line_height_fallback: 1.2,
        }
    }
}

impl PageProfile {
    /// Load a profile from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let profile: Self = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Reject negative lengths and profiles that leave no content area
    pub fn validate(&self) -> Result<()> {
        let lengths = [
            ("margin_top", self.margin_top),
            ("margin_bottom", self.margin_bottom),
            ("margin_left", self.margin_left),
            ("margin_right", self.margin_right),
            ("page_gap", self.page_gap),
            ("massive_min_lines", self.massive_min_lines),
        ];
        if let Some((name, value)) = lengths
            .iter()
            .find(|(_, value)| !(*value >= 0.0 && value.is_finite()))
        {
            return Err(PaginationError::Profile(format!(
                "{} must be non-negative, got {}",
                name, value
            )));
        }
        if !(self.content_height() > 0.0 && self.content_height().is_finite()) {
            return Err(PaginationError::Profile(format!(
                "no content height left on a {}px page",
                self.page_height
            )));
        }
        if !(self.content_width() > 0.0 && self.content_width().is_finite()) {
            return Err(PaginationError::Profile(format!(
                "no content width left on a {}px page",
                self.page_width
            )));
        }
        Ok(())
    }

    /// Get usable content width
    pub fn content_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }

    /// Get usable content height per page
    pub fn content_height(&self) -> f32 {
        self.page_height - self.margin_top - self.margin_bottom
    }

    /// Space between the last content line of a page and the first of the next
    pub fn page_separation(&self) -> f32 {
        self.margin_bottom + self.page_gap + self.margin_top
    }

    /// Height of one sheet plus the gap after it
    pub fn page_stride(&self) -> f32 {
        self.page_height + self.page_gap
    }
}
