//! Font metrics for layout

/// Metrics needed for text layout
#[derive(Debug, Clone)]
pub struct FontMetrics {
    /// Font size in logical pixels
    pub font_size: f32,
    /// Line height in logical pixels
    pub line_height: f32,
    /// Width of ASCII characters (0-127)
    pub char_widths: Vec<f32>,
    /// Default width for non-ASCII characters
    pub default_width: f32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        // 16px body text, 1.5 line height, roughly half-em advance
        Self::monospace(16.0, 24.0, 8.0)
    }
}

impl FontMetrics {
    pub fn new(font_size: f32, line_height: f32, char_widths: Vec<f32>, default_width: f32) -> Self {
        Self {
            font_size,
            line_height,
            char_widths,
            default_width,
        }
    }

    /// Every character has the same advance
    pub fn monospace(font_size: f32, line_height: f32, advance: f32) -> Self {
        Self::new(font_size, line_height, vec![advance; 128], advance)
    }

    /// Get width of a character
    pub fn width(&self, c: char) -> f32 {
        if c.is_ascii() {
            if let Some(w) = self.char_widths.get(c as usize) {
                return *w;
            }
        }
        self.default_width
    }

    /// Get width of a grapheme cluster
    pub fn grapheme_width(&self, grapheme: &str) -> f32 {
        if grapheme == "\t" {
            self.default_width * 4.0
        } else if grapheme.chars().all(|c| c.is_control()) {
            0.0
        } else {
            // Combining marks ride on their base character
            grapheme.chars().next().map_or(0.0, |c| self.width(c))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths() {
        let mut widths = vec![8.0; 128];
        widths['i' as usize] = 3.0;
        let metrics = FontMetrics::new(16.0, 24.0, widths, 10.0);

        assert_eq!(metrics.width('i'), 3.0);
        assert_eq!(metrics.width('m'), 8.0);
        assert_eq!(metrics.width('λ'), 10.0);
        assert_eq!(metrics.grapheme_width("e\u{301}"), 8.0);
        assert_eq!(metrics.grapheme_width("\t"), 40.0);
    }
}
