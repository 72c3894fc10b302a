//! Line breaking algorithm

use crate::layout::font::FontMetrics;
use std::ops::Range;
use unicode_linebreak::linebreaks;
use unicode_segmentation::UnicodeSegmentation;

/// Greedy line breaker over UAX #14 break opportunities
#[derive(Debug, Default)]
pub struct LineBreaker;

impl LineBreaker {
    pub fn new() -> Self {
        Self
    }

    /// Break `text` into lines no wider than `max_width`.
    ///
    /// `font_scale` multiplies every advance (headings render larger).
    /// Returns byte ranges; an empty text still yields one empty line.
    pub fn break_lines(
        &self,
        text: &str,
        metrics: &FontMetrics,
        font_scale: f32,
        max_width: f32,
    ) -> Vec<Range<usize>> {
        if text.is_empty() {
            return vec![0..0];
        }

        let opportunities: Vec<usize> = linebreaks(text).map(|(idx, _)| idx).collect();
        let graphemes: Vec<(usize, f32)> = text
            .grapheme_indices(true)
            .map(|(idx, g)| (idx, metrics.grapheme_width(g) * font_scale))
            .collect();

        let mut lines = Vec::new();
        let mut line_start = 0;
        let mut x = 0.0;
        let mut i = 0;

        while i < graphemes.len() {
            let (byte_idx, width) = graphemes[i];

            // Soft wrap, but never produce an empty line
            if x + width > max_width && byte_idx > line_start {
                let upto = opportunities.partition_point(|&o| o <= byte_idx);
                let break_at = opportunities[..upto]
                    .last()
                    .copied()
                    .filter(|&o| o > line_start)
                    .unwrap_or(byte_idx);

                lines.push(line_start..break_at);
                line_start = break_at;
                x = 0.0;
                i = graphemes.partition_point(|&(idx, _)| idx < break_at);
                continue;
            }

            x += width;
            i += 1;
        }

        lines.push(line_start..text.len());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> FontMetrics {
        FontMetrics::monospace(16.0, 24.0, 10.0)
    }

    #[test]
    fn test_empty_text_has_one_line() {
        let lines = LineBreaker::new().break_lines("", &metrics(), 1.0, 100.0);
        assert_eq!(lines, vec![0..0]);
    }

    #[test]
    fn test_breaks_at_spaces() {
        // 10px per char, 100px wide: "hello world again" wraps after each word pair
        let lines = LineBreaker::new().break_lines("hello world again", &metrics(), 1.0, 100.0);
        assert_eq!(lines, vec![0..6, 6..12, 12..17]);
    }

    #[test]
    fn test_emergency_break_inside_long_word() {
        let lines = LineBreaker::new().break_lines("abcdefghijkl", &metrics(), 1.0, 50.0);
        assert_eq!(lines, vec![0..5, 5..10, 10..12]);
    }

    #[test]
    fn test_font_scale_widens_text() {
        let lines = LineBreaker::new().break_lines("abcd", &metrics(), 2.0, 40.0);
        assert_eq!(lines, vec![0..2, 2..4]);
    }

    #[test]
    fn test_lines_cover_text() {
        let text = "The quick brown fox jumps over the lazy dog, again and again.";
        let lines = LineBreaker::new().break_lines(text, &metrics(), 1.0, 120.0);
        assert_eq!(lines.first().map(|l| l.start), Some(0));
        assert_eq!(lines.last().map(|l| l.end), Some(text.len()));
        for pair in lines.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }
}
