//! Text measurement seam.
//!
//! Text elements derive their height from their content at a given width. The
//! host supplies a measurer backed by real font metrics; [`ApproxTextMeasurer`]
//! is a deterministic stand-in.

use crate::element::TextContent;

/// Average glyph advance as a fraction of the font size.
const AVERAGE_ADVANCE: f64 = 0.55;

/// Input to a measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct TextMeasureRequest<'a> {
    pub text: &'a str,
    pub font_family: &'a str,
    pub font_size: f64,
    pub line_height: f64,
    /// Available wrapping width in logical units.
    pub width: f64,
}

impl<'a> TextMeasureRequest<'a> {
    pub fn for_content(content: &'a TextContent, width: f64) -> Self {
        Self {
            text: &content.text,
            font_family: &content.font_family,
            font_size: content.font_size,
            line_height: content.line_height,
            width,
        }
    }
}

/// Measured text block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub height: f64,
    pub line_count: usize,
}

/// Computes the laid-out height of a text block at a given width.
///
/// Implementations must be deterministic: the same request yields the same
/// metrics.
pub trait TextMeasurer {
    fn measure(&self, request: &TextMeasureRequest<'_>) -> TextMetrics;
}

/// Greedy word wrap using a fixed average glyph advance.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxTextMeasurer;

impl ApproxTextMeasurer {
    fn wrapped_lines(paragraph: &str, max_chars: usize) -> usize {
        let mut lines = 1;
        let mut current = 0usize;
        for word in paragraph.split_whitespace() {
            let mut len = word.chars().count();
            // Break words longer than a full line.
            while len > max_chars {
                if current > 0 {
                    lines += 1;
                }
                len -= max_chars;
                current = max_chars;
            }
            let needed = if current == 0 { len } else { current + 1 + len };
            if needed <= max_chars {
                current = needed;
            } else {
                lines += 1;
                current = len;
            }
        }
        lines
    }
}

impl TextMeasurer for ApproxTextMeasurer {
    fn measure(&self, request: &TextMeasureRequest<'_>) -> TextMetrics {
        let advance = (request.font_size * AVERAGE_ADVANCE).max(f64::EPSILON);
        let max_chars = ((request.width / advance).floor() as usize).max(1);
        let line_count = request
            .text
            .split('\n')
            .map(|paragraph| Self::wrapped_lines(paragraph, max_chars))
            .sum::<usize>()
            .max(1);
        TextMetrics {
            height: line_count as f64 * request.font_size * request.line_height,
            line_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str, width: f64) -> TextMeasureRequest<'_> {
        TextMeasureRequest {
            text,
            font_family: "Inter",
            font_size: 20.0,
            line_height: 1.5,
            width,
        }
    }

    #[test]
    fn test_single_line() {
        // 20px font => 11px advance; 200px fits 18 chars.
        let metrics = ApproxTextMeasurer.measure(&request("hello world", 200.0));
        assert_eq!(metrics.line_count, 1);
        assert!((metrics.height - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_wraps_at_narrow_width() {
        // 60px fits 5 chars per line.
        let metrics = ApproxTextMeasurer.measure(&request("hello world again", 60.0));
        assert_eq!(metrics.line_count, 3);
    }

    #[test]
    fn test_explicit_newlines() {
        let metrics = ApproxTextMeasurer.measure(&request("a\nb\n\nc", 500.0));
        assert_eq!(metrics.line_count, 4);
    }

    #[test]
    fn test_long_word_is_broken() {
        // 12 chars at 5 per line => 3 lines.
        let metrics = ApproxTextMeasurer.measure(&request("abcdefghijkl", 60.0));
        assert_eq!(metrics.line_count, 3);
    }

    #[test]
    fn test_narrower_is_never_shorter() {
        let text = "The quick brown fox jumps over the lazy dog";
        let wide = ApproxTextMeasurer.measure(&request(text, 400.0));
        let narrow = ApproxTextMeasurer.measure(&request(text, 120.0));
        assert!(narrow.height >= wide.height);
    }

    #[test]
    fn test_measurement_is_deterministic() {
        let text = "Same input, same output";
        let a = ApproxTextMeasurer.measure(&request(text, 90.0));
        let b = ApproxTextMeasurer.measure(&request(text, 90.0));
        assert_eq!(a, b);
    }
}
