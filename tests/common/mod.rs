//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use scribe::{Document, FixedMetrics, FontMetrics, Line, StyledChar, TextStyle};

/// Uniform stub metrics: every character is 8px wide, every line 14px tall
pub const METRICS: FixedMetrics = FixedMetrics::new(8.0, 14.0);

/// A character in the default style
pub fn plain(ch: char) -> StyledChar {
    StyledChar::new(ch, TextStyle::default())
}

/// A character in the default family at an explicit point size
pub fn sized(ch: char, size: f32) -> StyledChar {
    StyledChar::new(ch, TextStyle::new("Monospace", size))
}

/// Build a line from a string, seeded with the default style's line height
pub fn line_of(metrics: &dyn FontMetrics, text: &str) -> Line {
    let mut line = Line::with_height(metrics.line_height(&TextStyle::default()));
    for ch in text.chars() {
        line.push_back(metrics, plain(ch));
    }
    line
}

/// Build a document from one string per line
pub fn doc_of(metrics: &dyn FontMetrics, lines: &[&str]) -> Document {
    Document::from_lines(lines.iter().map(|text| line_of(metrics, text)).collect())
}

/// The document's content as one string per line (styles dropped)
pub fn text_of(doc: &Document) -> Vec<String> {
    doc.lines().iter().map(line_text).collect()
}

/// A line's content as a string
pub fn line_text(line: &Line) -> String {
    line.chars().iter().map(|ch| ch.value()).collect()
}

/// Assert two pixel quantities match (cached metrics are f32 sums)
pub fn assert_px_eq(actual: f32, expected: f32, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "{}: expected {}, got {}",
        what,
        expected,
        actual
    );
}

/// Assert every cached metric in the document matches a from-scratch recount:
/// line widths are sums of advances, line heights cover the tallest
/// character, and the document height is the sum of line heights.
pub fn assert_caches_consistent(metrics: &dyn FontMetrics, doc: &Document) {
    let mut height_sum = 0.0;
    for (i, line) in doc.lines().iter().enumerate() {
        let width: f32 = line.chars().iter().map(|ch| ch.width(metrics)).sum();
        assert_px_eq(line.width(), width, &format!("line {} width", i));
        if !line.is_empty() {
            let tallest = line
                .chars()
                .iter()
                .map(|ch| ch.height(metrics))
                .fold(0.0, f32::max);
            assert!(
                line.height() >= tallest - 1e-3,
                "line {} height {} below tallest char {}",
                i,
                line.height(),
                tallest
            );
        }
        height_sum += line.height();
    }
    assert_px_eq(doc.height(), height_sum, "document height");
}
