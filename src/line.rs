//! Line - an ordered sequence of styled characters with cached metrics
//!
//! A line caches its total pixel width (sum of character advances) and its
//! height (max of character line heights). The height cache follows an
//! asymmetric rule: inserting a character can only *raise* it, in O(1), while
//! removing a character that matches the cached height triggers an O(n)
//! rescan to find the new maximum. An empty line keeps whatever height it was
//! seeded with, so a blank line still occupies vertical space.

use crate::geometry::Point;
use crate::metrics::FontMetrics;
use crate::style::{StyledChar, TextStyle};
use std::ops::Range;

/// One logical line of styled characters
#[derive(Debug, Clone, Default)]
pub struct Line {
    chars: Vec<StyledChar>,
    width: f32,
    height: f32,
}

impl Line {
    /// Create an empty line with zero height
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty line seeded with an explicit height.
    ///
    /// Used when splitting a line (the new line inherits the height of the
    /// character at the split point) and when loading files.
    pub fn with_height(height: f32) -> Self {
        Self {
            chars: Vec::new(),
            width: 0.0,
            height,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Number of characters on the line
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the line has no characters (it may still have a height)
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Cached total width in pixels
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Cached line height in pixels
    pub fn height(&self) -> f32 {
        self.height
    }

    /// The characters of the line, in order
    pub fn chars(&self) -> &[StyledChar] {
        &self.chars
    }

    /// Character at `index`, if any
    pub fn char_at(&self, index: usize) -> Option<&StyledChar> {
        self.chars.get(index)
    }

    /// Tallest character height, or the seeded height if the line is empty
    pub fn max_char_height(&self, metrics: &dyn FontMetrics) -> f32 {
        if self.chars.is_empty() {
            return self.height;
        }
        self.chars
            .iter()
            .map(|ch| ch.height(metrics))
            .fold(0.0, f32::max)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Insert a character at `pos` (clamped to `[0, len]`)
    pub fn insert(&mut self, metrics: &dyn FontMetrics, pos: usize, ch: StyledChar) {
        let pos = pos.min(self.chars.len());
        self.width += ch.width(metrics);
        let h = ch.height(metrics);
        self.chars.insert(pos, ch);
        self.raise_height(h);
    }

    /// Remove and return the character at `pos` (clamped to the last index)
    ///
    /// Returns `None` on an empty line. If the removed character carried the
    /// cached height, the remaining characters are rescanned for the new max.
    pub fn remove_at(&mut self, metrics: &dyn FontMetrics, pos: usize) -> Option<StyledChar> {
        if self.chars.is_empty() {
            return None;
        }
        let pos = pos.min(self.chars.len() - 1);
        let ch = self.chars.remove(pos);
        self.width -= ch.width(metrics);
        if ch.height(metrics) == self.height {
            self.rescan_height(metrics);
        }
        Some(ch)
    }

    /// Insert at the start of the line
    pub fn push_front(&mut self, metrics: &dyn FontMetrics, ch: StyledChar) {
        self.insert(metrics, 0, ch);
    }

    /// Append at the end of the line
    pub fn push_back(&mut self, metrics: &dyn FontMetrics, ch: StyledChar) {
        self.insert(metrics, self.chars.len(), ch);
    }

    /// Remove the first character
    pub fn pop_front(&mut self, metrics: &dyn FontMetrics) -> Option<StyledChar> {
        self.remove_at(metrics, 0)
    }

    /// Remove the last character
    pub fn pop_back(&mut self, metrics: &dyn FontMetrics) -> Option<StyledChar> {
        if self.chars.is_empty() {
            return None;
        }
        self.remove_at(metrics, self.chars.len() - 1)
    }

    /// Split the line at `pos`, returning the tail `[pos, len)` as a new line.
    ///
    /// The tail is seeded with the height of the character at the split
    /// boundary (`pos`, or `pos - 1` when splitting at the very end), so an
    /// empty trailing line still occupies the right vertical space. This is
    /// the carriage-return split.
    pub fn split_off(&mut self, metrics: &dyn FontMetrics, pos: usize) -> Line {
        if self.chars.is_empty() {
            return Line::with_height(self.height);
        }
        let pos = pos.min(self.chars.len());
        let seed = self.chars[pos.min(self.chars.len() - 1)].height(metrics);

        let moved = self.chars.split_off(pos);
        let mut lost_tallest = false;
        for ch in &moved {
            self.width -= ch.width(metrics);
            if ch.height(metrics) == self.height {
                lost_tallest = true;
            }
        }
        if lost_tallest {
            self.rescan_height(metrics);
        }

        let mut tail = Line::with_height(seed);
        for ch in moved {
            tail.push_back(metrics, ch);
        }
        tail
    }

    /// Apply a style mutator to the characters in `range` and recount the
    /// cached width and height. The range is clamped to the line.
    pub fn restyle(
        &mut self,
        metrics: &dyn FontMetrics,
        range: Range<usize>,
        mutate: &dyn Fn(&mut TextStyle),
    ) {
        let start = range.start.min(self.chars.len());
        let end = range.end.min(self.chars.len());
        for i in start..end {
            let mut style = self.chars[i].style().clone();
            mutate(&mut style);
            self.chars[i] = self.chars[i].with_style(style);
        }
        if start < end {
            self.recount_width(metrics);
            self.recount_height(metrics);
        }
    }

    /// Recompute the cached width from scratch
    pub fn recount_width(&mut self, metrics: &dyn FontMetrics) {
        self.width = self.chars.iter().map(|ch| ch.width(metrics)).sum();
    }

    /// Recompute the cached height from scratch (empty lines keep theirs)
    pub fn recount_height(&mut self, metrics: &dyn FontMetrics) {
        if self.chars.is_empty() {
            return;
        }
        self.height = self
            .chars
            .iter()
            .map(|ch| ch.height(metrics))
            .fold(0.0, f32::max);
    }

    /// Consume the line, yielding its characters (used when merging lines)
    pub fn into_chars(self) -> Vec<StyledChar> {
        self.chars
    }

    // ========================================================================
    // Layout queries
    // ========================================================================

    /// Pixel x-offset of `column` within the line (sum of advances before it).
    /// The column is clamped to `[0, len]`.
    pub fn offset_of_column(&self, metrics: &dyn FontMetrics, column: usize) -> f32 {
        let column = column.min(self.chars.len());
        self.chars[..column]
            .iter()
            .map(|ch| ch.width(metrics))
            .sum()
    }

    /// Column whose character midpoint is nearest to pixel offset `x`,
    /// together with that column's snapped x-offset.
    ///
    /// Out-of-range `x` clamps to the line's ends. The scan stops at the
    /// first character whose midpoint reaches `x`.
    pub fn column_at_offset(&self, metrics: &dyn FontMetrics, x: f32) -> (usize, f32) {
        if x >= self.width {
            return (self.chars.len(), self.width);
        }
        if x <= 0.0 {
            return (0, 0.0);
        }
        let mut offset = 0.0;
        let mut column = 0;
        while column < self.chars.len() {
            let advance = self.chars[column].width(metrics);
            if offset + advance / 2.0 >= x {
                break;
            }
            offset += advance;
            column += 1;
        }
        (column, offset)
    }

    /// Vertical centering offset for the character at `column` (the line's
    /// trailing character when `column == len`): 0 when the character fills
    /// the line height, otherwise 80% of the height difference. Baseline-
    /// aligns mixed font sizes within one line.
    pub fn vertical_inset(&self, metrics: &dyn FontMetrics, column: usize) -> f32 {
        if self.chars.is_empty() {
            return 0.0;
        }
        let column = column.min(self.chars.len() - 1);
        let char_height = self.chars[column].height(metrics);
        if char_height < self.height {
            (self.height - char_height) * 0.8
        } else {
            0.0
        }
    }

    /// Walk the line left to right, emitting each character with its pen
    /// position. The y handed to `emit` is the line's baseline (80% of the
    /// line height below `origin.y`); x advances by each character's width.
    pub fn draw<F: FnMut(Point, &StyledChar)>(
        &self,
        metrics: &dyn FontMetrics,
        origin: Point,
        emit: &mut F,
    ) {
        let baseline = origin.y + self.height * 0.8;
        let mut x = origin.x;
        for ch in &self.chars {
            emit(Point::new(x, baseline), ch);
            x += ch.width(metrics);
        }
    }

    // ========================================================================
    // Height cache maintenance
    // ========================================================================

    /// O(1) raise: a new character can only push the cached height up
    fn raise_height(&mut self, h: f32) {
        if h > self.height {
            self.height = h;
        }
    }

    /// O(n) shrink: called when a removed character matched the cached
    /// height. Empty lines keep their height.
    fn rescan_height(&mut self, metrics: &dyn FontMetrics) {
        if self.chars.is_empty() {
            return;
        }
        let tallest = self
            .chars
            .iter()
            .map(|ch| ch.height(metrics))
            .fold(0.0, f32::max);
        if tallest < self.height {
            self.height = tallest;
        }
    }
}
