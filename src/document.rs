//! Document - an ordered sequence of lines with a cached total height
//!
//! The document owns its lines exclusively and keeps `height == Σ line
//! heights` across every mutation, including the multi-line range edits
//! (delete/copy/cut/paste) and the backspace line-join. A document never has
//! zero lines; the empty document is a single empty line.
//!
//! Position↔pixel mapping lives here too, since it depends on the cached
//! metrics: `position_to_point` and `point_to_position` are the two
//! directions, both clamping out-of-range input instead of failing (a stray
//! mouse coordinate must degrade to the nearest valid location).

use std::ops::Range;

use tracing::trace;

use crate::geometry::{Point, Position, Span};
use crate::line::Line;
use crate::metrics::FontMetrics;
use crate::style::{StyledChar, TextStyle};

/// A styled-text document: lines of styled characters plus cached height
#[derive(Debug, Clone, Default)]
pub struct Document {
    lines: Vec<Line>,
    height: f32,
}

impl Document {
    /// Create a document holding a single empty line of zero height
    pub fn new() -> Self {
        Self {
            lines: vec![Line::new()],
            height: 0.0,
        }
    }

    /// Create a document holding a single empty line seeded with `height`
    /// (a fresh file whose blank line already occupies one text row)
    pub fn with_line_height(height: f32) -> Self {
        Self {
            lines: vec![Line::with_height(height)],
            height,
        }
    }

    /// Build a document from prepared lines. An empty vector yields the
    /// empty document (one empty line).
    pub fn from_lines(lines: Vec<Line>) -> Self {
        let mut lines = lines;
        if lines.is_empty() {
            lines.push(Line::new());
        }
        let height = lines.iter().map(Line::height).sum();
        Self { lines, height }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Number of lines (always >= 1)
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The lines of the document, in order
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Line at `index`, clamped to the last line
    pub fn line(&self, index: usize) -> &Line {
        &self.lines[index.min(self.lines.len() - 1)]
    }

    /// Cached total height in pixels
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Width of the widest line in pixels
    pub fn max_width(&self) -> f32 {
        self.lines.iter().map(Line::width).fold(0.0, f32::max)
    }

    /// Character at a clamped position; `None` when the line is empty.
    /// Used by the shell to inherit the style at the caret.
    pub fn char_at(&self, line: usize, column: usize) -> Option<&StyledChar> {
        let line = self.line(line);
        if line.is_empty() {
            return None;
        }
        line.char_at(column.min(line.len() - 1))
    }

    // ========================================================================
    // Line-level mutation
    // ========================================================================

    /// Insert a whole line at `index` (clamped to `[0, line_count]`)
    pub fn insert_line(&mut self, index: usize, line: Line) {
        let index = index.min(self.lines.len());
        self.height += line.height();
        self.lines.insert(index, line);
    }

    /// Remove and return the line at `index` (clamped to the last line).
    ///
    /// Removing the only line leaves behind an empty line seeded with the
    /// removed line's height, so the document never runs out of lines and a
    /// cleared document still occupies one blank row.
    pub fn remove_line(&mut self, index: usize) -> Line {
        let index = index.min(self.lines.len() - 1);
        let line = self.remove_line_raw(index);
        if self.lines.is_empty() {
            self.lines.push(Line::with_height(line.height()));
            self.height += line.height();
        }
        line
    }

    /// Insert a line at the top of the document
    pub fn push_front(&mut self, line: Line) {
        self.insert_line(0, line);
    }

    /// Append a line at the bottom of the document
    pub fn push_back(&mut self, line: Line) {
        self.insert_line(self.lines.len(), line);
    }

    /// Remove the first line
    pub fn pop_front(&mut self) -> Line {
        self.remove_line(0)
    }

    /// Remove the last line
    pub fn pop_back(&mut self) -> Line {
        self.remove_line(self.lines.len() - 1)
    }

    /// Remove without the at-least-one-line guard. Callers must leave the
    /// document non-empty before returning to the outside.
    fn remove_line_raw(&mut self, index: usize) -> Line {
        debug_assert!(index < self.lines.len());
        let line = self.lines.remove(index);
        self.height -= line.height();
        line
    }

    /// Run a closure against one line and fold the line's height change into
    /// the document's cached height. All character-level edits go through
    /// here so the `height == Σ line heights` invariant survives every path.
    fn edit_line<R>(&mut self, index: usize, edit: impl FnOnce(&mut Line) -> R) -> R {
        let before = self.lines[index].height();
        let result = edit(&mut self.lines[index]);
        let after = self.lines[index].height();
        self.height += after - before;
        result
    }

    // ========================================================================
    // Character-level editing
    // ========================================================================

    /// Insert a character at a position (line clamped, column clamped by the
    /// line). The document height grows if the line grew.
    pub fn insert_char(&mut self, metrics: &dyn FontMetrics, pos: Position, ch: StyledChar) {
        let line = pos.line.min(self.lines.len() - 1);
        self.edit_line(line, |l| l.insert(metrics, pos.column, ch));
    }

    /// Backspace at a position, returning the caret's new position.
    ///
    /// At column 0 of a non-first line the line is joined onto the end of
    /// the previous line and removed; the returned position is the merge
    /// point. Otherwise the character before the column is removed. At the
    /// very start of the document this is a no-op.
    pub fn erase_char(&mut self, metrics: &dyn FontMetrics, pos: Position) -> Position {
        let line = pos.line.min(self.lines.len() - 1);
        let column = pos.column.min(self.lines[line].len());

        if column == 0 {
            if line == 0 {
                return Position::new(0, 0);
            }
            let merged = self.remove_line_raw(line);
            let merge_column = self.lines[line - 1].len();
            self.edit_line(line - 1, |prev| {
                for ch in merged.into_chars() {
                    prev.push_back(metrics, ch);
                }
            });
            return Position::new(line - 1, merge_column);
        }

        self.edit_line(line, |l| {
            l.remove_at(metrics, column - 1);
        });
        Position::new(line, column - 1)
    }

    /// Split a line at a position (the Enter key): the tail of the line
    /// moves to a new line inserted below, seeded with the height at the
    /// split point. Returns the caret position at the start of the new line.
    pub fn split_line(&mut self, metrics: &dyn FontMetrics, pos: Position) -> Position {
        let pos = self.clamp_position(pos);
        let tail = self.edit_line(pos.line, |l| l.split_off(metrics, pos.column));
        self.insert_line(pos.line + 1, tail);
        Position::new(pos.line + 1, 0)
    }

    /// Apply a style mutator to every character in `span`, then recount the
    /// touched lines' caches (and the document height with them).
    pub fn apply_style<F: Fn(&mut TextStyle)>(
        &mut self,
        metrics: &dyn FontMetrics,
        span: Span,
        mutate: F,
    ) {
        let (begin, end) = self.clamp_span(span);
        if begin == end {
            return;
        }
        for index in begin.line..=end.line {
            let range = self.span_range_on_line(begin, end, index);
            self.edit_line(index, |l| l.restyle(metrics, range, &mutate));
        }
    }

    /// The column range `span` covers on `line_index`
    fn span_range_on_line(&self, begin: Position, end: Position, line_index: usize) -> Range<usize> {
        let start = if line_index == begin.line { begin.column } else { 0 };
        let stop = if line_index == end.line {
            end.column
        } else {
            self.lines[line_index].len()
        };
        start..stop
    }

    // ========================================================================
    // Range editor
    // ========================================================================

    /// Remove all content between the span's positions.
    ///
    /// Within one line the covered characters are erased. Across lines, the
    /// begin line keeps its prefix, every interior line is removed, and the
    /// end line's suffix is spliced onto the begin line.
    pub fn delete_span(&mut self, metrics: &dyn FontMetrics, span: Span) {
        let (begin, end) = self.clamp_span(span);
        if begin == end {
            return;
        }
        trace!(?begin, ?end, "delete_span");

        if begin.line == end.line {
            self.edit_line(begin.line, |l| {
                for _ in begin.column..end.column {
                    l.remove_at(metrics, begin.column);
                }
            });
            return;
        }

        // Drop the begin line's tail
        self.edit_line(begin.line, |l| {
            l.split_off(metrics, begin.column);
        });
        // Remove the interior lines wholesale
        for _ in begin.line + 1..end.line {
            self.remove_line_raw(begin.line + 1);
        }
        // Drop the end line's prefix, keep its suffix
        self.edit_line(begin.line + 1, |l| {
            let suffix = l.split_off(metrics, end.column);
            *l = suffix;
        });
        // Splice the suffix onto the begin line and drop the emptied line
        let suffix = self.remove_line_raw(begin.line + 1);
        self.edit_line(begin.line, |l| {
            for ch in suffix.into_chars() {
                l.push_back(metrics, ch);
            }
        });
    }

    /// Deep-copy the spanned content into a new document without touching
    /// this one. Multi-line spans copy the begin line's suffix, the interior
    /// lines verbatim, and the end line's prefix (kept even when empty, so a
    /// span ending at column 0 still pastes back as a line break).
    pub fn copy_span(&self, metrics: &dyn FontMetrics, span: Span) -> Document {
        let (begin, end) = self.clamp_span(span);
        let mut lines = Vec::new();

        if begin.line == end.line {
            if begin != end {
                lines.push(copy_slice(
                    metrics,
                    &self.lines[begin.line],
                    begin.column..end.column,
                ));
            }
        } else {
            let first = &self.lines[begin.line];
            lines.push(copy_slice(metrics, first, begin.column..first.len()));
            for line in &self.lines[begin.line + 1..end.line] {
                lines.push(line.clone());
            }
            lines.push(copy_slice(
                metrics,
                &self.lines[end.line],
                0..end.column,
            ));
        }

        Document::from_lines(lines)
    }

    /// Copy and remove the spanned content in one pass, returning it as a
    /// new document. Equivalent to `copy_span` followed by `delete_span`.
    /// The caller replaces its clipboard handle with the returned document.
    pub fn cut_span(&mut self, metrics: &dyn FontMetrics, span: Span) -> Document {
        let (begin, end) = self.clamp_span(span);
        if begin == end {
            return Document::new();
        }
        trace!(?begin, ?end, "cut_span");
        let mut lines = Vec::new();

        if begin.line == end.line {
            let cut = self.edit_line(begin.line, |l| {
                let seed = l.chars()[begin.column.min(l.len() - 1)].height(metrics);
                let mut out = Line::with_height(seed);
                for _ in begin.column..end.column {
                    if let Some(ch) = l.remove_at(metrics, begin.column) {
                        out.push_back(metrics, ch);
                    }
                }
                out
            });
            lines.push(cut);
        } else {
            // Begin line's tail moves out wholesale
            let first = self.edit_line(begin.line, |l| l.split_off(metrics, begin.column));
            lines.push(first);
            // Interior lines move out unchanged
            for _ in begin.line + 1..end.line {
                lines.push(self.remove_line_raw(begin.line + 1));
            }
            // End line's prefix moves out; the suffix survives
            let prefix = self.edit_line(begin.line + 1, |l| {
                let suffix = l.split_off(metrics, end.column);
                std::mem::replace(l, suffix)
            });
            lines.push(prefix);
            // Splice the suffix onto the begin line and drop the emptied line
            let suffix = self.remove_line_raw(begin.line + 1);
            self.edit_line(begin.line, |l| {
                for ch in suffix.into_chars() {
                    l.push_back(metrics, ch);
                }
            });
        }

        Document::from_lines(lines)
    }

    /// Paste another document at a position, returning the end-of-paste
    /// position. The target line is split at the position; the source's
    /// first line joins the prefix, interior lines are inserted whole, and
    /// the split-off tail is re-appended after the source's last line.
    pub fn paste(
        &mut self,
        metrics: &dyn FontMetrics,
        source: &Document,
        pos: Position,
    ) -> Position {
        let pos = self.clamp_position(pos);
        trace!(?pos, source_lines = source.line_count(), "paste");

        let tail = self.edit_line(pos.line, |l| l.split_off(metrics, pos.column));

        self.edit_line(pos.line, |l| {
            for ch in source.lines[0].chars() {
                l.push_back(metrics, ch.clone());
            }
        });
        for (offset, line) in source.lines[1..].iter().enumerate() {
            self.insert_line(pos.line + 1 + offset, line.clone());
        }

        let end = if source.lines.len() > 1 {
            Position::new(
                pos.line + source.lines.len() - 1,
                source.lines[source.lines.len() - 1].len(),
            )
        } else {
            Position::new(pos.line, pos.column + source.lines[0].len())
        };

        self.edit_line(end.line, |l| {
            for ch in tail.into_chars() {
                l.push_back(metrics, ch);
            }
        });
        end
    }

    // ========================================================================
    // Position mapper
    // ========================================================================

    /// Cumulative height of all lines before `index` ("roof" of the line).
    /// The index is clamped to the last line.
    pub fn line_roof(&self, index: usize) -> f32 {
        let index = index.min(self.lines.len() - 1);
        self.lines[..index].iter().map(Line::height).sum()
    }

    /// Roof plus the vertical inset of the column's character
    fn vertical_offset(&self, metrics: &dyn FontMetrics, line: usize, column: usize) -> f32 {
        self.line_roof(line) + self.lines[line].vertical_inset(metrics, column)
    }

    /// Map a logical position to its pixel point, returning the clamped
    /// position alongside it.
    ///
    /// Arguments are signed so callers can hand in one-past-the-boundary
    /// values from caret movement: column -1 wraps to the end of the
    /// previous line, a column past the line's length wraps to the start of
    /// the next line, and at the document's first/last position the caret
    /// clamps in place.
    pub fn position_to_point(
        &self,
        metrics: &dyn FontMetrics,
        line: isize,
        column: isize,
    ) -> (Position, Point) {
        let last = self.lines.len() - 1;
        let mut line = line.clamp(0, last as isize) as usize;

        if column < 0 {
            if line > 0 {
                line -= 1;
                let end = self.lines[line].len();
                let x = self.lines[line].width();
                let y = self.vertical_offset(metrics, line, end);
                return (Position::new(line, end), Point::new(x, y));
            }
            let y = self.vertical_offset(metrics, 0, 0);
            return (Position::new(0, 0), Point::new(0.0, y));
        }

        let column = column as usize;
        if column > self.lines[line].len() {
            if line < last {
                line += 1;
                let y = self.vertical_offset(metrics, line, 0);
                return (Position::new(line, 0), Point::new(0.0, y));
            }
            let end = self.lines[line].len();
            let x = self.lines[line].width();
            let y = self.vertical_offset(metrics, line, end);
            return (Position::new(line, end), Point::new(x, y));
        }

        let x = self.lines[line].offset_of_column(metrics, column);
        let y = self.vertical_offset(metrics, line, column);
        (Position::new(line, column), Point::new(x, y))
    }

    /// Map a pixel point to the nearest logical position, returning the
    /// snapped pixel point alongside it (for caret placement).
    ///
    /// Walks the lines accumulating heights until the line containing `y`
    /// is found; points above/below the document clamp to the first/last
    /// line, and `x` snaps by the character-midpoint rule.
    pub fn point_to_position(
        &self,
        metrics: &dyn FontMetrics,
        point: Point,
    ) -> (Position, Point) {
        if point.y >= self.height {
            let line = self.lines.len() - 1;
            let column = self.lines[line].len();
            let x = self.lines[line].width();
            let y = self.height - self.lines[line].height()
                + self.lines[line].vertical_inset(metrics, column);
            return (Position::new(line, column), Point::new(x, y));
        }

        let mut line = 0;
        let mut roof = 0.0;
        if point.y > 0.0 {
            while line + 1 < self.lines.len() {
                let h = self.lines[line].height();
                if roof + h > point.y {
                    break;
                }
                roof += h;
                line += 1;
            }
        }

        let (column, x) = self.lines[line].column_at_offset(metrics, point.x);
        let y = roof + self.lines[line].vertical_inset(metrics, column);
        (Position::new(line, column), Point::new(x, y))
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    /// Walk every line top to bottom, emitting `(pen position, character)`
    /// pairs. Returns the widest line width (for scroll extents).
    pub fn draw<F: FnMut(Point, &StyledChar)>(
        &self,
        metrics: &dyn FontMetrics,
        origin: Point,
        emit: &mut F,
    ) -> f32 {
        let mut y = origin.y;
        let mut widest = 0.0_f32;
        for line in &self.lines {
            widest = widest.max(line.width());
            line.draw(metrics, Point::new(origin.x, y), emit);
            y += line.height();
        }
        widest
    }

    // ========================================================================
    // Clamping
    // ========================================================================

    /// Clamp a position into the document (line to the last line, column to
    /// the line's length)
    pub fn clamp_position(&self, pos: Position) -> Position {
        let line = pos.line.min(self.lines.len() - 1);
        Position::new(line, pos.column.min(self.lines[line].len()))
    }

    /// Clamp both ends of a span; clamping preserves their order
    fn clamp_span(&self, span: Span) -> (Position, Position) {
        (
            self.clamp_position(span.start),
            self.clamp_position(span.end),
        )
    }
}

/// Deep-copy a character range of `src` into a fresh line.
///
/// The new line is seeded with the height of the character at the range
/// start (or the last character when copying from the line's end), matching
/// the carriage-return split rule, so an empty copy still carries height.
fn copy_slice(metrics: &dyn FontMetrics, src: &Line, range: Range<usize>) -> Line {
    if src.is_empty() {
        return Line::with_height(src.height());
    }
    let start = range.start.min(src.len());
    let end = range.end.min(src.len());
    let seed = src.chars()[start.min(src.len() - 1)].height(metrics);
    let mut out = Line::with_height(seed);
    for ch in &src.chars()[start..end] {
        out.push_back(metrics, ch.clone());
    }
    out
}
