//! Logical positions, pixel points, and selection spans
//!
//! Two coordinate systems run through the document core: logical positions
//! (line index + column index) and pixel points (x/y offsets from the
//! document's top-left corner). Conversions between the two live on
//! [`Document`](crate::Document); this module holds the plain value types.

/// A logical position in the document (line and column)
///
/// `column` may equal the line's length, meaning "after the last character".
/// Ordering is document order: line first, then column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number (0-indexed)
    pub column: usize,
}

impl Position {
    /// Create a new position
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A pixel point relative to the document's top-left corner
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An ordered pair of positions delimiting a selection
///
/// `start <= end` always holds; use [`Span::ordered`] to normalize two
/// arbitrary positions (e.g. a selection anchor and head).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    /// First position of the span (inclusive)
    pub start: Position,
    /// Last position of the span (exclusive)
    pub end: Position,
}

impl Span {
    /// Build a span from two positions in either order
    pub fn ordered(a: Position, b: Position) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Whether the span covers no characters
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
