//! Styled character unit - a character value paired with a font style descriptor
//!
//! `StyledChar` is the atom of the document model. Its pixel width and height
//! are never stored; they are derived on demand from a [`FontMetrics`]
//! provider, keyed by the style and character value.

use crate::metrics::FontMetrics;

/// Font style descriptor for a single character: family, point size, and
/// the bold/italic flags.
///
/// Styles are plain data and are not validated here; an unknown family or an
/// odd size is passed through to the metrics provider as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Font family name (e.g. "Monospace", "JetBrains Mono")
    pub family: String,
    /// Point size in pixels
    pub size: f32,
    /// Bold weight
    pub bold: bool,
    /// Italic slant
    pub italic: bool,
}

impl TextStyle {
    /// Create a regular (non-bold, non-italic) style
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
            italic: false,
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new("Monospace", 14.0)
    }
}

/// A single display character with its style.
///
/// Immutable once constructed: edits replace the whole unit via
/// [`with_style`](Self::with_style) / [`with_value`](Self::with_value).
#[derive(Debug, Clone, PartialEq)]
pub struct StyledChar {
    value: char,
    style: TextStyle,
}

impl StyledChar {
    /// Create a styled character
    pub fn new(value: char, style: TextStyle) -> Self {
        Self { value, style }
    }

    /// The character value
    pub fn value(&self) -> char {
        self.value
    }

    /// The style descriptor
    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    /// Same value, different style
    pub fn with_style(&self, style: TextStyle) -> Self {
        Self {
            value: self.value,
            style,
        }
    }

    /// Same style, different value
    pub fn with_value(&self, value: char) -> Self {
        Self {
            value,
            style: self.style.clone(),
        }
    }

    /// Horizontal advance of this character in pixels
    pub fn width(&self, metrics: &dyn FontMetrics) -> f32 {
        metrics.char_width(&self.style, self.value)
    }

    /// Line height this character demands, in pixels
    pub fn height(&self, metrics: &dyn FontMetrics) -> f32 {
        metrics.line_height(&self.style)
    }
}
