//! Font metrics providers
//!
//! The document model never stores pixel dimensions; every width and height
//! flows through the [`FontMetrics`] trait. Rendering applications plug in
//! [`FontdueMetrics`] backed by real font files; headless code and tests use
//! [`FixedMetrics`] or [`ProportionalMetrics`] for deterministic numbers.

use std::cell::RefCell;
use std::collections::HashMap;

use fontdue::{Font, FontSettings};

use crate::style::TextStyle;

/// Source of character advance widths and line heights.
///
/// Implementations are treated as pure functions of `(style, char)`: the
/// cached metrics in [`Line`](crate::Line) and [`Document`](crate::Document)
/// are only valid while the provider keeps answering consistently.
pub trait FontMetrics {
    /// Horizontal advance of `ch` rendered in `style`, in pixels
    fn char_width(&self, style: &TextStyle, ch: char) -> f32;

    /// Line height demanded by `style`, in pixels
    fn line_height(&self, style: &TextStyle) -> f32;
}

// ============================================================================
// Deterministic providers (headless / tests)
// ============================================================================

/// Uniform metrics: every character has the same advance and line height,
/// regardless of style. Useful for tests and terminal-like layouts.
#[derive(Debug, Clone, Copy)]
pub struct FixedMetrics {
    char_width: f32,
    line_height: f32,
}

impl FixedMetrics {
    /// Create a provider returning `char_width` / `line_height` for everything
    pub const fn new(char_width: f32, line_height: f32) -> Self {
        Self {
            char_width,
            line_height,
        }
    }
}

impl FontMetrics for FixedMetrics {
    fn char_width(&self, _style: &TextStyle, _ch: char) -> f32 {
        self.char_width
    }

    fn line_height(&self, _style: &TextStyle) -> f32 {
        self.line_height
    }
}

/// Metrics that scale linearly with the style's point size.
///
/// Exercises mixed-size layout (tall lines, vertical insets) without loading
/// a font: a character of size `s` is `s * width_per_pt` wide and demands a
/// line height of `s * height_per_pt`.
#[derive(Debug, Clone, Copy)]
pub struct ProportionalMetrics {
    width_per_pt: f32,
    height_per_pt: f32,
}

impl ProportionalMetrics {
    pub const fn new(width_per_pt: f32, height_per_pt: f32) -> Self {
        Self {
            width_per_pt,
            height_per_pt,
        }
    }
}

impl FontMetrics for ProportionalMetrics {
    fn char_width(&self, style: &TextStyle, _ch: char) -> f32 {
        style.size * self.width_per_pt
    }

    fn line_height(&self, style: &TextStyle) -> f32 {
        style.size * self.height_per_pt
    }
}

// ============================================================================
// Fontdue-backed provider
// ============================================================================

/// Error loading font data into [`FontdueMetrics`]
#[derive(Debug, Clone)]
pub struct FontLoadError(pub &'static str);

impl std::fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to load font: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FontKey {
    family: String,
    bold: bool,
    italic: bool,
}

impl FontKey {
    fn of(style: &TextStyle) -> Self {
        Self {
            family: style.family.clone(),
            bold: style.bold,
            italic: style.italic,
        }
    }
}

/// Real font metrics backed by `fontdue`.
///
/// The caller registers one font per (family, bold, italic) combination from
/// raw font bytes; lookups fall back to the family's regular face, then to
/// the fallback font the provider was constructed with. Advance widths are
/// memoized per (face, char, size).
pub struct FontdueMetrics {
    fonts: HashMap<FontKey, Font>,
    fallback: Font,
    // Advance cache keyed by face + char + size bits. Single-threaded by
    // design (the document core has no concurrent callers).
    advance_cache: RefCell<HashMap<(FontKey, char, u32), f32>>,
}

impl FontdueMetrics {
    /// Create a provider from fallback font bytes (e.g. an embedded TTF)
    pub fn new(fallback_font: &[u8]) -> Result<Self, FontLoadError> {
        let fallback =
            Font::from_bytes(fallback_font, FontSettings::default()).map_err(FontLoadError)?;
        Ok(Self {
            fonts: HashMap::new(),
            fallback,
            advance_cache: RefCell::new(HashMap::new()),
        })
    }

    /// Register a face for a (family, bold, italic) combination
    pub fn register(
        &mut self,
        family: &str,
        bold: bool,
        italic: bool,
        font_data: &[u8],
    ) -> Result<(), FontLoadError> {
        let font = Font::from_bytes(font_data, FontSettings::default()).map_err(FontLoadError)?;
        self.fonts.insert(
            FontKey {
                family: family.to_string(),
                bold,
                italic,
            },
            font,
        );
        // Registered faces may change any previously measured advance
        self.advance_cache.borrow_mut().clear();
        Ok(())
    }

    fn font_for(&self, style: &TextStyle) -> &Font {
        if let Some(font) = self.fonts.get(&FontKey::of(style)) {
            return font;
        }
        // No exact face: try the family's regular face before the fallback
        let regular = FontKey {
            family: style.family.clone(),
            bold: false,
            italic: false,
        };
        self.fonts.get(&regular).unwrap_or(&self.fallback)
    }
}

impl FontMetrics for FontdueMetrics {
    fn char_width(&self, style: &TextStyle, ch: char) -> f32 {
        let key = (FontKey::of(style), ch, style.size.to_bits());
        if let Some(&advance) = self.advance_cache.borrow().get(&key) {
            return advance;
        }
        let advance = self.font_for(style).metrics(ch, style.size).advance_width;
        self.advance_cache.borrow_mut().insert(key, advance);
        advance
    }

    fn line_height(&self, style: &TextStyle) -> f32 {
        self.font_for(style)
            .horizontal_line_metrics(style.size)
            .map(|m| m.new_line_size)
            .unwrap_or(style.size)
    }
}
