//! Scribe - styled-text document model for desktop editors
//!
//! This crate provides the document/layout core of a rich text editor: lines
//! of styled characters with cached pixel metrics, multi-line range editing
//! (copy/cut/paste/delete), and bidirectional mapping between logical
//! positions and pixel coordinates. The window shell, caret renderer, and
//! event dispatch are external collaborators; they drive the core through
//! [`Document`] methods and receive positions and pixel points back.

pub mod document;
pub mod geometry;
pub mod line;
pub mod metrics;
pub mod storage;
pub mod style;

// Re-export commonly used types
pub use document::Document;
pub use geometry::{Point, Position, Span};
pub use line::Line;
pub use metrics::{FixedMetrics, FontLoadError, FontMetrics, FontdueMetrics, ProportionalMetrics};
pub use storage::{load, save, FileOpenError};
pub use style::{StyledChar, TextStyle};
