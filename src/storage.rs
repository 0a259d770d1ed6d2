//! Plain-text and XML persistence for documents
//!
//! Two round-trippable formats, selected by file extension:
//!
//! - **Plain text** (anything but `.xml`): one newline-terminated record per
//!   line. A trailing line terminator in the file becomes a trailing empty
//!   line in the document and vice versa. Every character receives the
//!   caller's default style on load.
//! - **XML** (`.xml`): one `<line height="..">` element per line; within a
//!   line, consecutive characters sharing a style are grouped into one
//!   `<font family size bold italic>` run.
//!
//! Load failures surface as [`FileOpenError`]; save failures as plain
//! `std::io::Error`. Malformed attribute *values* never fail - they fall
//! back to the defaults, in line with the core's degrade-don't-throw policy.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::debug;

use crate::document::Document;
use crate::line::Line;
use crate::metrics::FontMetrics;
use crate::style::{StyledChar, TextStyle};

/// Errors that can occur when loading a document from disk
#[derive(Debug, Clone)]
pub enum FileOpenError {
    /// File does not exist
    NotFound,
    /// Permission denied to read file
    PermissionDenied,
    /// Path is a directory, not a file
    IsDirectory,
    /// Structurally broken XML in a `.xml` file
    Malformed(String),
    /// Other I/O error
    IoError(String),
}

impl std::fmt::Display for FileOpenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "file not found"),
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::IsDirectory => write!(f, "is a directory"),
            Self::Malformed(msg) => write!(f, "malformed document: {}", msg),
            Self::IoError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for FileOpenError {}

impl FileOpenError {
    fn from_io(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::IoError(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    PlainText,
    Xml,
}

fn format_for(path: &Path) -> Format {
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("xml") => Format::Xml,
        _ => Format::PlainText,
    }
}

// ============================================================================
// Load
// ============================================================================

/// Load a document from `path`, giving plain-text content the supplied
/// default style. The format is chosen by the file extension.
pub fn load(
    path: &Path,
    metrics: &dyn FontMetrics,
    default_style: &TextStyle,
) -> Result<Document, FileOpenError> {
    if fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false) {
        return Err(FileOpenError::IsDirectory);
    }
    let format = format_for(path);
    let doc = match format {
        Format::PlainText => load_plain(path, metrics, default_style)?,
        Format::Xml => load_xml(path, metrics, default_style)?,
    };
    debug!(
        path = %path.display(),
        ?format,
        lines = doc.line_count(),
        "document loaded"
    );
    Ok(doc)
}

fn load_plain(
    path: &Path,
    metrics: &dyn FontMetrics,
    default_style: &TextStyle,
) -> Result<Document, FileOpenError> {
    let content = fs::read_to_string(path).map_err(FileOpenError::from_io)?;
    let height = metrics.line_height(default_style);

    let mut lines = Vec::new();
    // split('\n') yields a final "" for a trailing terminator, which becomes
    // the preserved trailing empty line
    for raw in content.split('\n') {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let mut line = Line::with_height(height);
        for ch in raw.chars() {
            line.push_back(metrics, StyledChar::new(ch, default_style.clone()));
        }
        lines.push(line);
    }
    Ok(Document::from_lines(lines))
}

fn load_xml(
    path: &Path,
    metrics: &dyn FontMetrics,
    default_style: &TextStyle,
) -> Result<Document, FileOpenError> {
    let content = fs::read(path).map_err(FileOpenError::from_io)?;
    let default_height = metrics.line_height(default_style);

    let mut reader = Reader::from_reader(content.as_slice());
    let mut buf = Vec::new();
    let mut lines: Vec<Line> = Vec::new();
    let mut current: Option<Line> = None;
    // Style of the run currently open; text outside <font> is ignored
    let mut run_style: Option<TextStyle> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"line" => {
                    current = Some(Line::with_height(line_height_attr(e, default_height)?));
                }
                b"font" => {
                    run_style = Some(font_style_attrs(e, default_style)?);
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"line" => {
                    lines.push(Line::with_height(line_height_attr(e, default_height)?));
                }
                _ => {}
            },
            Ok(Event::Text(ref t)) => {
                if let (Some(line), Some(style)) = (current.as_mut(), run_style.as_ref()) {
                    let text = t
                        .unescape()
                        .map_err(|e| FileOpenError::Malformed(e.to_string()))?;
                    for ch in text.chars() {
                        line.push_back(metrics, StyledChar::new(ch, style.clone()));
                    }
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"font" => run_style = None,
                b"line" => {
                    if let Some(line) = current.take() {
                        lines.push(line);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(FileOpenError::Malformed(e.to_string())),
        }
        buf.clear();
    }

    Ok(Document::from_lines(lines))
}

fn line_height_attr(e: &BytesStart<'_>, default_height: f32) -> Result<f32, FileOpenError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| FileOpenError::Malformed(e.to_string()))?;
        if attr.key.as_ref() == b"height" {
            let value = attr
                .unescape_value()
                .map_err(|e| FileOpenError::Malformed(e.to_string()))?;
            return Ok(value.parse().unwrap_or(default_height));
        }
    }
    Ok(default_height)
}

fn font_style_attrs(
    e: &BytesStart<'_>,
    default_style: &TextStyle,
) -> Result<TextStyle, FileOpenError> {
    let mut style = default_style.clone();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| FileOpenError::Malformed(e.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|e| FileOpenError::Malformed(e.to_string()))?;
        match attr.key.as_ref() {
            b"family" => style.family = value.into_owned(),
            b"size" => style.size = value.parse().unwrap_or(default_style.size),
            b"bold" => style.bold = value == "true",
            b"italic" => style.italic = value == "true",
            _ => {}
        }
    }
    Ok(style)
}

// ============================================================================
// Save
// ============================================================================

/// Save a document to `path`. The format is chosen by the file extension;
/// the plain-text form drops all styling, the XML form keeps it.
pub fn save(doc: &Document, path: &Path) -> io::Result<()> {
    let format = format_for(path);
    match format {
        Format::PlainText => save_plain(doc, path)?,
        Format::Xml => save_xml(doc, path)?,
    }
    debug!(
        path = %path.display(),
        ?format,
        lines = doc.line_count(),
        "document saved"
    );
    Ok(())
}

fn save_plain(doc: &Document, path: &Path) -> io::Result<()> {
    let mut out = String::new();
    let count = doc.line_count();
    for (i, line) in doc.lines().iter().enumerate() {
        for ch in line.chars() {
            out.push(ch.value());
        }
        // A trailing empty line renders as a final line terminator
        if i + 1 < count {
            out.push('\n');
        }
    }
    fs::write(path, out)
}

fn save_xml(doc: &Document, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = Writer::new(BufWriter::new(file));

    write_event(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_event(&mut writer, Event::Start(BytesStart::new("Text")))?;

    for line in doc.lines() {
        let mut el = BytesStart::new("line");
        let height = line.height().to_string();
        el.push_attribute(("height", height.as_str()));
        write_event(&mut writer, Event::Start(el))?;

        let chars = line.chars();
        let mut i = 0;
        while i < chars.len() {
            let style = chars[i].style();
            let mut run = String::new();
            let mut j = i;
            while j < chars.len() && chars[j].style() == style {
                run.push(chars[j].value());
                j += 1;
            }

            let mut font = BytesStart::new("font");
            let size = style.size.to_string();
            font.push_attribute(("family", style.family.as_str()));
            font.push_attribute(("size", size.as_str()));
            font.push_attribute(("bold", bool_attr(style.bold)));
            font.push_attribute(("italic", bool_attr(style.italic)));
            write_event(&mut writer, Event::Start(font))?;
            write_event(&mut writer, Event::Text(BytesText::new(&run)))?;
            write_event(&mut writer, Event::End(BytesEnd::new("font")))?;
            i = j;
        }

        write_event(&mut writer, Event::End(BytesEnd::new("line")))?;
    }

    write_event(&mut writer, Event::End(BytesEnd::new("Text")))?;
    // Flush the buffer explicitly so write failures surface instead of
    // being dropped with the writer
    writer.into_inner().flush()?;
    Ok(())
}

fn write_event<W: io::Write>(writer: &mut Writer<W>, event: Event<'_>) -> io::Result<()> {
    writer
        .write_event(event)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
}

fn bool_attr(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
