//! Source format detection.
//!
//! Decides which direction a conversion should run: HTML bodies go to
//! Markdown, Markdown documents go back to HTML.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Format of a document body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// LMS rich-text HTML
    Html,
    /// Markdown with raw-HTML islands
    Markdown,
}

impl SourceFormat {
    /// The format a document of this format converts into.
    pub fn target(self) -> SourceFormat {
        match self {
            SourceFormat::Html => SourceFormat::Markdown,
            SourceFormat::Markdown => SourceFormat::Html,
        }
    }

    /// MIME type for this format.
    pub fn mime_type(self) -> &'static str {
        match self {
            SourceFormat::Html => "text/html",
            SourceFormat::Markdown => "text/markdown",
        }
    }

    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            SourceFormat::Html => "html",
            SourceFormat::Markdown => "md",
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Html => write!(f, "HTML"),
            SourceFormat::Markdown => write!(f, "Markdown"),
        }
    }
}

/// Opening tags that mark a body as HTML when they lead the text.
const HTML_LEADING_TAGS: &[&str] = &[
    "!doctype", "html", "body", "p", "div", "span", "h1", "h2", "h3", "h4", "h5", "h6", "ul",
    "ol", "blockquote", "pre", "section", "article",
];

fn leading_tag_regex() -> &'static Regex {
    static LEADING_TAG: OnceLock<Regex> = OnceLock::new();
    LEADING_TAG.get_or_init(|| Regex::new(r"^<(!?[A-Za-z][A-Za-z0-9]*)").unwrap())
}

/// Format implied by a file extension, if any.
pub fn format_from_extension<P: AsRef<Path>>(path: P) -> Option<SourceFormat> {
    let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "html" | "htm" | "xhtml" => Some(SourceFormat::Html),
        "md" | "markdown" | "mdown" | "mkd" => Some(SourceFormat::Markdown),
        _ => None,
    }
}

/// Detect the format of a file from its extension, falling back to its
/// content.
///
/// # Example
/// ```no_run
/// use canvasmark::detect::{detect_format_from_path, SourceFormat};
///
/// let format = detect_format_from_path("page.html").unwrap();
/// assert_eq!(format, SourceFormat::Html);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<SourceFormat> {
    if let Some(format) = format_from_extension(&path) {
        return Ok(format);
    }
    let content = fs::read_to_string(path)?;
    detect_format_from_str(&content)
}

/// Detect the format of a document body from its content.
///
/// A body whose first non-whitespace token is a known block-level HTML tag
/// is HTML; any other non-empty body is Markdown.
pub fn detect_format_from_str(text: &str) -> Result<SourceFormat> {
    let trimmed = text.trim_start();
    if trimmed.is_empty() {
        return Err(Error::UnknownFormat);
    }

    let is_html = leading_tag_regex()
        .captures(trimmed)
        .map(|caps| {
            let name = caps[1].to_ascii_lowercase();
            HTML_LEADING_TAGS.contains(&name.as_str())
        })
        .unwrap_or(false);

    if is_html {
        Ok(SourceFormat::Html)
    } else {
        Ok(SourceFormat::Markdown)
    }
}

/// Check if a document body looks like HTML.
pub fn is_html(text: &str) -> bool {
    matches!(detect_format_from_str(text), Ok(SourceFormat::Html))
}
