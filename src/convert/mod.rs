//! The two conversion directions and the helpers in front of them.
//!
//! Both directions are total: any input string produces an output string,
//! and malformed markup degrades to best-effort conversion instead of an
//! error. Only the file and byte helpers can fail, and only for I/O,
//! encoding, or detection reasons.
//!
//! # Example
//!
//! ```
//! use canvasmark::convert::{html_to_markdown, markdown_to_html};
//!
//! let md = html_to_markdown("<h1>Week 1</h1><p>Read <strong>chapter 2</strong>.</p>");
//! assert_eq!(md, "# Week 1\nRead **chapter 2**.");
//!
//! let html = markdown_to_html(&md);
//! assert_eq!(html, "<h1>Week 1</h1>\n<p>Read <strong>chapter 2</strong>.</p>");
//! ```

mod blocks;
mod code;
mod html_to_markdown;
mod markdown_to_html;
mod options;
mod result;
mod whitespace;

pub use blocks::{
    assemble_lists, assemble_paragraphs, ListAssembler, ListState, ParagraphAssembler,
};
pub use code::CodeBody;
pub use html_to_markdown::MarkdownConverter;
pub use markdown_to_html::HtmlConverter;
pub use options::{ConvertOptions, HtmlOptions, MarkdownOptions};
pub use result::{ConversionStats, ConvertResult};
pub use whitespace::WhitespaceNormalizer;

use crate::detect::{self, SourceFormat};
use crate::error::Result;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

fn default_markdown_converter() -> &'static MarkdownConverter {
    static CONVERTER: OnceLock<MarkdownConverter> = OnceLock::new();
    CONVERTER.get_or_init(MarkdownConverter::default)
}

fn default_html_converter() -> &'static HtmlConverter {
    static CONVERTER: OnceLock<HtmlConverter> = OnceLock::new();
    CONVERTER.get_or_init(HtmlConverter::default)
}

/// Convert an LMS HTML snippet to Markdown.
///
/// Tables come through verbatim as raw-HTML islands separated by blank
/// lines. Empty input yields empty output.
pub fn html_to_markdown(html: &str) -> String {
    default_markdown_converter().convert(html)
}

/// Convert HTML to Markdown with custom options.
pub fn html_to_markdown_with_options(html: &str, options: &MarkdownOptions) -> String {
    MarkdownConverter::new(options.clone()).convert(html)
}

/// Convert HTML to Markdown and collect statistics.
pub fn html_to_markdown_with_stats(html: &str, options: &MarkdownOptions) -> ConvertResult {
    let (content, stats) = MarkdownConverter::new(options.clone()).convert_with_stats(html);
    ConvertResult::new(content, SourceFormat::Html, stats)
}

/// Convert Markdown (with raw table islands) back to LMS HTML.
///
/// Table islands are restored byte-for-byte. Empty input yields empty
/// output.
pub fn markdown_to_html(markdown: &str) -> String {
    default_html_converter().convert(markdown)
}

/// Convert Markdown to HTML with custom options.
pub fn markdown_to_html_with_options(markdown: &str, options: &HtmlOptions) -> String {
    HtmlConverter::new(options.clone()).convert(markdown)
}

/// Convert Markdown to HTML and collect statistics.
pub fn markdown_to_html_with_stats(markdown: &str, options: &HtmlOptions) -> ConvertResult {
    let (content, stats) = HtmlConverter::new(options.clone()).convert_with_stats(markdown);
    ConvertResult::new(content, SourceFormat::Markdown, stats)
}

/// Convert a document body whose format is known.
pub fn convert_str(text: &str, source: SourceFormat, options: &ConvertOptions) -> ConvertResult {
    match (source, options.collect_stats) {
        (SourceFormat::Html, true) => html_to_markdown_with_stats(text, &options.markdown),
        (SourceFormat::Markdown, true) => markdown_to_html_with_stats(text, &options.html),
        (SourceFormat::Html, false) => ConvertResult::new(
            html_to_markdown_with_options(text, &options.markdown),
            source,
            ConversionStats::default(),
        ),
        (SourceFormat::Markdown, false) => ConvertResult::new(
            markdown_to_html_with_options(text, &options.html),
            source,
            ConversionStats::default(),
        ),
    }
}

/// Convert UTF-8 bytes. The source format comes from `options.source` or is
/// detected from the content.
pub fn convert_bytes(bytes: &[u8], options: &ConvertOptions) -> Result<ConvertResult> {
    let text = std::str::from_utf8(bytes)?;
    let source = match options.source {
        Some(source) => source,
        None => detect::detect_format_from_str(text)?,
    };
    Ok(convert_str(text, source, options))
}

/// Read and convert a file. The source format comes from `options.source`,
/// the file extension, or the content, in that order.
pub fn convert_file<P: AsRef<Path>>(path: P, options: &ConvertOptions) -> Result<ConvertResult> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let text = String::from_utf8(bytes)?;
    let source = match options.source.or_else(|| detect::format_from_extension(path)) {
        Some(source) => source,
        None => detect::detect_format_from_str(&text)?,
    };
    log::debug!("converting {} from {}", path.display(), source);
    Ok(convert_str(&text, source, options))
}
