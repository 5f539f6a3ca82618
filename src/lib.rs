//! # canvasmark
//!
//! Structure-preserving conversion between the HTML dialect a learning
//! management system's rich-text editor produces and Markdown with embedded
//! raw-HTML islands.
//!
//! Markdown tables cannot express captions, scoped header cells, or
//! `thead`/`tbody` grouping, so HTML tables are carried through both
//! directions byte-for-byte. Everything else in the editor's small tag
//! vocabulary is rewritten to readable Markdown and back.
//!
//! ## Quick Start
//!
//! ```
//! use canvasmark::{html_to_markdown, markdown_to_html};
//!
//! let html = r#"<p>Intro</p><table><tr><th scope="col">H</th></tr></table><p>End</p>"#;
//! let md = html_to_markdown(html);
//! assert!(md.contains(r#"<th scope="col">H</th>"#));
//!
//! let back = markdown_to_html(&md);
//! assert!(back.contains(r#"<table><tr><th scope="col">H</th></tr></table>"#));
//! ```
//!
//! ## Features
//!
//! - **Two pure functions**: no I/O, no shared state, safe to call from any thread
//! - **Protected fragments**: tables and code are never touched by the rewrites
//! - **Best effort**: malformed markup never fails, it converts as far as it can
//! - **File helpers**: read a file, detect its direction, convert, collect stats

pub mod convert;
pub mod detect;
pub mod error;
pub mod fragment;
pub mod patterns;

// Re-export commonly used types
pub use convert::{
    convert_bytes, convert_file, convert_str, html_to_markdown, html_to_markdown_with_options,
    html_to_markdown_with_stats, markdown_to_html, markdown_to_html_with_options,
    markdown_to_html_with_stats, ConversionStats, ConvertOptions, ConvertResult, HtmlConverter,
    HtmlOptions, MarkdownConverter, MarkdownOptions,
};
pub use detect::{
    detect_format_from_path, detect_format_from_str, format_from_extension, SourceFormat,
};
pub use error::{Error, Result};
pub use fragment::{FragmentTable, PlaceholderStyle};
