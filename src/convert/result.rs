//! Conversion result with statistics.

use crate::detect::SourceFormat;
use serde::{Deserialize, Serialize};

/// Result of a conversion, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertResult {
    /// The converted content
    pub content: String,

    /// Format the content was converted from
    pub source: SourceFormat,

    /// Format of `content`
    pub target: SourceFormat,

    /// Conversion statistics (zeroed unless collected)
    pub stats: ConversionStats,
}

impl ConvertResult {
    /// Create a new conversion result.
    pub fn new(content: String, source: SourceFormat, stats: ConversionStats) -> Self {
        Self {
            content,
            source,
            target: source.target(),
            stats,
        }
    }

    /// MIME type of the converted content.
    pub fn mime_type(&self) -> &'static str {
        self.target.mime_type()
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Statistics collected during a conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// HTML tables carried through verbatim
    pub tables_preserved: u32,

    /// Fenced code blocks
    pub code_blocks: u32,

    /// Inline code spans
    pub inline_code_spans: u32,

    /// Headings rewritten
    pub headings: u32,

    /// List items rewritten
    pub list_items: u32,

    /// Paragraphs emitted (Markdown → HTML only)
    pub paragraphs: u32,

    /// Links rewritten
    pub links: u32,

    /// Images rewritten
    pub images: u32,

    /// Approximate word count of the output (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count of the output (excluding whitespace)
    pub char_count: u32,
}

impl ConversionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ConversionStats) {
        self.tables_preserved += other.tables_preserved;
        self.code_blocks += other.code_blocks;
        self.inline_code_spans += other.inline_code_spans;
        self.headings += other.headings;
        self.list_items += other.list_items;
        self.paragraphs += other.paragraphs;
        self.links += other.links;
        self.images += other.images;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}
