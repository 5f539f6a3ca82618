//! Markdown → HTML conversion.
//!
//! Raw table islands and code are protected first, inline and line-anchored
//! Markdown is rewritten with regexes, then two line scanners build list
//! containers and paragraphs before the protected fragments go back in.

use regex::{Captures, Regex};

use super::blocks::{assemble_lists, assemble_paragraphs};
use super::code::{self, CodeBody};
use super::options::HtmlOptions;
use super::result::ConversionStats;
use crate::fragment::{FragmentTable, PlaceholderStyle};
use crate::patterns::{self, CODE_BLOCK_KIND, INLINE_CODE_KIND, TABLE_KIND};

/// Markdown → HTML pipeline with its patterns compiled once.
#[derive(Debug, Clone)]
pub struct HtmlConverter {
    options: HtmlOptions,
    table: Regex,
    heading: Regex,
    strong_em: Regex,
    strong: Regex,
    em: Regex,
    image: Regex,
    link: Regex,
    rule: Regex,
    ordered_marker: Regex,
    blockquote: Regex,
}

impl HtmlConverter {
    /// Create a converter with the given options.
    pub fn new(options: HtmlOptions) -> Self {
        Self {
            options,
            table: patterns::table(),
            heading: Regex::new(r"(?m)^(#{1,6}) (.+)$").unwrap(),
            strong_em: Regex::new(r"\*\*\*([^\s*].*?)\*\*\*").unwrap(),
            strong: Regex::new(r"\*\*([^\s*].*?)\*\*").unwrap(),
            em: Regex::new(r"\*([^\s*].*?)\*").unwrap(),
            image: Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap(),
            link: Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap(),
            rule: Regex::new(r"(?m)^---+$").unwrap(),
            ordered_marker: Regex::new(r"^\d+\. ").unwrap(),
            blockquote: Regex::new(r"(?m)^> (.+)$").unwrap(),
        }
    }

    /// Options this converter was built with.
    pub fn options(&self) -> &HtmlOptions {
        &self.options
    }

    /// Convert a Markdown document to HTML.
    pub fn convert(&self, markdown: &str) -> String {
        let mut stats = ConversionStats::new();
        self.run(markdown, &mut stats)
    }

    /// Convert a Markdown document to HTML and report what was rewritten.
    pub fn convert_with_stats(&self, markdown: &str) -> (String, ConversionStats) {
        let mut stats = ConversionStats::new();
        let html = self.run(markdown, &mut stats);
        stats.count_text(&html);
        (html, stats)
    }

    fn run(&self, markdown: &str, stats: &mut ConversionStats) -> String {
        if markdown.is_empty() {
            return String::new();
        }

        let mut tables = FragmentTable::new(TABLE_KIND, PlaceholderStyle::Tag);
        let mut blocks: FragmentTable<CodeBody> =
            FragmentTable::new(CODE_BLOCK_KIND, PlaceholderStyle::Tag);
        let mut spans: FragmentTable<CodeBody> =
            FragmentTable::new(INLINE_CODE_KIND, PlaceholderStyle::Bare);

        let mut text = if self.options.preserve_tables {
            tables.extract(markdown, &self.table)
        } else {
            markdown.to_string()
        };

        blocks.check_collision(&text);
        text = code::replace_fences(&text, |body| blocks.push(body));
        spans.check_collision(&text);
        text = code::replace_spans(&text, |body| spans.push(body));

        text = self.rewrite_headings(&text, stats);
        text = self.rewrite_emphasis(&text);
        text = self.rewrite_images_and_links(&text, stats);
        text = self.rule.replace_all(&text, "<hr />").into_owned();

        let (listed, items) = assemble_lists(&text, &self.ordered_marker);
        stats.list_items += items;
        text = listed;

        text = self
            .blockquote
            .replace_all(&text, "<blockquote>${1}</blockquote>")
            .into_owned();

        if self.options.wrap_paragraphs {
            let (wrapped, paragraphs) = assemble_paragraphs(&text);
            stats.paragraphs += paragraphs;
            text = wrapped;
        }

        // Tables were carved out first, so code may hold table tokens that
        // have to go back in before the body is escaped.
        let with_tables = |code: &CodeBody| code.with_text(tables.restore(&code.text));
        let with_language = self.options.code_language;
        text = blocks.restore_with(&text, |code| with_tables(code).to_pre_html(with_language));
        text = spans.restore_with(&text, |code| with_tables(code).to_inline_html());
        text = tables.restore(&text);

        tables.warn_dangling(&text);
        blocks.warn_dangling(&text);
        spans.warn_dangling(&text);

        stats.tables_preserved += tables.len() as u32;
        stats.code_blocks += blocks.len() as u32;
        stats.inline_code_spans += spans.len() as u32;
        log::debug!(
            "markdown->html: {} tables, {} code blocks, {} inline spans preserved",
            tables.len(),
            blocks.len(),
            spans.len()
        );

        text
    }

    fn rewrite_headings(&self, text: &str, stats: &mut ConversionStats) -> String {
        self.heading
            .replace_all(text, |caps: &Captures| {
                stats.headings += 1;
                let level = caps[1].len();
                format!("<h{0}>{1}</h{0}>", level, &caps[2])
            })
            .into_owned()
    }

    /// Longest marker first, so `***` is never read as `**` plus `*`.
    fn rewrite_emphasis(&self, text: &str) -> String {
        let text = self
            .strong_em
            .replace_all(text, "<strong><em>${1}</em></strong>");
        let text = self.strong.replace_all(&text, "<strong>${1}</strong>");
        self.em.replace_all(&text, "<em>${1}</em>").into_owned()
    }

    /// Images first: image syntax is link syntax with a leading `!`.
    fn rewrite_images_and_links(&self, text: &str, stats: &mut ConversionStats) -> String {
        let text = self.image.replace_all(text, |caps: &Captures| {
            stats.images += 1;
            format!("<img src=\"{}\" alt=\"{}\" />", &caps[2], &caps[1])
        });
        self.link
            .replace_all(&text, |caps: &Captures| {
                stats.links += 1;
                format!("<a href=\"{}\">{}</a>", &caps[2], &caps[1])
            })
            .into_owned()
    }
}

impl Default for HtmlConverter {
    fn default() -> Self {
        Self::new(HtmlOptions::default())
    }
}
