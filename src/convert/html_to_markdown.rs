//! HTML → Markdown conversion.
//!
//! A fixed sequence of regex rewrites over one buffer. Tables and code are
//! carved out first and restored last, so none of the tag rewrites or the
//! whitespace collapse ever touch them.

use html_escape::decode_html_entities;
use regex::{Captures, Regex};

use super::code::CodeBody;
use super::options::{valid_list_marker, MarkdownOptions};
use super::result::ConversionStats;
use super::whitespace::WhitespaceNormalizer;
use crate::fragment::{FragmentTable, PlaceholderStyle};
use crate::patterns::{self, CODE_BLOCK_KIND, INLINE_CODE_KIND, TABLE_KIND};

const ESCAPED_LT: &str = "\u{0000}LT\u{0000}";
const ESCAPED_GT: &str = "\u{0000}GT\u{0000}";

/// HTML → Markdown pipeline with its patterns compiled once.
#[derive(Debug, Clone)]
pub struct MarkdownConverter {
    options: MarkdownOptions,
    table: Regex,
    pre_code: Regex,
    pre: Regex,
    inline_code: Regex,
    escaped_lt: Regex,
    escaped_gt: Regex,
    style: Regex,
    script: Regex,
    headings: Vec<Regex>,
    strong: Regex,
    bold: Regex,
    em: Regex,
    italic: Regex,
    anchor: Regex,
    image: Regex,
    list_open: Regex,
    list_close: Regex,
    list_item: Regex,
    list_marker: char,
    blockquote: Regex,
    rule: Regex,
    paragraph: Regex,
    line_break: Regex,
    div: Regex,
    span: Regex,
    any_tag: Regex,
    whitespace: WhitespaceNormalizer,
}

impl MarkdownConverter {
    /// Create a converter with the given options.
    pub fn new(options: MarkdownOptions) -> Self {
        let whitespace = WhitespaceNormalizer::new(options.max_consecutive_newlines);
        let list_marker = valid_list_marker(options.list_marker);
        if list_marker != options.list_marker {
            log::warn!("unsupported list marker {:?}, using '-'", options.list_marker);
        }
        Self {
            options,
            table: patterns::table(),
            pre_code: Regex::new(
                r"(?is)<pre\b([^>]*)>\s*<code\b([^>]*)>(.*?)</code\s*>\s*</pre\s*>",
            )
            .unwrap(),
            pre: patterns::paired_with_attrs("pre"),
            inline_code: patterns::paired_with_attrs("code"),
            escaped_lt: Regex::new(r"(?i)&(?:lt|#0*60|#x0*3c);").unwrap(),
            escaped_gt: Regex::new(r"(?i)&(?:gt|#0*62|#x0*3e);").unwrap(),
            style: patterns::paired("style"),
            script: patterns::paired("script"),
            headings: (1..=6).map(|level| patterns::paired(&format!("h{}", level))).collect(),
            strong: patterns::paired("strong"),
            bold: patterns::paired("b"),
            em: patterns::paired("em"),
            italic: patterns::paired("i"),
            anchor: patterns::paired_with_attrs("a"),
            image: patterns::void("img"),
            list_open: Regex::new(r"(?i)<(?:ul|ol)\b[^>]*>").unwrap(),
            list_close: Regex::new(r"(?i)</(?:ul|ol)\s*>").unwrap(),
            list_item: Regex::new(r"(?is)[ \t]*<li\b[^>]*>(.*?)</li\s*>[ \t]*\n?").unwrap(),
            list_marker,
            blockquote: patterns::paired("blockquote"),
            rule: patterns::void("hr"),
            paragraph: patterns::paired("p"),
            line_break: patterns::void("br"),
            div: patterns::paired("div"),
            span: patterns::paired("span"),
            any_tag: patterns::any_tag(),
            whitespace,
        }
    }

    /// Options this converter was built with.
    pub fn options(&self) -> &MarkdownOptions {
        &self.options
    }

    /// Convert an HTML snippet to Markdown.
    pub fn convert(&self, html: &str) -> String {
        let mut stats = ConversionStats::new();
        self.run(html, &mut stats)
    }

    /// Convert an HTML snippet to Markdown and report what was rewritten.
    pub fn convert_with_stats(&self, html: &str) -> (String, ConversionStats) {
        let mut stats = ConversionStats::new();
        let markdown = self.run(html, &mut stats);
        stats.count_text(&markdown);
        (markdown, stats)
    }

    fn run(&self, html: &str, stats: &mut ConversionStats) -> String {
        if html.is_empty() {
            return String::new();
        }

        let mut tables = FragmentTable::new(TABLE_KIND, PlaceholderStyle::Bare);
        let mut blocks: FragmentTable<CodeBody> =
            FragmentTable::new(CODE_BLOCK_KIND, PlaceholderStyle::Bare);
        let mut spans: FragmentTable<CodeBody> =
            FragmentTable::new(INLINE_CODE_KIND, PlaceholderStyle::Bare);

        let mut text = if self.options.preserve_tables {
            tables.extract(html, &self.table)
        } else {
            html.to_string()
        };
        text = self.extract_code(&text, &mut blocks, &mut spans);

        text = self.decode_entities(&text);
        text = self.remove_style_and_script(&text);
        text = self.rewrite_headings(&text, stats);
        text = self.rewrite_emphasis(&text);
        text = self.rewrite_links(&text, stats);
        text = self.rewrite_images(&text, stats);
        text = self.rewrite_lists(&text, stats);
        text = self.rewrite_blockquotes(&text);
        text = self.rewrite_rules(&text);
        text = self.rewrite_paragraphs(&text);
        text = self.unwrap_containers(&text);
        text = self.any_tag.replace_all(&text, "").into_owned();
        text = text.replace(ESCAPED_LT, "&lt;").replace(ESCAPED_GT, "&gt;");
        text = self.whitespace.normalize(&text);

        // Raw tables inside code go back into the body, not around it.
        let with_tables = |code: &CodeBody| code.with_text(tables.restore(&code.text));
        text = spans.restore_with(&text, |code| with_tables(code).to_inline_markdown());
        text = blocks.restore_with(&text, |code| {
            format!("\n\n{}\n\n", with_tables(code).to_fence())
        });
        text = tables.restore_with(&text, |table| format!("\n\n{}\n\n", table));
        text = self.whitespace.collapse_newlines(&text);

        tables.warn_dangling(&text);
        blocks.warn_dangling(&text);
        spans.warn_dangling(&text);

        stats.tables_preserved += tables.len() as u32;
        stats.code_blocks += blocks.len() as u32;
        stats.inline_code_spans += spans.len() as u32;
        log::debug!(
            "html->markdown: {} tables, {} code blocks, {} inline spans preserved",
            tables.len(),
            blocks.len(),
            spans.len()
        );

        text.trim().to_string()
    }

    /// Pull `<pre>` blocks and inline `<code>` out of the buffer.
    ///
    /// Bodies lose any nested markup (highlighter spans) and have their
    /// entities decoded here, since the buffer-wide decode never sees them.
    fn extract_code(
        &self,
        text: &str,
        blocks: &mut FragmentTable<CodeBody>,
        spans: &mut FragmentTable<CodeBody>,
    ) -> String {
        let with_language = self.options.code_language;
        let text = blocks.extract_with(text, &self.pre_code, |caps| {
            let language = patterns::code_language(&caps[2])
                .or_else(|| patterns::code_language(&caps[1]))
                .filter(|_| with_language);
            CodeBody::new(language, self.code_text(&caps[3]))
        });
        let text = blocks.extract_with(&text, &self.pre, |caps| {
            let language = patterns::code_language(&caps[1]).filter(|_| with_language);
            CodeBody::new(language, self.code_text(&caps[2]))
        });
        spans.extract_with(&text, &self.inline_code, |caps| {
            CodeBody::new(None, self.code_text(&caps[2]))
        })
    }

    fn code_text(&self, raw: &str) -> String {
        let text = self.line_break.replace_all(raw, "\n");
        let text = self.any_tag.replace_all(&text, "");
        let text = decode_html_entities(&text).into_owned();
        text.trim_matches('\n').to_string()
    }

    /// Decode entities. Escaped angle brackets stay inert through every tag
    /// rewrite and come back escaped, so they never turn into markup.
    fn decode_entities(&self, text: &str) -> String {
        let text = self.escaped_lt.replace_all(text, ESCAPED_LT);
        let text = self.escaped_gt.replace_all(&text, ESCAPED_GT);
        decode_html_entities(&text).into_owned()
    }

    fn remove_style_and_script(&self, text: &str) -> String {
        let text = self.style.replace_all(text, "");
        self.script.replace_all(&text, "").into_owned()
    }

    fn rewrite_headings(&self, text: &str, stats: &mut ConversionStats) -> String {
        let mut result = text.to_string();
        for (index, heading) in self.headings.iter().enumerate() {
            let marker = "#".repeat(index + 1);
            result = heading
                .replace_all(&result, |caps: &Captures| {
                    stats.headings += 1;
                    format!("\n{} {}\n", marker, caps[1].trim())
                })
                .into_owned();
        }
        result
    }

    fn rewrite_emphasis(&self, text: &str) -> String {
        let strong = |caps: &Captures| wrap_emphasis(&caps[1], "**");
        let em = |caps: &Captures| wrap_emphasis(&caps[1], "*");
        let text = self.strong.replace_all(text, strong);
        let text = self.bold.replace_all(&text, strong);
        let text = self.em.replace_all(&text, em);
        self.italic.replace_all(&text, em).into_owned()
    }

    /// Anchors without an `href` are left for the tag stripper.
    fn rewrite_links(&self, text: &str, stats: &mut ConversionStats) -> String {
        self.anchor
            .replace_all(text, |caps: &Captures| match patterns::attribute(&caps[1], "href") {
                Some(href) => {
                    stats.links += 1;
                    format!("[{}]({})", &caps[2], href)
                }
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    fn rewrite_images(&self, text: &str, stats: &mut ConversionStats) -> String {
        self.image
            .replace_all(text, |caps: &Captures| {
                let attrs = &caps[1];
                match patterns::attribute(attrs, "src") {
                    Some(src) => {
                        stats.images += 1;
                        let alt = patterns::attribute(attrs, "alt").unwrap_or("");
                        format!("![{}]({})", alt, src)
                    }
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// Containers become newlines; ordered items lose their numbering.
    /// Whitespace after an item is dropped so loose markup stays one list.
    fn rewrite_lists(&self, text: &str, stats: &mut ConversionStats) -> String {
        let text = self.list_open.replace_all(text, "\n");
        let text = self.list_close.replace_all(&text, "\n");
        let marker = self.list_marker;
        self.list_item
            .replace_all(&text, |caps: &Captures| {
                stats.list_items += 1;
                format!("{} {}\n", marker, caps[1].trim())
            })
            .into_owned()
    }

    fn rewrite_blockquotes(&self, text: &str) -> String {
        self.blockquote
            .replace_all(text, |caps: &Captures| {
                format!("> {}", caps[1].trim().replace('\n', "\n> "))
            })
            .into_owned()
    }

    fn rewrite_rules(&self, text: &str) -> String {
        self.rule.replace_all(text, "\n\n---\n\n").into_owned()
    }

    fn rewrite_paragraphs(&self, text: &str) -> String {
        let text = self.paragraph.replace_all(text, "${1}\n\n");
        self.line_break.replace_all(&text, "\n").into_owned()
    }

    fn unwrap_containers(&self, text: &str) -> String {
        let text = self.div.replace_all(text, "${1}\n");
        self.span.replace_all(&text, "${1}").into_owned()
    }
}

/// Wrap `content` in `marker`, keeping edge whitespace outside so the
/// markers touch the text.
fn wrap_emphasis(content: &str, marker: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return content.to_string();
    }
    let start = content.len() - content.trim_start().len();
    let end = start + trimmed.len();
    format!(
        "{}{}{}{}{}",
        &content[..start],
        marker,
        trimmed,
        marker,
        &content[end..]
    )
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new(MarkdownOptions::default())
    }
}
