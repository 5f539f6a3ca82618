//! Tag-pattern definitions shared by both conversion directions.
//!
//! All patterns are regex-shaped, not a DOM parse: tag names match
//! case-insensitively, tolerate arbitrary attributes on the opening tag, and
//! paired tags match lazily across line breaks so the first closing tag ends
//! the element.

use regex::Regex;
use std::sync::OnceLock;

/// Token namespace for preserved HTML tables.
pub const TABLE_KIND: &str = "HTML_TABLE";

/// Token namespace for fenced code blocks.
pub const CODE_BLOCK_KIND: &str = "CODE_BLOCK";

/// Token namespace for inline code spans.
pub const INLINE_CODE_KIND: &str = "INLINE_CODE";

/// Tags that may legitimately open a line of prose.
pub const INLINE_TAGS: &[&str] = &[
    "a", "strong", "em", "b", "i", "img", "code", "span", "u", "sub", "sup", "br", "del", "s",
    "mark", "small",
];

/// A whole `<table>` element, up to the first `</table>`.
pub fn table() -> Regex {
    Regex::new(r"(?is)<table\b[^>]*>.*?</table\s*>").unwrap()
}

/// `<name ...>content</name>`, capturing the content as group 1.
pub fn paired(name: &str) -> Regex {
    Regex::new(&format!(r"(?is)<{0}\b[^>]*>(.*?)</{0}\s*>", name)).unwrap()
}

/// `<name ...>content</name>`, capturing attributes (1) and content (2).
pub fn paired_with_attrs(name: &str) -> Regex {
    Regex::new(&format!(r"(?is)<{0}\b([^>]*)>(.*?)</{0}\s*>", name)).unwrap()
}

/// An opening tag `<name ...>` on its own.
pub fn open(name: &str) -> Regex {
    Regex::new(&format!(r"(?i)<{}\b[^>]*>", name)).unwrap()
}

/// A closing tag `</name>`.
pub fn close(name: &str) -> Regex {
    Regex::new(&format!(r"(?i)</{}\s*>", name)).unwrap()
}

/// A void element such as `<br>`, `<br/>` or `<img ... />`, capturing the
/// attribute soup as group 1.
pub fn void(name: &str) -> Regex {
    Regex::new(&format!(r"(?i)<{}\b([^>]*?)/?>", name)).unwrap()
}

/// Any remaining tag.
pub fn any_tag() -> Regex {
    Regex::new(r"<[^>]+>").unwrap()
}

fn attribute_regex() -> &'static Regex {
    static ATTRIBUTE: OnceLock<Regex> = OnceLock::new();
    ATTRIBUTE.get_or_init(|| {
        Regex::new(r#"(?:^|\s)([A-Za-z][A-Za-z0-9_:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
    })
}

/// Look up a quoted attribute value in an attribute soup.
///
/// Names compare case-insensitively; the first occurrence wins. Unquoted
/// values are not recognized.
pub fn attribute<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    attribute_regex().captures_iter(attrs).find_map(|caps| {
        if !caps[1].eq_ignore_ascii_case(name) {
            return None;
        }
        caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str())
    })
}

/// Language named by a `class="language-x"` (or `lang-x`) attribute.
pub fn code_language(attrs: &str) -> Option<&str> {
    attribute(attrs, "class")?
        .split_whitespace()
        .find_map(|class| {
            class
                .strip_prefix("language-")
                .or_else(|| class.strip_prefix("lang-"))
        })
        .filter(|lang| !lang.is_empty())
}

fn leading_tag_regex() -> &'static Regex {
    static LEADING_TAG: OnceLock<Regex> = OnceLock::new();
    LEADING_TAG.get_or_init(|| Regex::new(r"^</?([A-Za-z][A-Za-z0-9]*)").unwrap())
}

/// Whether a trimmed line opens with a block-level tag.
///
/// Lines opening with an inline tag (see [`INLINE_TAGS`]) count as prose.
/// Anything else starting with `<`, tag-shaped placeholders included, is a
/// block line.
pub fn starts_with_block_tag(line: &str) -> bool {
    if !line.starts_with('<') {
        return false;
    }
    match leading_tag_regex().captures(line) {
        Some(caps) => {
            let name = &caps[1];
            !INLINE_TAGS.iter().any(|tag| tag.eq_ignore_ascii_case(name))
        }
        None => true,
    }
}
