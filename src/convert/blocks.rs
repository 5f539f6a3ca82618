//! Line-oriented block assembly for Markdown → HTML.
//!
//! Lists and paragraphs need sequential, per-line decisions that regex
//! substitution cannot express, so each is a small explicit state machine
//! driven one line at a time.

use regex::Regex;

use crate::patterns::starts_with_block_tag;

/// Which list container is currently open. At most one is open at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListState {
    /// No list open
    #[default]
    Closed,
    /// Inside `<ul>`
    Unordered,
    /// Inside `<ol>`
    Ordered,
}

impl ListState {
    fn open_tag(self) -> Option<&'static str> {
        match self {
            ListState::Closed => None,
            ListState::Unordered => Some("<ul>"),
            ListState::Ordered => Some("<ol>"),
        }
    }

    fn close_tag(self) -> Option<&'static str> {
        match self {
            ListState::Closed => None,
            ListState::Unordered => Some("</ul>"),
            ListState::Ordered => Some("</ol>"),
        }
    }
}

/// Folds bullet and numbered lines into `<ul>`/`<ol>` containers.
#[derive(Debug, Default)]
pub struct ListAssembler {
    state: ListState,
    lines: Vec<String>,
    items: u32,
}

impl ListAssembler {
    /// Create an assembler with no list open.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current container state.
    pub fn state(&self) -> ListState {
        self.state
    }

    /// Emit an item, opening its container (and closing the other) first.
    pub fn push_item(&mut self, kind: ListState, content: &str) {
        if self.state != kind {
            self.close();
            if let Some(tag) = kind.open_tag() {
                self.lines.push(tag.to_string());
            }
            self.state = kind;
        }
        self.lines.push(format!("<li>{}</li>", content));
        self.items += 1;
    }

    /// Pass a non-list line through, closing any open container first.
    pub fn push_line(&mut self, line: &str) {
        self.close();
        self.lines.push(line.to_string());
    }

    /// Close whichever container is open.
    pub fn close(&mut self) {
        if let Some(tag) = self.state.close_tag() {
            self.lines.push(tag.to_string());
        }
        self.state = ListState::Closed;
    }

    /// Close any open container and return the joined lines and the number
    /// of items emitted.
    pub fn finish(mut self) -> (String, u32) {
        self.close();
        (self.lines.join("\n"), self.items)
    }
}

/// Run the list state machine over `text`.
///
/// A trimmed line starting `- ` or `* ` is an unordered item; one matching
/// `ordered_marker` (e.g. `1. `) is an ordered item. Items are emitted
/// trimmed; every other line passes through untouched.
pub fn assemble_lists(text: &str, ordered_marker: &Regex) -> (String, u32) {
    let mut lists = ListAssembler::new();

    for line in text.split('\n') {
        let stripped = line.trim();
        if let Some(content) = stripped
            .strip_prefix("- ")
            .or_else(|| stripped.strip_prefix("* "))
        {
            lists.push_item(ListState::Unordered, content);
        } else if let Some(marker) = ordered_marker.find(stripped) {
            lists.push_item(ListState::Ordered, &stripped[marker.end()..]);
        } else {
            lists.push_line(line);
        }
    }

    lists.finish()
}

/// Buffers prose lines and wraps them in `<p>` at each boundary.
#[derive(Debug, Default)]
pub struct ParagraphAssembler {
    pending: Vec<String>,
    lines: Vec<String>,
    paragraphs: u32,
}

impl ParagraphAssembler {
    /// Create an assembler with an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line.
    ///
    /// Blank lines flush the buffer. A line opening with a block-level tag
    /// flushes the buffer and passes through. Anything else is buffered,
    /// trimmed.
    pub fn push_line(&mut self, line: &str) {
        let stripped = line.trim();
        if stripped.is_empty() {
            self.flush();
        } else if starts_with_block_tag(stripped) {
            self.flush();
            self.lines.push(line.to_string());
        } else {
            self.pending.push(stripped.to_string());
        }
    }

    /// Emit the buffered lines, joined by single spaces, as one paragraph.
    pub fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        self.lines.push(format!("<p>{}</p>", self.pending.join(" ")));
        self.pending.clear();
        self.paragraphs += 1;
    }

    /// Flush and return the joined lines and the number of paragraphs.
    pub fn finish(mut self) -> (String, u32) {
        self.flush();
        (self.lines.join("\n"), self.paragraphs)
    }
}

/// Run paragraph assembly over `text`.
pub fn assemble_paragraphs(text: &str) -> (String, u32) {
    let mut paragraphs = ParagraphAssembler::new();
    for line in text.split('\n') {
        paragraphs.push_line(line);
    }
    paragraphs.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ordered() -> Regex {
        Regex::new(r"^\d+\. ").unwrap()
    }

    #[test]
    fn test_unordered_list() {
        let (html, items) = assemble_lists("- one\n* two", &ordered());
        assert_eq!(html, "<ul>\n<li>one</li>\n<li>two</li>\n</ul>");
        assert_eq!(items, 2);
    }

    #[test]
    fn test_ordered_list() {
        let (html, _) = assemble_lists("1. first\n10. tenth", &ordered());
        assert_eq!(html, "<ol>\n<li>first</li>\n<li>tenth</li>\n</ol>");
    }

    #[test]
    fn test_list_closed_before_following_line() {
        let (html, _) = assemble_lists("- a\nafter", &ordered());
        assert_eq!(html, "<ul>\n<li>a</li>\n</ul>\nafter");
    }

    #[test]
    fn test_switching_kinds_closes_previous() {
        let (html, _) = assemble_lists("- a\n1. b\n- c", &ordered());
        assert_eq!(
            html,
            "<ul>\n<li>a</li>\n</ul>\n<ol>\n<li>b</li>\n</ol>\n<ul>\n<li>c</li>\n</ul>"
        );
    }

    #[test]
    fn test_indented_items_are_trimmed() {
        let (html, _) = assemble_lists("  - nested-looking", &ordered());
        assert_eq!(html, "<ul>\n<li>nested-looking</li>\n</ul>");
    }

    #[test]
    fn test_non_list_lines_untouched() {
        let (html, items) = assemble_lists("  plain\n-nospace\n1.5 ratio", &ordered());
        assert_eq!(html, "  plain\n-nospace\n1.5 ratio");
        assert_eq!(items, 0);
    }

    #[test]
    fn test_list_state_transitions() {
        let mut lists = ListAssembler::new();
        assert_eq!(lists.state(), ListState::Closed);
        lists.push_item(ListState::Ordered, "x");
        assert_eq!(lists.state(), ListState::Ordered);
        lists.push_line("text");
        assert_eq!(lists.state(), ListState::Closed);
    }

    #[test]
    fn test_paragraphs_join_lines() {
        let (html, count) = assemble_paragraphs("one\n  two\n\nthree");
        assert_eq!(html, "<p>one two</p>\n<p>three</p>");
        assert_eq!(count, 2);
    }

    #[test]
    fn test_block_lines_flush_and_pass_through() {
        let (html, _) = assemble_paragraphs("intro\n<h2>Head</h2>\nmore");
        assert_eq!(html, "<p>intro</p>\n<h2>Head</h2>\n<p>more</p>");
    }

    #[test]
    fn test_inline_tag_lines_are_prose() {
        let (html, _) = assemble_paragraphs("<strong>Bold</strong> opener\ncontinues");
        assert_eq!(html, "<p><strong>Bold</strong> opener continues</p>");
    }

    #[test]
    fn test_placeholder_is_block() {
        let (html, _) = assemble_paragraphs("Start\n<__HTML_TABLE_0__/>\nEnd");
        assert_eq!(html, "<p>Start</p>\n<__HTML_TABLE_0__/>\n<p>End</p>");
    }

    #[test]
    fn test_blank_only_input() {
        let (html, count) = assemble_paragraphs("\n\n");
        assert_eq!(html, "");
        assert_eq!(count, 0);
    }
}
