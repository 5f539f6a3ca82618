//! Whitespace normalization for generated Markdown.

use regex::Regex;

/// Collapses newline and space runs left behind by the tag rewrites.
#[derive(Debug, Clone)]
pub struct WhitespaceNormalizer {
    max_newlines: usize,
    newline_run: Regex,
    space_run: Regex,
}

impl WhitespaceNormalizer {
    /// Create a normalizer allowing at most `max_consecutive_newlines`
    /// newlines in a row (at least 1).
    pub fn new(max_consecutive_newlines: u8) -> Self {
        let max = max_consecutive_newlines.max(1) as usize;
        Self {
            max_newlines: max,
            newline_run: Regex::new(&format!(r"\n{{{},}}", max + 1)).unwrap(),
            space_run: Regex::new(r" {2,}").unwrap(),
        }
    }

    /// Collapse every run of more than the allowed newlines to exactly the
    /// allowed count.
    pub fn collapse_newlines(&self, text: &str) -> String {
        let replacement = "\n".repeat(self.max_newlines);
        self.newline_run
            .replace_all(text, replacement.as_str())
            .into_owned()
    }

    /// Collapse runs of spaces to a single space.
    pub fn collapse_spaces(&self, text: &str) -> String {
        self.space_run.replace_all(text, " ").into_owned()
    }

    /// Newline collapse, space collapse, then trim.
    pub fn normalize(&self, text: &str) -> String {
        let result = self.collapse_newlines(text);
        let result = self.collapse_spaces(&result);
        result.trim().to_string()
    }
}

impl Default for WhitespaceNormalizer {
    fn default() -> Self {
        Self::new(2)
    }
}
