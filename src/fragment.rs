//! Extract, transform, restore.
//!
//! Regions that must survive the rewrite stages untouched (HTML tables, code
//! bodies) are carved out of the buffer and replaced by placeholder tokens.
//! After the rewrites have run, every token is swapped back for its fragment.
//!
//! Tokens are built from a monotonically increasing index, so two tokens of
//! the same table never collide and restoration order does not matter. A
//! document that already contains a token-shaped string will be corrupted on
//! restore; that is an accepted limitation and is only logged.

use regex::{Captures, Regex};

/// Shape of the placeholder token written into the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `__KIND_<n>__`, reads as a word of prose.
    Bare,
    /// `<__KIND_<n>__/>`, reads as an opaque tag so paragraph assembly
    /// treats the line as a block.
    Tag,
}

/// Build the placeholder token for `index` in the `kind` namespace.
pub fn placeholder(kind: &str, style: PlaceholderStyle, index: usize) -> String {
    match style {
        PlaceholderStyle::Bare => format!("__{}_{}__", kind, index),
        PlaceholderStyle::Tag => format!("<__{}_{}__/>", kind, index),
    }
}

/// Ordered, append-only table of fragments held aside during conversion.
///
/// `T` is whatever the restore step needs: the verbatim substring for tables,
/// or a parsed code body for fenced blocks.
#[derive(Debug, Clone)]
pub struct FragmentTable<T = String> {
    kind: &'static str,
    style: PlaceholderStyle,
    fragments: Vec<T>,
}

impl<T> FragmentTable<T> {
    /// Create an empty table for the given token namespace.
    pub fn new(kind: &'static str, style: PlaceholderStyle) -> Self {
        Self {
            kind,
            style,
            fragments: Vec::new(),
        }
    }

    /// Token namespace (e.g. `HTML_TABLE`).
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Placeholder token for the fragment at `index`.
    pub fn token(&self, index: usize) -> String {
        placeholder(self.kind, self.style, index)
    }

    /// Number of extracted fragments.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Fragment at `index`.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.fragments.get(index)
    }

    /// Iterate fragments in extraction order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.fragments.iter()
    }

    /// Store a fragment and return the placeholder that stands in for it.
    pub fn push(&mut self, fragment: T) -> String {
        self.fragments.push(fragment);
        self.token(self.fragments.len() - 1)
    }

    /// Log when `text` already holds token-shaped text of this kind.
    ///
    /// Later passes see our own tokens, so only the first one can tell.
    pub fn check_collision(&self, text: &str) {
        let prefix = format!("__{}_", self.kind);
        if self.fragments.is_empty() && text.contains(&prefix) {
            log::warn!(
                "input already contains `{}` placeholder text; it may be corrupted on restore",
                prefix
            );
        }
    }

    /// Replace every match of `matcher` with a placeholder, storing what
    /// `capture` builds from the match.
    ///
    /// Matches are leftmost-first and non-overlapping; surrounding text is
    /// left exactly as it was. May be called repeatedly with different
    /// matchers; indices keep counting up.
    pub fn extract_with<F>(&mut self, text: &str, matcher: &Regex, mut capture: F) -> String
    where
        F: FnMut(&Captures) -> T,
    {
        self.check_collision(text);
        matcher
            .replace_all(text, |caps: &Captures| self.push(capture(caps)))
            .into_owned()
    }

    /// Swap every placeholder present in `text` for the text `render`
    /// produces from its fragment.
    ///
    /// Tokens that are absent are skipped, so the same table can be applied
    /// to nested fragments and then to the outer buffer.
    pub fn restore_with<F>(&self, text: &str, mut render: F) -> String
    where
        F: FnMut(&T) -> String,
    {
        let mut result = text.to_string();
        for (index, fragment) in self.fragments.iter().enumerate() {
            let token = self.token(index);
            if result.contains(&token) {
                result = result.replace(&token, &render(fragment));
            }
        }
        result
    }

    /// Indices whose token core (`__KIND_n__`) still appears in `text`.
    ///
    /// Run on finished output; any hit means a fragment was not restored.
    pub fn dangling(&self, text: &str) -> Vec<usize> {
        (0..self.fragments.len())
            .filter(|&index| text.contains(&placeholder(self.kind, PlaceholderStyle::Bare, index)))
            .collect()
    }

    /// Log every dangling token left in finished output.
    pub fn warn_dangling(&self, text: &str) {
        for index in self.dangling(text) {
            log::warn!("placeholder {} left in output; fragment lost", self.token(index));
        }
    }
}

impl FragmentTable<String> {
    /// Replace every match of `matcher` with a placeholder, storing the
    /// whole match verbatim.
    pub fn extract(&mut self, text: &str, matcher: &Regex) -> String {
        self.extract_with(text, matcher, |caps| caps[0].to_string())
    }

    /// Swap every placeholder back for its verbatim fragment.
    pub fn restore(&self, text: &str) -> String {
        self.restore_with(text, |fragment| fragment.clone())
    }
}
