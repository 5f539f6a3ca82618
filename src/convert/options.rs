//! Conversion options and configuration.

use crate::detect::SourceFormat;

/// `marker` if it can open a bullet item, otherwise `-`.
pub(crate) fn valid_list_marker(marker: char) -> char {
    match marker {
        '-' | '*' | '+' => marker,
        _ => '-',
    }
}

/// Options for HTML → Markdown conversion.
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    /// Keep `<table>` elements verbatim as raw-HTML islands
    pub preserve_tables: bool,

    /// Bullet used for list items (`-`, `*` or `+`; anything else is
    /// replaced by `-` when the converter is built)
    pub list_marker: char,

    /// Maximum consecutive newlines in the output (at least 1)
    pub max_consecutive_newlines: u8,

    /// Carry `class="language-x"` into the fence info string
    pub code_language: bool,
}

impl MarkdownOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable table preservation.
    pub fn with_tables(mut self, preserve: bool) -> Self {
        self.preserve_tables = preserve;
        self
    }

    /// Set the list marker character. Unsupported markers fall back to `-`.
    pub fn with_list_marker(mut self, marker: char) -> Self {
        self.list_marker = valid_list_marker(marker);
        self
    }

    /// Set the maximum number of consecutive newlines.
    pub fn with_max_newlines(mut self, max: u8) -> Self {
        self.max_consecutive_newlines = max.max(1);
        self
    }

    /// Enable or disable fence info strings from code classes.
    pub fn with_code_language(mut self, enabled: bool) -> Self {
        self.code_language = enabled;
        self
    }
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            preserve_tables: true,
            list_marker: '-',
            max_consecutive_newlines: 2,
            code_language: true,
        }
    }
}

/// Options for Markdown → HTML conversion.
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Pass raw `<table>` islands through verbatim
    pub preserve_tables: bool,

    /// Wrap prose lines in `<p>` tags
    pub wrap_paragraphs: bool,

    /// Turn a fence info string into `class="language-x"`
    pub code_language: bool,
}

impl HtmlOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable table preservation.
    pub fn with_tables(mut self, preserve: bool) -> Self {
        self.preserve_tables = preserve;
        self
    }

    /// Enable or disable paragraph wrapping.
    pub fn with_paragraphs(mut self, wrap: bool) -> Self {
        self.wrap_paragraphs = wrap;
        self
    }

    /// Enable or disable language classes on code blocks.
    pub fn with_code_language(mut self, enabled: bool) -> Self {
        self.code_language = enabled;
        self
    }
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            preserve_tables: true,
            wrap_paragraphs: true,
            code_language: true,
        }
    }
}

/// Options for the file and byte helpers.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// HTML → Markdown options
    pub markdown: MarkdownOptions,

    /// Markdown → HTML options
    pub html: HtmlOptions,

    /// Force the source format instead of detecting it
    pub source: Option<SourceFormat>,

    /// Whether to collect statistics during conversion
    pub collect_stats: bool,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set HTML → Markdown options.
    pub fn with_markdown_options(mut self, options: MarkdownOptions) -> Self {
        self.markdown = options;
        self
    }

    /// Set Markdown → HTML options.
    pub fn with_html_options(mut self, options: HtmlOptions) -> Self {
        self.html = options;
        self
    }

    /// Force the source format.
    pub fn with_source(mut self, source: SourceFormat) -> Self {
        self.source = Some(source);
        self
    }

    /// Enable statistics collection.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_options_builder() {
        let options = MarkdownOptions::new()
            .with_tables(false)
            .with_list_marker('*')
            .with_max_newlines(0);

        assert!(!options.preserve_tables);
        assert_eq!(options.list_marker, '*');
        assert_eq!(options.max_consecutive_newlines, 1);
    }

    #[test]
    fn test_unsupported_list_marker_falls_back() {
        let options = MarkdownOptions::new().with_list_marker('#');
        assert_eq!(options.list_marker, '-');
    }

    #[test]
    fn test_html_options_defaults() {
        let options = HtmlOptions::default();
        assert!(options.preserve_tables);
        assert!(options.wrap_paragraphs);
        assert!(options.code_language);
    }

    #[test]
    fn test_convert_options_builder() {
        let options = ConvertOptions::new()
            .with_source(SourceFormat::Html)
            .with_stats(true)
            .with_html_options(HtmlOptions::new().with_paragraphs(false));

        assert_eq!(options.source, Some(SourceFormat::Html));
        assert!(options.collect_stats);
        assert!(!options.html.wrap_paragraphs);
    }
}
