//! Code bodies held aside while the surrounding markup is rewritten.

use html_escape::encode_text;

/// A fenced block or inline span, stored raw and rendered on restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBody {
    /// Language from a fence info string or a `language-x` class
    pub language: Option<String>,
    /// Literal code text, never escaped
    pub text: String,
}

impl CodeBody {
    /// Create a code body.
    pub fn new(language: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            language: language.filter(|l| !l.is_empty()).map(str::to_string),
            text: text.into(),
        }
    }

    /// Render as a Markdown fence, lengthening the fence past any backtick
    /// run inside the body.
    pub fn to_fence(&self) -> String {
        let fence = "`".repeat(longest_backtick_run(&self.text).max(2) + 1);
        format!(
            "{fence}{}\n{}\n{fence}",
            self.language.as_deref().unwrap_or(""),
            self.text,
        )
    }

    /// Render as a Markdown inline code span.
    ///
    /// The delimiter outgrows any backtick run inside the text. Padding
    /// spaces are added whenever a reader would strip one from each side.
    pub fn to_inline_markdown(&self) -> String {
        let run = longest_backtick_run(&self.text);
        let ticks = "`".repeat(run + 1);
        let spaced = self.text.starts_with(' ')
            && self.text.ends_with(' ')
            && !self.text.trim().is_empty();
        if run > 0 || spaced {
            format!("{ticks} {} {ticks}", self.text)
        } else {
            format!("{ticks}{}{ticks}", self.text)
        }
    }

    /// Replace `text` while keeping the language.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            language: self.language.clone(),
            text: text.into(),
        }
    }

    /// Render as `<pre><code>` with escaped content.
    pub fn to_pre_html(&self, with_language: bool) -> String {
        match self.language.as_deref() {
            Some(lang) if with_language => format!(
                "<pre><code class=\"language-{}\">{}</code></pre>",
                lang,
                encode_text(&self.text)
            ),
            _ => format!("<pre><code>{}</code></pre>", encode_text(&self.text)),
        }
    }

    /// Render as inline `<code>` with escaped content.
    pub fn to_inline_html(&self) -> String {
        format!("<code>{}</code>", encode_text(&self.text))
    }
}

/// Length of the longest run of backticks in `text`.
pub fn longest_backtick_run(text: &str) -> usize {
    let mut max_run = 0;
    let mut current_run = 0;

    for c in text.chars() {
        if c == '`' {
            current_run += 1;
            max_run = max_run.max(current_run);
        } else {
            current_run = 0;
        }
    }

    max_run
}

fn backtick_run_at(bytes: &[u8], at: usize) -> usize {
    bytes[at..].iter().take_while(|&&b| b == b'`').count()
}

/// Start of the next run of exactly `len` backticks at or after `from`.
fn closing_run(text: &str, from: usize, len: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let run = backtick_run_at(bytes, i);
            if run == len {
                return Some(i);
            }
            i += run;
        } else {
            i += 1;
        }
    }
    None
}

/// Info string after an opening fence, and where the body starts.
fn fence_info(text: &str, at: usize) -> (Option<&str>, usize) {
    let rest = &text[at..];
    let lang_len = rest
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || b"_+#.-".contains(b))
        .count();
    if lang_len > 0 {
        let after = &rest[lang_len..];
        let pad = after.bytes().take_while(|b| *b == b' ' || *b == b'\t').count();
        if after[pad..].starts_with('\n') {
            return (Some(&rest[..lang_len]), at + lang_len + pad + 1);
        }
    }
    if rest.starts_with('\n') {
        (None, at + 1)
    } else {
        (None, at)
    }
}

/// Replace every fenced block in Markdown source with what `replace`
/// returns for it.
///
/// A fence is a run of three or more backticks closed by the next run of
/// the same length. An optional info string names the language. One
/// newline after the opener and one before the closer belong to the fence.
/// Unclosed openers are left as text.
pub fn replace_fences<F>(text: &str, mut replace: F) -> String
where
    F: FnMut(CodeBody) -> String,
{
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }
        let len = backtick_run_at(bytes, i);
        let open_end = i + len;
        if len < 3 {
            i = open_end;
            continue;
        }
        let (language, body_start) = fence_info(text, open_end);
        match closing_run(text, body_start, len) {
            Some(close) => {
                let body = &text[body_start..close];
                let body = body.strip_suffix('\n').unwrap_or(body);
                out.push_str(&text[last..i]);
                out.push_str(&replace(CodeBody::new(language, body)));
                i = close + len;
                last = i;
            }
            None => i = open_end,
        }
    }

    out.push_str(&text[last..]);
    out
}

/// Replace every inline code span in Markdown source with what `replace`
/// returns for it.
///
/// A span opens with a backtick run and closes with the next run of the
/// same length. When the content both starts and ends with a space, one
/// space is stripped from each side. Empty spans are left as text.
pub fn replace_spans<F>(text: &str, mut replace: F) -> String
where
    F: FnMut(CodeBody) -> String,
{
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }
        let len = backtick_run_at(bytes, i);
        let open_end = i + len;
        match closing_run(text, open_end, len) {
            Some(close) if close > open_end => {
                let mut body = &text[open_end..close];
                if body.len() > 2
                    && body.starts_with(' ')
                    && body.ends_with(' ')
                    && !body.trim().is_empty()
                {
                    body = &body[1..body.len() - 1];
                }
                out.push_str(&text[last..i]);
                out.push_str(&replace(CodeBody::new(None, body)));
                i = close + len;
                last = i;
            }
            _ => i = open_end,
        }
    }

    out.push_str(&text[last..]);
    out
}
