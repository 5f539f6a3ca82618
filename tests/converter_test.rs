//! Integration tests for both conversion directions.

use canvasmark::convert::{ConvertOptions, HtmlOptions, MarkdownOptions};
use canvasmark::{
    convert_file, html_to_markdown, html_to_markdown_with_options, markdown_to_html,
    markdown_to_html_with_stats, Error, SourceFormat,
};
use std::fs;
use tempfile::tempdir;

const ACCESSIBLE_TABLE: &str = "<table><caption>Grades</caption><thead><tr><th scope=\"col\">Name</th><th scope=\"col\">Score</th></tr></thead><tbody><tr><td>Ada</td><td>**95**</td></tr></tbody></table>";

// ==================== HTML → Markdown ====================

#[test]
fn test_table_between_paragraphs() {
    let html = "<p>Intro</p><table><tr><th scope=\"col\">H</th></tr><tr><td>A</td></tr></table><p>End</p>";
    let md = html_to_markdown(html);

    let intro = md.find("Intro").unwrap();
    let table = md
        .find("<table><tr><th scope=\"col\">H</th></tr><tr><td>A</td></tr></table>")
        .unwrap();
    let end = md.find("End").unwrap();
    assert!(intro < table && table < end);
    assert!(md.contains("Intro\n\n<table>"));
    assert!(md.contains("</table>\n\nEnd"));
}

#[test]
fn test_table_internals_untouched() {
    let html = format!("<h2>Scores</h2>{}<p>Done</p>", ACCESSIBLE_TABLE);
    let md = html_to_markdown(&html);
    assert!(md.contains(ACCESSIBLE_TABLE));
    assert!(md.starts_with("## Scores"));
}

#[test]
fn test_multiple_tables() {
    let html = "<table><tr><td>1</td></tr></table><p>mid</p><table class=\"t\"><tr><td>2</td></tr></table>";
    let md = html_to_markdown(html);
    assert_eq!(
        md,
        "<table><tr><td>1</td></tr></table>\n\nmid\n\n<table class=\"t\"><tr><td>2</td></tr></table>"
    );
}

#[test]
fn test_image_with_and_without_alt() {
    assert_eq!(
        html_to_markdown("<img src=\"https://lms.test/f/1.png\" alt=\"Diagram\">"),
        "![Diagram](https://lms.test/f/1.png)"
    );
    assert_eq!(
        html_to_markdown("<img src=\"https://lms.test/f/1.png\">"),
        "![](https://lms.test/f/1.png)"
    );
}

#[test]
fn test_typical_page_body() {
    let html = concat!(
        "<h2>Overview</h2>",
        "<p>Welcome to <strong>Week 3</strong>. See the <a href=\"/courses/1/files/2\">syllabus</a>.</p>",
        "<ul><li>Read chapter 4</li><li>Submit the <em>quiz</em></li></ul>",
        "<hr>",
        "<p>Questions? Use the forum.</p>"
    );
    let md = html_to_markdown(html);
    assert_eq!(
        md,
        "## Overview\nWelcome to **Week 3**. See the [syllabus](/courses/1/files/2).\n\n\
         - Read chapter 4\n- Submit the *quiz*\n\n---\n\nQuestions? Use the forum."
    );
}

#[test]
fn test_lists_followed_by_other_content() {
    let html = "<ol><li>one</li><li>two</li></ol><ul><li>three</li></ul><p>after</p>";
    let md = html_to_markdown(html);
    assert_eq!(md, "- one\n- two\n\n- three\n\nafter");

    assert_eq!(
        markdown_to_html(&md),
        "<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n<ul>\n<li>three</li>\n</ul>\n<p>after</p>"
    );
}

#[test]
fn test_tables_option_off_flattens() {
    let options = MarkdownOptions::new().with_tables(false);
    let md = html_to_markdown_with_options("<p>x</p><table><tr><td>cell</td></tr></table>", &options);
    assert!(!md.contains("<table>"));
    assert!(md.contains("cell"));
}

// ==================== Markdown → HTML ====================

#[test]
fn test_heading_paragraph_list() {
    let html = markdown_to_html("# Title\n\nSome **bold** and *italic* text.\n\n- item one\n- item two\n");
    assert_eq!(
        html,
        "<h1>Title</h1>\n<p>Some <strong>bold</strong> and <em>italic</em> text.</p>\n<ul>\n<li>item one</li>\n<li>item two</li>\n</ul>"
    );
    assert_eq!(
        html.replace('\n', ""),
        "<h1>Title</h1><p>Some <strong>bold</strong> and <em>italic</em> text.</p><ul><li>item one</li><li>item two</li></ul>"
    );
}

#[test]
fn test_markdown_table_passthrough() {
    let md = "Start\n\n<table><thead><tr><th scope=\"col\">H</th></tr></thead><tbody><tr><td>A</td></tr></tbody></table>\n\nEnd";
    let html = markdown_to_html(md);
    assert!(html.contains("<table><thead><tr><th scope=\"col\">H</th></tr></thead><tbody><tr><td>A</td></tr></tbody></table>"));
    assert!(!html.contains("<p><table"));
    assert!(!html.contains("HTML_TABLE"));
}

#[test]
fn test_table_markdown_syntax_inside_is_literal() {
    let html = markdown_to_html(&format!("Intro\n\n{}", ACCESSIBLE_TABLE));
    assert!(html.contains("<td>**95**</td>"));
}

#[test]
fn test_table_mid_paragraph() {
    let html = markdown_to_html("before <table><tr><td>x</td></tr></table> after");
    assert!(html.contains("<table><tr><td>x</td></tr></table>"));
    assert!(!html.contains("HTML_TABLE"));
}

#[test]
fn test_ordered_list_at_end_is_closed() {
    let html = markdown_to_html("Steps:\n\n1. one\n2. two");
    assert!(html.ends_with("</ol>"));
    assert_eq!(html.matches("<ol>").count(), html.matches("</ol>").count());
}

#[test]
fn test_html_stats() {
    let result = markdown_to_html_with_stats("# A\n\nb [c](d)\n", &HtmlOptions::default());
    assert_eq!(result.source, SourceFormat::Markdown);
    assert_eq!(result.target, SourceFormat::Html);
    assert_eq!(result.stats.headings, 1);
    assert_eq!(result.stats.links, 1);
    assert_eq!(result.stats.paragraphs, 1);
}

// ==================== Round trip ====================

#[test]
fn test_round_trip_preserves_table_bytes() {
    let html = format!("<p>Before</p>{}<p>After <em>this</em></p>", ACCESSIBLE_TABLE);
    let md = html_to_markdown(&html);
    let back = markdown_to_html(&md);

    assert!(back.contains(ACCESSIBLE_TABLE));
    assert_eq!(back.matches("<table>").count(), 1);
    assert_eq!(
        back,
        format!("<p>Before</p>\n{}\n<p>After <em>this</em></p>", ACCESSIBLE_TABLE)
    );
}

#[test]
fn test_round_trip_code_block() {
    let html = "<pre><code class=\"language-python\">if a &lt; b:\n    print(&quot;*x*&quot;)</code></pre>";
    let md = html_to_markdown(html);
    assert_eq!(md, "```python\nif a < b:\n    print(\"*x*\")\n```");

    let back = markdown_to_html(&md);
    assert_eq!(
        back,
        "<pre><code class=\"language-python\">if a &lt; b:\n    print(\"*x*\")</code></pre>"
    );
}

#[test]
fn test_round_trip_escaped_prose_stays_text() {
    let html = "<p>Type &lt;script&gt;alert(1)&lt;/script&gt; to test</p>";
    let md = html_to_markdown(html);
    assert_eq!(md, "Type &lt;script&gt;alert(1)&lt;/script&gt; to test");

    let back = markdown_to_html(&md);
    assert_eq!(back, html);
    assert!(!back.contains("<script>"));
}

#[test]
fn test_round_trip_long_fences_and_spans() {
    let html = "<pre><code>```\nnested\n```</code></pre><p>Use <code>a`b</code> now</p>";
    let md = html_to_markdown(html);
    assert_eq!(md, "````\n```\nnested\n```\n````\n\nUse `` a`b `` now");

    assert_eq!(
        markdown_to_html(&md),
        "<pre><code>```\nnested\n```</code></pre>\n<p>Use <code>a`b</code> now</p>"
    );
}

#[test]
fn test_round_trip_emphasis_with_edge_space() {
    let md = html_to_markdown("<p><strong> Note:</strong> read this</p>");
    assert_eq!(md, "**Note:** read this");
    assert_eq!(
        markdown_to_html(&md),
        "<p><strong>Note:</strong> read this</p>"
    );
}

#[test]
fn test_round_trip_is_stable_after_first_pass() {
    let html = "<h2>Title</h2><p>Text with <a href=\"u\">link</a>.</p><ul><li>a</li><li>b</li></ul>";
    let once = markdown_to_html(&html_to_markdown(html));
    let twice = markdown_to_html(&html_to_markdown(&once));
    assert_eq!(once, twice);
}

// ==================== Placeholders ====================

#[test]
fn test_table_inside_code_leaves_no_placeholder() {
    let table = "<table><tr><td>x</td></tr></table>";
    let md = format!("Example:\n\n```\n{}\n```\n\nInline `{}` too", table, table);
    let html = markdown_to_html(&md);

    let escaped = "&lt;table&gt;&lt;tr&gt;&lt;td&gt;x&lt;/td&gt;&lt;/tr&gt;&lt;/table&gt;";
    assert_eq!(
        html,
        format!(
            "<p>Example:</p>\n<pre><code>{0}</code></pre>\n<p>Inline <code>{0}</code> too</p>",
            escaped
        )
    );
    assert!(!html.contains("__HTML_TABLE_"));
}

#[test]
fn test_table_inside_pre_round_trip() {
    let html = "<pre><table><tr><td>x</td></tr></table></pre>";
    let md = html_to_markdown(html);
    assert!(!md.contains("__HTML_TABLE_"));

    let back = markdown_to_html(&md);
    assert_eq!(
        back,
        "<pre><code>&lt;table&gt;&lt;tr&gt;&lt;td&gt;x&lt;/td&gt;&lt;/tr&gt;&lt;/table&gt;</code></pre>"
    );
}

// ==================== Known limitations ====================

#[test]
fn test_nested_table_ends_at_first_close() {
    let html = "<table><tr><td><table><tr><td>in</td></tr></table></td></tr></table>";
    let md = html_to_markdown(html);
    assert!(md.starts_with("<table><tr><td><table><tr><td>in</td></tr></table>"));
}

#[test]
fn test_placeholder_collision_corrupts() {
    // A document that already contains token text is an accepted edge case.
    let md = "literal <__HTML_TABLE_0__/> text\n\n<table><tr><td>t</td></tr></table>";
    let html = markdown_to_html(md);
    assert_eq!(html.matches("<table>").count(), 2);
}

// ==================== File helpers ====================

#[test]
fn test_convert_file_by_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("page.html");
    fs::write(&path, "<h1>Hello</h1>").unwrap();

    let result = convert_file(&path, &ConvertOptions::default()).unwrap();
    assert_eq!(result.source, SourceFormat::Html);
    assert_eq!(result.content, "# Hello");
    assert_eq!(result.mime_type(), "text/markdown");
}

#[test]
fn test_convert_file_by_content() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("body.txt");
    fs::write(&path, "**hi**").unwrap();

    let options = ConvertOptions::new().with_stats(true);
    let result = convert_file(&path, &options).unwrap();
    assert_eq!(result.source, SourceFormat::Markdown);
    assert_eq!(result.content, "<p><strong>hi</strong></p>");
    assert_eq!(result.stats.paragraphs, 1);
}

#[test]
fn test_convert_file_forced_source() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.md");
    fs::write(&path, "<p>raw</p>").unwrap();

    let options = ConvertOptions::new().with_source(SourceFormat::Html);
    let result = convert_file(&path, &options).unwrap();
    assert_eq!(result.content, "raw");
}

#[test]
fn test_convert_file_missing() {
    let dir = tempdir().unwrap();
    let result = convert_file(dir.path().join("nope.md"), &ConvertOptions::default());
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_convert_file_invalid_utf8() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.html");
    fs::write(&path, [0xC3, 0x28]).unwrap();

    let result = convert_file(&path, &ConvertOptions::default());
    assert!(matches!(result, Err(Error::Encoding(_))));
}
