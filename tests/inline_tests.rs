//! Inline formatting tests through the public API.

use ferrowiki::inline::STAGES;
use ferrowiki::{to_html, to_html_with_options, Options, SmileyMode};

/// Render a single paragraph and return its inner HTML.
fn inline(input: &str) -> String {
    inline_with(input, &Options::default())
}

fn inline_with(input: &str, options: &Options) -> String {
    let html = to_html_with_options(input, options);
    html.strip_prefix("<div class=\"wikitext\">\n<p>\n")
        .and_then(|h| h.strip_suffix("\n</p>\n</div>\n"))
        .unwrap_or_else(|| panic!("not a single paragraph: {html}"))
        .to_string()
}

#[test]
fn stage_order_is_fixed() {
    let names: Vec<_> = STAGES.iter().map(|stage| stage.name).collect();
    assert_eq!(
        names,
        [
            "control_macros",
            "protected_spans",
            "autolinks",
            "links",
            "media",
            "no_format",
            "formatting",
            "embedded_code",
            "typography",
            "smileys",
        ]
    );
}

#[test]
fn emphasis_pairs() {
    assert_eq!(inline("**b** //i// __u__ ''m''"), "<strong>b</strong> <em>i</em> <em class=\"u\">u</em> <code>m</code>");
}

#[test]
fn deleted_sub_sup() {
    assert_eq!(inline("<del>old</del> x<sub>1</sub> y<sup>2</sup>"), "<del>old</del> x<sub>1</sub> y<sup>2</sup>");
}

#[test]
fn unclosed_markers_are_text() {
    assert_eq!(inline("5 ** 2 and // comment"), "5 ** 2 and // comment");
}

#[test]
fn url_slashes_are_not_italic() {
    let html = inline("//see http://a.org/x now//");
    assert!(html.starts_with("<em>see <a href=\"http://a.org/x\""), "{html}");
    assert!(html.ends_with("</a> now</em>"), "{html}");
}

#[test]
fn nowiki_and_percent_spans() {
    assert_eq!(inline("<nowiki>**raw** [[x]]</nowiki>"), "**raw** [[x]]");
    assert_eq!(inline("%%//raw//%%"), "//raw//");
}

#[test]
fn inline_code() {
    assert_eq!(inline("use <code>a && b</code>"), "use <code>a &amp;&amp; b</code>");
}

#[test]
fn raw_html_is_escaped_unless_allowed() {
    assert_eq!(inline("<b>x</b>"), "&lt;b&gt;x&lt;/b&gt;");
    assert_eq!(
        inline("a <html><i>x</i></html>"),
        "a <code class=\"code html\">&lt;i&gt;x&lt;/i&gt;</code>"
    );
    let options = Options {
        allow_html: true,
        ..Options::default()
    };
    assert_eq!(inline_with("a <html><i>x</i></html>", &options), "a <i>x</i>");
}

#[test]
fn forced_line_break() {
    assert_eq!(inline("one\\\\ two"), "one<br /> two");
}

#[test]
fn typography() {
    assert_eq!(inline("a -> b"), "a \u{2192} b");
    assert_eq!(inline("wait..."), "wait\u{2026}");
    assert_eq!(inline("1920x1080"), "1920\u{00D7}1080");
    assert_eq!(inline("(c) 2024"), "\u{00A9} 2024");
}

#[test]
fn typography_disabled() {
    let options = Options {
        typography: false,
        ..Options::default()
    };
    assert_eq!(inline_with("a -> b", &options), "a -&gt; b");
}

#[test]
fn typography_skips_links() {
    let html = inline("[[a--b]]");
    assert!(html.contains("title=\"a--b\""), "{html}");
    assert!(html.contains(">a--b</a>"), "{html}");
}

#[test]
fn smileys_as_emoji() {
    assert_eq!(inline("nice :-)"), "nice \u{1F642}");
    assert_eq!(inline("a:-)b"), "a:-)b");
}

#[test]
fn smileys_need_whitespace_next_to_markup() {
    let html = inline("**x**:-) and [[a]]FIXME");
    assert!(html.starts_with("<strong>x</strong>:-) and "), "{html}");
    assert!(html.ends_with("</a>FIXME"), "{html}");
    assert!(!html.contains('\u{1F642}') && !html.contains('\u{1F527}'), "{html}");
}

#[test]
fn smileys_as_images() {
    let options = Options {
        smileys: SmileyMode::Image,
        ..Options::default()
    };
    assert_eq!(
        inline_with("FIXME", &options),
        "<img src=\"/lib/images/smileys/fixme.gif\" class=\"icon smiley\" alt=\"FIXME\" />"
    );
}

#[test]
fn placeholder_characters_cannot_be_injected() {
    let html = to_html("\u{E000}0\u{E001}[[a]]");
    assert!(!html.contains('\u{E000}'));
    assert_eq!(html.matches("<a ").count(), 1, "{html}");
}

#[test]
fn deep_nesting_is_bounded() {
    let input = format!("{}x{}", "[[a|".repeat(40), "]]".repeat(40));
    let html = to_html(&input);
    assert!(html.starts_with("<div class=\"wikitext\">"));
}

#[test]
fn runs_of_unclosed_openers() {
    let html = to_html(&"<".repeat(20_000));
    assert_eq!(html.matches("&lt;").count(), 20_000);

    let html = to_html(&"{{ ".repeat(10_000));
    assert_eq!(html.matches("{{").count(), 10_000);

    let html = to_html(&"[[ {{ ".repeat(5_000));
    assert_eq!(html.matches("[[").count(), 5_000);
    assert!(!html.contains("<a "), "{}", &html[..200]);
}

#[test]
fn embedded_html_source_is_escaped_as_typed() {
    assert_eq!(
        inline("a <html><del>x</del></html>"),
        "a <code class=\"code html\">&lt;del&gt;x&lt;/del&gt;</code>"
    );
}
