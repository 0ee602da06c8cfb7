//! Link, interwiki and media tests through the public API.

use ferrowiki::{to_html, to_html_with_options, LinkStyle, Options};

fn with_namespace(namespace: &str) -> Options {
    Options {
        namespace: namespace.to_string(),
        ..Options::default()
    }
}

// --- Internal links ---

#[test]
fn qualified_link_with_label() {
    let html = to_html("[[a:b|Label]]");
    assert!(
        html.contains("<a href=\"/doku.php?id=a:b\" class=\"wikilink1\" title=\"a:b\">Label</a>"),
        "{html}"
    );
}

#[test]
fn link_segments_are_normalized() {
    let html = to_html("[[Projects:My Page|go]]");
    assert!(html.contains("href=\"/doku.php?id=projects:my_page\""), "{html}");
}

#[test]
fn relative_links_use_current_namespace() {
    let options = with_namespace("docs:guide");
    let html = to_html_with_options("[[intro]] [[..:faq]] [[.:sub:page]] [[:top]]", &options);
    assert!(html.contains("id=docs:guide:intro\""), "{html}");
    assert!(html.contains("id=docs:faq\""), "{html}");
    assert!(html.contains("id=docs:guide:sub:page\""), "{html}");
    assert!(html.contains("id=top\""), "{html}");
}

#[test]
fn namespace_link_points_at_start_page() {
    let html = to_html("[[manual:]]");
    assert!(html.contains("id=manual:start\""), "{html}");
}

#[test]
fn section_fragment() {
    let html = to_html("[[page#Some Section|x]]");
    assert!(html.contains("href=\"/doku.php?id=page#some_section\""), "{html}");
}

#[test]
fn path_template_links() {
    let options = Options {
        link_style: LinkStyle::PathTemplate,
        page_base: "/wiki".into(),
        media_base: "/media".into(),
        append_extension: true,
        ..Options::default()
    };
    let html = to_html_with_options("[[Guide:Read Me]] {{img:a b.png?nolink}}", &options);
    assert!(html.contains("href=\"/wiki/Guide/Read%20Me.html\""), "{html}");
    assert!(html.contains("src=\"/media/img/a%20b.png\""), "{html}");
}

#[test]
fn link_markup_inside_label_is_formatted() {
    let html = to_html("[[start|//Home// page]]");
    assert!(html.contains("><em>Home</em> page</a>"), "{html}");
}

#[test]
fn url_in_label_is_not_linked_again() {
    let html = to_html("[[start|see http://x.org]]");
    assert_eq!(html.matches("<a ").count(), 1, "{html}");
}

#[test]
fn bold_around_link() {
    let html = to_html("**[[a|b]]**");
    assert!(html.contains("<strong><a href=\"/doku.php?id=a\""), "{html}");
}

// --- External, email, share, interwiki ---

#[test]
fn external_link_is_nofollow() {
    let html = to_html("[[https://example.com/a?b=1&c=2|Example]]");
    assert!(html.contains("href=\"https://example.com/a?b=1&amp;c=2\""), "{html}");
    assert!(html.contains("class=\"urlextern\""), "{html}");
    assert!(html.contains("rel=\"nofollow\""), "{html}");
}

#[test]
fn url_query_survives_formatting_rules() {
    let html = to_html("**see https://x.org/?q=**a** now**");
    assert!(html.contains("href=\"https://x.org/?q=\""), "{html}");
}

#[test]
fn bare_url_is_linked() {
    let html = to_html("Visit https://rust-lang.org, today.");
    assert!(
        html.contains("<a href=\"https://rust-lang.org\" class=\"urlextern\""),
        "{html}"
    );
    assert!(html.contains("</a>, today."), "{html}");
}

#[test]
fn email_link() {
    let html = to_html("[[someone@example.org|write]]");
    assert!(
        html.contains("<a href=\"mailto:someone@example.org\" class=\"mail\""),
        "{html}"
    );
}

#[test]
fn interwiki_default_prefix() {
    let html = to_html("[[wp>Wiki]]");
    assert!(html.contains("href=\"https://en.wikipedia.org/wiki/Wiki\""), "{html}");
    assert!(html.contains("class=\"interwiki iw_wp\""), "{html}");
}

#[test]
fn interwiki_custom_prefix() {
    let mut options = Options::default();
    options
        .interwiki
        .insert("gh".to_string(), "https://github.com/{NAME}".to_string());
    let html = to_html_with_options("[[gh>rust-lang/rust|Rust]]", &options);
    assert!(html.contains("href=\"https://github.com/rust-lang/rust\""), "{html}");
}

#[test]
fn unknown_interwiki_is_text() {
    let html = to_html("[[zz>thing]]");
    assert!(html.contains("[[zz&gt;thing]]"), "{html}");
    assert!(!html.contains("<a "), "{html}");
}

#[test]
fn unknown_interwiki_label_leaves_no_footnote() {
    let html = to_html("[[zz>thing|see ((note))]]");
    assert!(html.contains("[[zz&gt;thing|see ((note))]]"), "{html}");
    assert!(!html.contains("footnotes"), "{html}");
}

#[test]
fn windows_share() {
    let html = to_html("[[\\\\server\\share|files]]");
    assert!(html.contains("href=\"file:///server/share\""), "{html}");
    assert!(html.contains("class=\"windows\""), "{html}");
}

// --- Media ---

#[test]
fn inline_image_with_size_and_caption() {
    let html = to_html("see {{wiki:logo.png?64|Logo}} here");
    assert!(html.contains("width=\"64\""), "{html}");
    assert!(html.contains("alt=\"Logo\""), "{html}");
    assert!(html.contains("href=\"/doku.php?do=media&amp;image=wiki:logo.png\""), "{html}");
}

#[test]
fn media_alignment_from_spaces() {
    assert!(to_html("x {{ a.png}} y").contains("class=\"mediaright\""));
    assert!(to_html("x {{a.png }} y").contains("class=\"medialeft\""));
    assert!(to_html("x {{ a.png }} y").contains("class=\"mediacenter\""));
}

#[test]
fn non_image_media_is_a_file_link() {
    let html = to_html("{{docs:report.pdf|Report}}");
    assert!(html.contains("class=\"mediafile mf_pdf\""), "{html}");
    assert!(html.contains(">Report</a>"), "{html}");
}

#[test]
fn image_inside_link_label() {
    let html = to_html("[[start|{{logo.png}}]]");
    assert_eq!(html.matches("<a ").count(), 1, "{html}");
    assert!(html.contains("<a href=\"/doku.php?id=start\""), "{html}");
    assert!(html.contains("<img src="), "{html}");
}

#[test]
fn feed_is_a_stub() {
    let html = to_html("{{rss>https://example.com/feed}}");
    assert!(html.contains("<em class=\"rss\">RSS feed</em>"), "{html}");
}

#[test]
fn relative_media_uses_namespace() {
    let html = to_html_with_options("{{.:pic.jpg?nolink}}", &with_namespace("ns"));
    assert!(html.contains("media=ns:pic.jpg\""), "{html}");
}
