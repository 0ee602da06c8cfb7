//! Link detection, target classification and href construction.

use super::scan::{find_from, Scanner};
use crate::context::{section_slug, RenderContext};
use crate::escape::{escape_text, url_encode_component_into};
use crate::namespace::{self, Target, SEPARATOR};
use crate::placeholder::{PlaceholderKind, TOKEN_START};
use crate::render::HtmlWriter;
use crate::{LinkStyle, Options};

/// Schemes recognised as bare URLs in running text.
const AUTOLINK_PREFIXES: &[&str] = &["http://", "https://", "ftp://", "www."];

/// Where a bracketed link points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkTarget<'a> {
    Email(&'a str),
    External(&'a str),
    Interwiki { prefix: &'a str, rest: &'a str },
    Share(&'a str),
    Internal { page: &'a str, fragment: Option<&'a str> },
}

/// Classify a link target. First match wins: email, absolute URL,
/// interwiki, Windows share, internal page.
fn classify(target: &str) -> LinkTarget<'_> {
    if is_email(target) {
        return LinkTarget::Email(target);
    }
    if has_scheme(target) {
        return LinkTarget::External(target);
    }
    if let Some((prefix, rest)) = target.split_once('>') {
        if !prefix.is_empty()
            && prefix
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.'))
        {
            return LinkTarget::Interwiki { prefix, rest };
        }
    }
    if target.starts_with("\\\\") {
        return LinkTarget::Share(target);
    }
    match target.split_once('#') {
        Some((page, fragment)) => LinkTarget::Internal {
            page,
            fragment: Some(fragment),
        },
        None => LinkTarget::Internal {
            page: target,
            fragment: None,
        },
    }
}

/// `local@domain.tld` with a conservative character set.
pub(super) fn is_email(text: &str) -> bool {
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    let local_ok = !local.is_empty()
        && local
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'+' | b'-'));
    let mut labels = domain.split('.');
    let domain_ok = domain.contains('.')
        && labels.all(|l| {
            !l.is_empty() && l.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        });
    local_ok && domain_ok
}

/// `scheme://…` with an RFC 3986 scheme.
fn has_scheme(text: &str) -> bool {
    let Some(pos) = text.find("://") else {
        return false;
    };
    let scheme = &text[..pos];
    scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'.' | b'-'))
}

/// Href of a page id, with an optional section fragment.
pub(crate) fn page_href(id: &str, fragment: Option<&str>, options: &Options) -> String {
    let mut href = String::with_capacity(options.page_base.len() + id.len() + 8);
    match options.link_style {
        LinkStyle::Query => {
            href.push_str(&options.page_base);
            href.push_str("?id=");
            url_encode_component_into(&mut href, id);
        }
        LinkStyle::PathTemplate => {
            push_path(&mut href, &options.page_base, id);
            if options.append_extension {
                href.push_str(".html");
            }
        }
    }
    if let Some(fragment) = fragment.filter(|f| !f.trim().is_empty()) {
        href.push('#');
        href.push_str(&section_slug(fragment));
    }
    href
}

/// Href of a media id.
pub(crate) fn media_href(id: &str, options: &Options) -> String {
    let mut href = String::with_capacity(options.media_base.len() + id.len() + 8);
    match options.link_style {
        LinkStyle::Query => {
            href.push_str(&options.media_base);
            href.push_str("?media=");
            url_encode_component_into(&mut href, id);
        }
        LinkStyle::PathTemplate => push_path(&mut href, &options.media_base, id),
    }
    href
}

fn push_path(href: &mut String, base: &str, id: &str) {
    href.push_str(base.trim_end_matches('/'));
    for segment in id.split(SEPARATOR).filter(|s| !s.is_empty()) {
        href.push('/');
        url_encode_component_into(href, segment);
    }
}

/// Expand an interwiki template for `name`.
///
/// `{URL}` receives the percent-encoded name and `{NAME}` the name as
/// typed; without either the encoded name is appended.
fn interwiki_url(template: &str, name: &str) -> String {
    let mut encoded = String::with_capacity(name.len());
    url_encode_component_into(&mut encoded, name);
    if template.contains("{URL}") || template.contains("{NAME}") {
        template.replace("{URL}", &encoded).replace("{NAME}", name)
    } else {
        format!("{template}{encoded}")
    }
}

/// Build a finished `<a>` element.
pub(super) fn anchor(href: &str, class: &str, title: Option<&str>, external: bool, label_html: &str) -> String {
    let mut writer = HtmlWriter::new();
    writer.link_start(href, class, title, external.then_some("nofollow"));
    writer.write_str(label_html);
    writer.link_end();
    writer.into_string()
}

/// Render an explicit label with link nesting disabled.
fn render_label(label: &str, ctx: &mut RenderContext<'_>) -> String {
    let outer = std::mem::replace(&mut ctx.in_link, true);
    let html = super::apply_inline(label, ctx);
    ctx.in_link = outer;
    html
}

/// `[[target|label]]`.
pub(super) fn bracketed_links(text: &str, ctx: &mut RenderContext<'_>) -> String {
    if ctx.in_link || !text.contains("[[") {
        return text.to_string();
    }
    let mut scanner = Scanner::new(text);
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while let Some(start) = find_from(text, "[[", pos) {
        let Some(close) = scanner.link_close(start + 2) else {
            break;
        };
        out.push_str(&text[pos..start]);
        let html = render_link(&text[start + 2..close], ctx).unwrap_or_else(|| {
            log::debug!("unrendered link `{}`", &text[start..close + 2]);
            escape_text(&text[start..close + 2])
        });
        out.push_str(&ctx.placeholders.insert(PlaceholderKind::Link, html));
        pos = close + 2;
    }
    out.push_str(&text[pos..]);
    out
}

/// Render the body of a bracketed link; `None` when it cannot be rendered.
fn render_link(inner: &str, ctx: &mut RenderContext<'_>) -> Option<String> {
    let (target, label) = match inner.split_once('|') {
        Some((target, label)) => (target.trim(), Some(label.trim())),
        None => (inner.trim(), None),
    };
    if target.is_empty() {
        return None;
    }
    let options = ctx.options;

    // The label may reserve placeholders, so it is rendered only once the
    // target is known to produce a link.
    let (href, class, title, external) = match classify(target) {
        LinkTarget::Email(address) => (
            format!("mailto:{address}"),
            "mail".to_string(),
            address.to_string(),
            false,
        ),
        LinkTarget::External(url) => (url.to_string(), "urlextern".to_string(), url.to_string(), true),
        LinkTarget::Interwiki { prefix, rest } => {
            let template = options
                .interwiki
                .get(prefix)
                .or_else(|| options.interwiki.get(&prefix.to_ascii_lowercase()))?;
            let url = interwiki_url(template, rest);
            let class = format!("interwiki iw_{}", prefix.to_ascii_lowercase());
            (url.clone(), class, url, false)
        }
        LinkTarget::Share(path) => {
            let url = format!("file:///{}", path.trim_start_matches('\\').replace('\\', "/"));
            (url, "windows".to_string(), path.to_string(), false)
        }
        LinkTarget::Internal { page, fragment } => {
            if page.trim().is_empty() {
                let slug = section_slug(fragment.unwrap_or_default());
                (format!("#{slug}"), "wikilink1".to_string(), slug, false)
            } else {
                let normalize = options.link_style == LinkStyle::Query;
                let id = namespace::resolve_with(page, &options.namespace, Target::Page, normalize);
                let href = page_href(&id, fragment, options);
                (href, "wikilink1".to_string(), id, false)
            }
        }
    };

    let label_html = match label.filter(|l| !l.is_empty()) {
        Some(label) => render_label(label, ctx),
        None => escape_text(target),
    };
    Some(anchor(&href, &class, Some(&title), external, &label_html))
}

/// Bare URLs and `<email>` addresses in running text.
pub(super) fn autolinks(text: &str, ctx: &mut RenderContext<'_>) -> String {
    if ctx.in_link {
        return text.to_string();
    }
    let bytes = text.as_bytes();
    let mut scanner = Scanner::new(text);
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    let mut i = 0;
    while i < bytes.len() {
        if let Some(end) = scanner.bracketed_span_end(i) {
            i = end;
            continue;
        }
        match bytes[i] {
            b'<' => {
                // Only address characters may sit between `<` and `>`.
                let len = bytes[i + 1..].iter().take_while(|&&b| is_address_byte(b)).count();
                if bytes.get(i + 1 + len) == Some(&b'>') {
                    let address = &text[i + 1..i + 1 + len];
                    if is_email(address) {
                        out.push_str(&text[pos..i]);
                        let html = anchor(
                            &format!("mailto:{address}"),
                            "mail",
                            Some(address),
                            false,
                            &escape_text(address),
                        );
                        out.push_str(&ctx.placeholders.insert(PlaceholderKind::Link, html));
                        i += len + 2;
                        pos = i;
                        continue;
                    }
                }
            }
            b'h' | b'f' | b'w' if at_word_start(text, i) => {
                if let Some(len) = url_len(&text[i..]) {
                    let url = &text[i..i + len];
                    out.push_str(&text[pos..i]);
                    let href = if url.starts_with("www.") {
                        format!("http://{url}")
                    } else {
                        url.to_string()
                    };
                    let html = anchor(&href, "urlextern", Some(&href), true, &escape_text(url));
                    out.push_str(&ctx.placeholders.insert(PlaceholderKind::Link, html));
                    i += len;
                    pos = i;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
        while i < bytes.len() && !text.is_char_boundary(i) {
            i += 1;
        }
    }
    out.push_str(&text[pos..]);
    out
}

fn is_address_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'+' | b'-' | b'@')
}

fn at_word_start(text: &str, i: usize) -> bool {
    text[..i].chars().next_back().is_none_or(|c| {
        !c.is_alphanumeric() && !matches!(c, '/' | ':' | '.' | '@' | '_' | '-' | '%')
    })
}

fn is_url_char(c: char) -> bool {
    c.is_alphanumeric()
        || matches!(
            c,
            '/' | '#' | '~' | ':' | '.' | '?' | '+' | '=' | '&' | '%' | '@' | '!' | '-' | ';'
                | ',' | '_' | '(' | ')' | '$' | '\''
        )
}

/// Length of the bare URL at the start of `rest`, if there is one.
fn url_len(rest: &str) -> Option<usize> {
    let prefix = AUTOLINK_PREFIXES.iter().find(|p| rest.starts_with(**p))?;
    let body_len: usize = rest[prefix.len()..]
        .chars()
        .take_while(|&c| c != TOKEN_START && is_url_char(c))
        .map(char::len_utf8)
        .sum();
    let mut url = &rest[..prefix.len() + body_len];
    loop {
        let trimmed = url.trim_end_matches(['.', ',', ';', ':', '!', '?', '\'']);
        let trimmed = match trimmed.strip_suffix(')') {
            Some(t) if t.matches('(').count() < trimmed.matches(')').count() => t,
            _ => trimmed,
        };
        if trimmed.len() == url.len() {
            break;
        }
        url = trimmed;
    }
    (url.len() > prefix.len()).then_some(url.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::apply_inline_resolved;

    fn render_with(text: &str, options: &Options) -> String {
        let mut ctx = RenderContext::new(options);
        apply_inline_resolved(text, &mut ctx)
    }

    fn render(text: &str) -> String {
        render_with(text, &Options::default())
    }

    #[test]
    fn classification_order() {
        assert_eq!(classify("me@example.com"), LinkTarget::Email("me@example.com"));
        assert_eq!(classify("https://x.org"), LinkTarget::External("https://x.org"));
        assert_eq!(
            classify("wp>Rust"),
            LinkTarget::Interwiki { prefix: "wp", rest: "Rust" }
        );
        assert_eq!(classify("\\\\srv\\share"), LinkTarget::Share("\\\\srv\\share"));
        assert_eq!(
            classify("a:b#Intro"),
            LinkTarget::Internal { page: "a:b", fragment: Some("Intro") }
        );
    }

    #[test]
    fn internal_link_with_label() {
        assert_eq!(
            render("[[a:b|Label]]"),
            "<a href=\"/doku.php?id=a:b\" class=\"wikilink1\" title=\"a:b\">Label</a>"
        );
    }

    #[test]
    fn internal_link_defaults_to_target_text() {
        assert_eq!(
            render("[[Some Page]]"),
            "<a href=\"/doku.php?id=some_page\" class=\"wikilink1\" title=\"some_page\">Some Page</a>"
        );
    }

    #[test]
    fn internal_link_in_namespace_with_fragment() {
        let options = Options {
            namespace: "wiki".into(),
            ..Options::default()
        };
        assert_eq!(
            render_with("[[syntax#Tables Here]]", &options),
            "<a href=\"/doku.php?id=wiki:syntax#tables_here\" class=\"wikilink1\" title=\"wiki:syntax\">syntax#Tables Here</a>"
        );
    }

    #[test]
    fn section_only_link() {
        assert_eq!(
            render("[[#Usage|up]]"),
            "<a href=\"#usage\" class=\"wikilink1\" title=\"usage\">up</a>"
        );
    }

    #[test]
    fn path_template_hrefs() {
        let options = Options {
            link_style: LinkStyle::PathTemplate,
            page_base: "/wiki/".into(),
            append_extension: true,
            ..Options::default()
        };
        assert_eq!(page_href("a:My Page", None, &options), "/wiki/a/My%20Page.html");
        assert_eq!(media_href("img:x.png", &options), "/lib/exe/fetch.php/img/x.png");
        let html = render_with("[[A:Page]]", &options);
        assert!(html.starts_with("<a href=\"/wiki/A/Page.html\""));
    }

    #[test]
    fn external_link() {
        assert_eq!(
            render("[[https://x.org/?a=1&b=2|site]]"),
            "<a href=\"https://x.org/?a=1&amp;b=2\" class=\"urlextern\" title=\"https://x.org/?a=1&amp;b=2\" rel=\"nofollow\">site</a>"
        );
    }

    #[test]
    fn email_link() {
        assert_eq!(
            render("[[me@example.com]]"),
            "<a href=\"mailto:me@example.com\" class=\"mail\" title=\"me@example.com\">me@example.com</a>"
        );
    }

    #[test]
    fn interwiki_templates() {
        assert_eq!(interwiki_url("https://w.org/wiki/{NAME}", "A B"), "https://w.org/wiki/A B");
        assert_eq!(interwiki_url("https://g.com/search?q={URL}", "a b"), "https://g.com/search?q=a%20b");
        assert_eq!(interwiki_url("https://d.org/", "x&y"), "https://d.org/x%26y");
    }

    #[test]
    fn interwiki_link() {
        let html = render("[[wp>Rust (language)|Rust]]");
        assert!(html.contains("class=\"interwiki iw_wp\""));
        assert!(html.contains("Rust%20(language)"));
        assert!(html.ends_with(">Rust</a>"));
    }

    #[test]
    fn unknown_interwiki_passes_through() {
        assert_eq!(render("[[nope>**x**]]"), "[[nope&gt;**x**]]");
    }

    #[test]
    fn unknown_interwiki_label_is_not_rendered() {
        let options = Options::default();
        let mut ctx = RenderContext::new(&options);
        let html = apply_inline_resolved("[[nope>x|**b** ((note))]]", &mut ctx);
        assert_eq!(html, "[[nope&gt;x|**b** ((note))]]");
        assert!(ctx.footnotes.is_empty());
    }

    #[test]
    fn bare_email_needs_address_characters() {
        assert_eq!(render("<a b@c.org>"), "&lt;a b@c.org&gt;");
        assert_eq!(render("<<<x@y.org>"), "&lt;&lt;<a href=\"mailto:x@y.org\" class=\"mail\" title=\"x@y.org\">x@y.org</a>");
    }

    #[test]
    fn windows_share() {
        assert_eq!(
            render("[[\\\\srv\\docs]]"),
            "<a href=\"file:///srv/docs\" class=\"windows\" title=\"\\\\srv\\docs\">\\\\srv\\docs</a>"
        );
    }

    #[test]
    fn formatted_label() {
        assert_eq!(
            render("[[start|**Home**]]"),
            "<a href=\"/doku.php?id=start\" class=\"wikilink1\" title=\"start\"><strong>Home</strong></a>"
        );
    }

    #[test]
    fn bare_urls() {
        assert_eq!(
            render("see http://x.org/a."),
            "see <a href=\"http://x.org/a\" class=\"urlextern\" title=\"http://x.org/a\" rel=\"nofollow\">http://x.org/a</a>."
        );
        assert!(render("www.example.com").starts_with("<a href=\"http://www.example.com\""));
        assert_eq!(render("nohttp://x"), "nohttp://x");
    }

    #[test]
    fn url_keeps_balanced_parens() {
        let html = render("(see http://w.org/A_(b))");
        assert!(html.contains("href=\"http://w.org/A_(b)\""));
        assert!(html.ends_with("</a>)"));
    }

    #[test]
    fn bare_email() {
        assert_eq!(
            render("mail <me@example.com>"),
            "mail <a href=\"mailto:me@example.com\" class=\"mail\" title=\"me@example.com\">me@example.com</a>"
        );
    }

    #[test]
    fn urls_inside_brackets_are_left_to_links() {
        let html = render("[[http://x.org|x]]");
        assert_eq!(html.matches("<a ").count(), 1);
    }
}
