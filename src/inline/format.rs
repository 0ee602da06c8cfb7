//! Protected spans, character formatting and embedded HTML/PHP.

use super::scan::{find_from, replace_delimited, Scanner};
use crate::context::RenderContext;
use crate::escape::{escape_attr_into, escape_text, escape_text_into};
use crate::placeholder::{PlaceholderKind, Token};

/// Paired formatting markers and the tags they produce, applied in order.
const PAIRS: &[(&str, &str, &str, &str)] = &[
    ("**", "**", "<strong>", "</strong>"),
    ("//", "//", "<em>", "</em>"),
    ("__", "__", "<em class=\"u\">", "</em>"),
    ("''", "''", "<code>", "</code>"),
    ("<del>", "</del>", "<del>", "</del>"),
    ("<sub>", "</sub>", "<sub>", "</sub>"),
    ("<sup>", "</sup>", "<sup>", "</sup>"),
];

/// Inline spans whose content is rendered by [`embedded_code`].
const EMBEDDED: &[(&str, &str, &str)] = &[("<html>", "</html>", "html"), ("<php>", "</php>", "php")];

/// `<nowiki>…</nowiki>`, `<html>`/`<php>` sources and inline `<code>…</code>`.
pub(super) fn protected_spans(text: &str, ctx: &mut RenderContext<'_>) -> String {
    let mut text = if text.contains("<nowiki>") {
        replace_delimited(text, "<nowiki>", "</nowiki>", |inner| {
            Some(ctx.raw(escape_text(inner)))
        })
    } else {
        text.to_string()
    };
    for &(open, close, _) in EMBEDDED {
        if text.contains(open) {
            text = park_embedded(&text, open, close, ctx);
        }
    }
    if text.contains("<code") {
        inline_code(&text, ctx)
    } else {
        text
    }
}

/// Hide the source of each embedded span behind an [`PlaceholderKind::Embedded`]
/// token, keeping the tags so the span is still recognised later.
fn park_embedded(text: &str, open: &str, close: &str, ctx: &mut RenderContext<'_>) -> String {
    replace_delimited(text, open, close, |inner| {
        let token = ctx.placeholders.reserve(PlaceholderKind::Embedded);
        ctx.placeholders.fill(token, inner.to_string());
        Some(format!("{open}{}{close}", token.text()))
    })
}

fn inline_code(text: &str, ctx: &mut RenderContext<'_>) -> String {
    let mut scanner = Scanner::new(text);
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    let mut search = 0;
    while let Some(start) = find_from(text, "<code", search) {
        let after = start + "<code".len();
        let Some(gt) = scanner.find(">", after) else {
            break;
        };
        let attrs = &text[after..gt];
        if !(attrs.is_empty() || attrs.starts_with(char::is_whitespace)) || attrs.contains('<') {
            search = after;
            continue;
        }
        let Some(close) = scanner.find("</code>", gt + 1) else {
            break;
        };
        out.push_str(&text[pos..start]);

        let mut html = String::from("<code");
        if let Some(lang) = attrs.split_whitespace().next() {
            html.push_str(" class=\"code ");
            escape_attr_into(&mut html, lang);
            html.push('"');
        }
        html.push('>');
        escape_text_into(&mut html, &text[gt + 1..close]);
        html.push_str("</code>");
        out.push_str(&ctx.raw(html));

        pos = close + "</code>".len();
        search = pos;
    }
    out.push_str(&text[pos..]);
    out
}

/// `%%…%%` spans are shown as typed.
pub(super) fn no_format_spans(text: &str, ctx: &mut RenderContext<'_>) -> String {
    if !text.contains("%%") {
        return text.to_string();
    }
    replace_delimited(text, "%%", "%%", |inner| Some(ctx.raw(escape_text(inner))))
}

/// Paired formatting markers and forced line breaks.
pub(super) fn formatting(text: &str, ctx: &mut RenderContext<'_>) -> String {
    let mut current = line_breaks(text, ctx);
    for &(open, close, open_tag, close_tag) in PAIRS {
        if !current.contains(open) {
            continue;
        }
        current = replace_delimited(&current, open, close, |inner| {
            if inner.trim().is_empty() {
                return None;
            }
            let open = ctx.raw(open_tag);
            let close = ctx.raw(close_tag);
            Some(format!("{open}{inner}{close}"))
        });
    }
    current
}

/// `\\` followed by whitespace or the end of the text.
fn line_breaks(text: &str, ctx: &mut RenderContext<'_>) -> String {
    if !text.contains("\\\\") {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    let mut search = 0;
    while let Some(at) = find_from(text, "\\\\", search) {
        let after = at + 2;
        if text[after..].chars().next().is_none_or(char::is_whitespace) {
            out.push_str(&text[pos..at]);
            out.push_str(&ctx.raw("<br />"));
            pos = after;
            search = after;
        } else {
            search = at + 1;
        }
    }
    out.push_str(&text[pos..]);
    out
}

/// Inline `<html>` and `<php>` spans, rendered from the source parked by
/// [`protected_spans`].
pub(super) fn embedded_code(text: &str, ctx: &mut RenderContext<'_>) -> String {
    let mut current = text.to_string();
    for &(open, close, lang) in EMBEDDED {
        if !current.contains(open) {
            continue;
        }
        current = replace_delimited(&current, open, close, |inner| {
            let token = Token::parse(inner)
                .filter(|&t| ctx.placeholders.kind(t) == Some(PlaceholderKind::Embedded))?;
            let source = ctx.placeholders.take(token)?;
            let html = match (ctx.options.allow_html, lang) {
                (true, "php") => format!("<?php {source} ?>"),
                (true, _) => source,
                (false, _) => format!("<code class=\"code {lang}\">{}</code>", escape_text(&source)),
            };
            ctx.placeholders.fill(token, html);
            Some(token.text())
        });
    }
    current
}
