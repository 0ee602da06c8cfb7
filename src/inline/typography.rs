//! Typographic substitutions and smileys.

use super::scan::{is_boundary, map_plain};
use crate::context::RenderContext;
use crate::placeholder::{TOKEN_END, TOKEN_START};
use crate::escape::escape_attr_into;
use crate::SmileyMode;

/// Substitutions, longest pattern first.
const TYPOGRAPHY: &[(&str, &str)] = &[
    ("(tm)", "\u{2122}"),
    ("<->", "\u{2194}"),
    ("<=>", "\u{21D4}"),
    ("---", "\u{2014}"),
    ("...", "\u{2026}"),
    ("(c)", "\u{00A9}"),
    ("(r)", "\u{00AE}"),
    ("->", "\u{2192}"),
    ("<-", "\u{2190}"),
    ("=>", "\u{21D2}"),
    ("<=", "\u{21D0}"),
    ("--", "\u{2013}"),
];

/// Smiley code, emoji glyph and image file name.
const SMILEYS: &[(&str, &str, &str)] = &[
    ("DELETEME", "\u{1F5D1}", "delete.gif"),
    ("FIXME", "\u{1F527}", "fixme.gif"),
    ("^_^", "\u{1F604}", "icon_fun.gif"),
    ("LOL", "\u{1F606}", "icon_lol.gif"),
    (":?:", "\u{2753}", "icon_question.gif"),
    (":!:", "\u{2757}", "icon_exclaim.gif"),
    ("8-)", "\u{1F60E}", "icon_cool.gif"),
    ("8-O", "\u{1F632}", "icon_eek.gif"),
    ("8-o", "\u{1F632}", "icon_eek.gif"),
    (":-(", "\u{1F641}", "icon_sad.gif"),
    (":-)", "\u{1F642}", "icon_smile.gif"),
    (":-/", "\u{1F615}", "icon_doubt.gif"),
    (":-\\", "\u{1F615}", "icon_doubt2.gif"),
    (":-?", "\u{1F615}", "icon_confused.gif"),
    (":-D", "\u{1F600}", "icon_biggrin.gif"),
    (":-P", "\u{1F61B}", "icon_razz.gif"),
    (":-o", "\u{1F62E}", "icon_surprised.gif"),
    (":-O", "\u{1F62E}", "icon_surprised.gif"),
    (":-x", "\u{1F636}", "icon_silenced.gif"),
    (":-X", "\u{1F636}", "icon_silenced.gif"),
    (":-|", "\u{1F610}", "icon_neutral.gif"),
    (";-)", "\u{1F609}", "icon_wink.gif"),
    ("=)", "\u{1F642}", "icon_smile2.gif"),
    ("m(", "\u{1F926}", "facepalm.gif"),
];

pub(super) fn typography(text: &str, ctx: &mut RenderContext<'_>) -> String {
    if !ctx.options.typography {
        return text.to_string();
    }
    map_plain(text, substitute)
}

fn substitute(segment: &str, out: &mut String) {
    let bytes = segment.as_bytes();
    let mut copied = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' | b'-' | b'=' | b'.' | b'(' => {
                let rest = &segment[i..];
                if let Some((pattern, glyph)) = TYPOGRAPHY.iter().find(|(p, _)| rest.starts_with(p)) {
                    out.push_str(&segment[copied..i]);
                    out.push_str(glyph);
                    i += pattern.len();
                    copied = i;
                    continue;
                }
            }
            b'x' if is_dimension(bytes, i) => {
                out.push_str(&segment[copied..i]);
                out.push('\u{00D7}');
                i += 1;
                copied = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    out.push_str(&segment[copied..]);
}

/// `640x480`: digits on both sides of `x`, standing alone as a word.
fn is_dimension(bytes: &[u8], x: usize) -> bool {
    let before = bytes[..x].iter().rev().take_while(|b| b.is_ascii_digit()).count();
    let after = bytes[x + 1..].iter().take_while(|b| b.is_ascii_digit()).count();
    if before == 0 || after == 0 {
        return false;
    }
    let left_ok = x == before || !bytes[x - before - 1].is_ascii_alphanumeric();
    let right = x + 1 + after;
    let right_ok = right == bytes.len() || !bytes[right].is_ascii_alphanumeric();
    left_ok && right_ok
}

/// Replace emoticons that stand between whitespace or line edges.
///
/// Boundaries are checked against the whole text, so a placeholder token
/// next to a code counts as a neighbouring word, not as a line edge.
pub(super) fn smileys(text: &str, ctx: &mut RenderContext<'_>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = 0;
    while i < text.len() {
        let rest = &text[i..];
        if rest.starts_with(TOKEN_START) {
            i = rest.find(TOKEN_END).map_or(text.len(), |e| i + e + TOKEN_END.len_utf8());
            continue;
        }
        if is_boundary(text[..i].chars().next_back()) {
            let found = SMILEYS.iter().find(|(code, _, _)| {
                rest.starts_with(code) && is_boundary(rest[code.len()..].chars().next())
            });
            if let Some(&(code, glyph, file)) = found {
                out.push_str(&text[copied..i]);
                match ctx.options.smileys {
                    SmileyMode::Emoji => out.push_str(glyph),
                    SmileyMode::Image => {
                        let mut html = String::from("<img src=\"");
                        escape_attr_into(&mut html, ctx.options.smiley_base.trim_end_matches('/'));
                        html.push('/');
                        html.push_str(file);
                        html.push_str("\" class=\"icon smiley\" alt=\"");
                        escape_attr_into(&mut html, code);
                        html.push_str("\" />");
                        out.push_str(&ctx.raw(html));
                    }
                }
                i += code.len();
                copied = i;
                continue;
            }
        }
        i += rest.chars().next().map_or(1, char::len_utf8);
    }
    out.push_str(&text[copied..]);
    out
}
