//! HTML escaping and URL encoding utilities.
//!
//! Fast-path optimized: scans for first escapable character,
//! then bulk-copies segments between escapes.

use memchr::{memchr, memchr3};

/// Lookup table for escapable characters in text content.
/// Note: `"` is escaped too so text can be reused inside attributes.
const TEXT_ESCAPE_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    table[b'<' as usize] = true;
    table[b'>' as usize] = true;
    table[b'&' as usize] = true;
    table[b'"' as usize] = true;
    table
};

/// Escape HTML text content into output buffer.
///
/// Escapes `<`, `>`, `&` and `"` to their HTML entity equivalents.
///
/// # Example
/// ```
/// use ferrowiki::escape::escape_text_into;
///
/// let mut out = String::new();
/// escape_text_into(&mut out, "<script>");
/// assert_eq!(out, "&lt;script&gt;");
/// ```
#[inline]
pub fn escape_text_into(out: &mut String, input: &str) {
    if input.is_empty() {
        return;
    }

    let bytes = input.as_bytes();
    let mut pos = match first_text_escape(bytes) {
        Some(p) => p,
        None => {
            out.push_str(input);
            return;
        }
    };

    out.push_str(&input[..pos]);

    while pos < bytes.len() {
        let scan_start = pos;
        while pos < bytes.len() && !TEXT_ESCAPE_TABLE[bytes[pos] as usize] {
            pos += 1;
        }

        // Escapable bytes are ASCII, so both ends are char boundaries.
        if pos > scan_start {
            out.push_str(&input[scan_start..pos]);
        }

        if pos < bytes.len() {
            out.push_str(match bytes[pos] {
                b'<' => "&lt;",
                b'>' => "&gt;",
                b'&' => "&amp;",
                _ => "&quot;",
            });
            pos += 1;
        }
    }
}

/// Escape an attribute value (double-quoted context) into output buffer.
#[inline]
pub fn escape_attr_into(out: &mut String, input: &str) {
    html_escape::encode_double_quoted_attribute_to_string(input, out);
}

#[inline]
fn first_text_escape(input: &[u8]) -> Option<usize> {
    let a = memchr3(b'<', b'>', b'&', input);
    let b = memchr(b'"', input);
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Escape and return as a String.
///
/// Prefer `escape_text_into` to reuse buffers.
pub fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 8);
    escape_text_into(&mut out, input);
    out
}

const HEX: &[u8; 16] = b"0123456789ABCDEF";

#[inline]
fn push_percent(out: &mut String, b: u8) {
    out.push('%');
    out.push(HEX[(b >> 4) as usize] as char);
    out.push(HEX[(b & 0xF) as usize] as char);
}

/// Percent-encode a value for use as one URL component (path segment or
/// query value), then write it HTML-safe.
///
/// Unreserved characters (`A-Z a-z 0-9 - _ . ~`) and `:` pass through so
/// page ids stay readable in query strings.
pub fn url_encode_component_into(out: &mut String, input: &str) {
    for &b in input.as_bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b':' => {
                out.push(b as char)
            }
            _ => push_percent(out, b),
        }
    }
}

/// Write a user-supplied absolute URL into an `href`/`src` attribute.
///
/// Spaces, quotes, control characters and non-ASCII bytes are
/// percent-encoded; `&`, `<`, `>` and `'` are HTML-escaped.
pub fn url_attr_into(out: &mut String, url: &str) {
    for &b in url.as_bytes() {
        match b {
            b' ' => out.push_str("%20"),
            b'"' => out.push_str("%22"),
            b'\\' => out.push_str("%5C"),
            b'<' => out.push_str("&lt;"),
            b'>' => out.push_str("&gt;"),
            b'&' => out.push_str("&amp;"),
            b'\'' => out.push_str("&#39;"),
            0x00..=0x1F | 0x7F..=0xFF => push_percent(out, b),
            _ => out.push(b as char),
        }
    }
}
