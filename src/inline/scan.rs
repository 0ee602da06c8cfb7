//! Substring scanning helpers shared by the inline stages.

use crate::placeholder::{TOKEN_END, TOKEN_START};
use memchr::memmem;
use smallvec::SmallVec;

/// Find `needle` in `haystack` at or after byte offset `from`.
#[inline]
pub fn find_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    memmem::find(&haystack.as_bytes()[from..], needle.as_bytes()).map(|p| p + from)
}

/// Replace every `open … close` span.
///
/// `f` receives the inner text and returns the replacement, or `None` to
/// keep the opener literal and continue scanning right after it. An opener
/// without a closer ends the scan.
pub fn replace_delimited<F>(text: &str, open: &str, close: &str, mut f: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while let Some(start) = find_from(text, open, pos) {
        let inner_start = start + open.len();
        let Some(end) = find_from(text, close, inner_start) else {
            break;
        };
        out.push_str(&text[pos..start]);
        match f(&text[inner_start..end]) {
            Some(replacement) => {
                out.push_str(&replacement);
                pos = end + close.len();
            }
            None => {
                out.push_str(open);
                pos = inner_start;
            }
        }
    }
    out.push_str(&text[pos..]);
    out
}

/// Apply `f` to every stretch of text between placeholder tokens; tokens
/// are copied through untouched.
pub fn map_plain<F>(text: &str, mut f: F) -> String
where
    F: FnMut(&str, &mut String),
{
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    let mut pos = 0;
    while let Some(rel) = text[pos..].find(TOKEN_START) {
        let start = pos + rel;
        f(&text[pos..start], &mut out);
        let end = text[start..]
            .find(TOKEN_END)
            .map_or(text.len(), |e| start + e + TOKEN_END.len_utf8());
        out.push_str(&text[start..end]);
        pos = end;
    }
    f(&text[pos..], &mut out);
    out
}

/// Closing-delimiter search over one text that remembers its answers.
///
/// Without it every unclosed opener searches to the end of the text
/// again. Per needle the scanner keeps the first match at or after the
/// last searched offset, or that there is none, so a left-to-right scan
/// over any number of openers stays linear.
#[derive(Debug)]
pub struct Scanner<'t> {
    text: &'t str,
    memo: SmallVec<[Memo; 4]>,
}

/// First match of `needle` at or after `from`.
#[derive(Debug, Clone, Copy)]
struct Memo {
    needle: &'static str,
    from: usize,
    hit: Option<usize>,
}

impl<'t> Scanner<'t> {
    pub fn new(text: &'t str) -> Self {
        Self {
            text,
            memo: SmallVec::new(),
        }
    }

    /// Find `needle` at or after byte offset `from`.
    pub fn find(&mut self, needle: &'static str, from: usize) -> Option<usize> {
        let slot = self.memo.iter().position(|m| m.needle == needle);
        if let Some(m) = slot.map(|i| self.memo[i]) {
            if from >= m.from && m.hit.is_none_or(|hit| from <= hit) {
                return m.hit;
            }
        }
        let hit = find_from(self.text, needle, from);
        let memo = Memo { needle, from, hit };
        match slot {
            Some(i) => self.memo[i] = memo,
            None => self.memo.push(memo),
        }
        hit
    }

    /// End of a `[[…]]` or `{{…}}` span starting at `pos`, if one starts there.
    pub fn bracketed_span_end(&mut self, pos: usize) -> Option<usize> {
        let rest = &self.text[pos..];
        if rest.starts_with("[[") {
            self.link_close(pos + 2).map(|end| end + 2)
        } else if rest.starts_with("{{") {
            self.find("}}", pos + 2).map(|end| end + 2)
        } else {
            None
        }
    }

    /// Position of the `]]` closing a link whose body starts at `from`,
    /// skipping media embeds inside the label.
    pub fn link_close(&mut self, from: usize) -> Option<usize> {
        let mut pos = from;
        loop {
            let close = self.find("]]", pos)?;
            match self.find("{{", pos) {
                Some(media) if media < close => {
                    pos = self.find("}}", media + 2)? + 2;
                }
                _ => return Some(close),
            }
        }
    }
}

/// Whether `c` separates words for boundary-sensitive rules.
#[inline]
pub fn is_boundary(c: Option<char>) -> bool {
    c.is_none_or(char::is_whitespace)
}
