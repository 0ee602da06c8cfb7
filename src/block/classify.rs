//! Line classification.
//!
//! Every line outside a literal block is run through [`CLASSIFIERS`] in
//! order and the first match decides what the line is. Blank lines are
//! recognised before the table is consulted.

use super::event::{ListKind, LiteralKind};
use crate::inline::is_standalone_embed;
use crate::limits::{MAX_LIST_DEPTH, MAX_QUOTE_DEPTH};
use crate::Range;

/// A classified line. Ranges are absolute offsets into the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Blank,
    /// Opening tag of a literal block; `rest` follows the tag's `>`.
    LiteralOpen {
        kind: LiteralKind,
        lang: Option<Range>,
        filename: Option<Range>,
        rest: Range,
    },
    TableRow,
    ListItem {
        depth: u8,
        kind: ListKind,
        text: Range,
    },
    /// Indented text; `text` has the indentation removed.
    Preformatted { text: Range },
    Quote { level: u8, text: Range },
    Heading { level: u8, text: Range },
    Rule,
    Media,
    Paragraph,
}

/// Signature of one classifier: the line text and its range.
pub type ClassifyFn = fn(&str, Range) -> Option<Line>;

/// A named line classifier.
#[derive(Clone, Copy)]
pub struct Classifier {
    pub name: &'static str,
    pub run: ClassifyFn,
}

/// The classifiers, in precedence order.
pub const CLASSIFIERS: &[Classifier] = &[
    Classifier { name: "literal", run: literal_open },
    Classifier { name: "table", run: table_row },
    Classifier { name: "list", run: list_item },
    Classifier { name: "preformatted", run: preformatted },
    Classifier { name: "quote", run: quote },
    Classifier { name: "heading", run: heading },
    Classifier { name: "rule", run: rule },
    Classifier { name: "media", run: media },
    Classifier { name: "paragraph", run: paragraph },
];

/// Classify one line.
pub fn classify(input: &str, range: Range) -> Line {
    let line = range.slice(input);
    if line.trim().is_empty() {
        return Line::Blank;
    }
    CLASSIFIERS
        .iter()
        .find_map(|classifier| (classifier.run)(line, range))
        .unwrap_or(Line::Paragraph)
}

/// Indentation width in columns (tab = 2) and its byte length.
fn indentation(line: &str) -> (usize, usize) {
    let mut columns = 0;
    let mut bytes = 0;
    for b in line.bytes() {
        match b {
            b' ' => columns += 1,
            b'\t' => columns += 2,
            _ => break,
        }
        bytes += 1;
    }
    (columns, bytes)
}

fn literal_open(line: &str, range: Range) -> Option<Line> {
    let indent = line.len() - line.trim_start().len();
    let body = &line[indent..];
    let (kind, tag_len) = [
        (LiteralKind::Code, "<code"),
        (LiteralKind::File, "<file"),
        (LiteralKind::Html, "<html>"),
        (LiteralKind::Html, "<HTML>"),
        (LiteralKind::Php, "<php>"),
        (LiteralKind::Php, "<PHP>"),
    ]
    .into_iter()
    .find(|(_, tag)| body.starts_with(tag))
    .map(|(kind, tag)| (kind, tag.len()))?;

    let gt = body.find('>')?;
    let attrs = &body[tag_len.min(gt)..gt];
    if !attrs.is_empty() && !attrs.starts_with(char::is_whitespace) {
        // `<codex>` and friends are not literal tags.
        return None;
    }

    let rest_offset = indent + gt + 1;
    let rest = &line[rest_offset..];
    for close in kind.close_tags() {
        if let Some(pos) = rest.find(close) {
            if !rest[pos + close.len()..].trim().is_empty() {
                // Closed mid-line with trailing text: inline, not a block.
                return None;
            }
        }
    }

    let mut words = attrs.split_whitespace();
    let to_range = |word: &str| range.subrange(offset_in(line, word), word.len());
    let (lang, filename) = match kind {
        LiteralKind::Code | LiteralKind::File => {
            let lang = words.next().filter(|w| *w != "-").map(to_range);
            (lang, words.next().map(to_range))
        }
        _ => (None, None),
    };

    Some(Line::LiteralOpen {
        kind,
        lang,
        filename,
        rest: range.skip(rest_offset),
    })
}

/// Byte offset of `part` inside `whole`; `part` must be a subslice.
fn offset_in(whole: &str, part: &str) -> usize {
    part.as_ptr() as usize - whole.as_ptr() as usize
}

/// Absolute range of `line[from..to]` without surrounding whitespace.
fn trimmed(line: &str, range: Range, from: usize, to: usize) -> Range {
    let part = &line[from..to];
    let leading = part.len() - part.trim_start().len();
    range.subrange(from + leading, part.trim().len())
}

fn table_row(line: &str, _range: Range) -> Option<Line> {
    line.starts_with(['^', '|']).then_some(Line::TableRow)
}

fn list_item(line: &str, range: Range) -> Option<Line> {
    let (columns, indent) = indentation(line);
    if columns < 2 {
        return None;
    }
    let kind = match line.as_bytes().get(indent)? {
        b'*' => ListKind::Unordered,
        b'-' => ListKind::Ordered,
        _ => return None,
    };
    let after = indent + 1;
    if !line[after..].is_empty() && !line[after..].starts_with(char::is_whitespace) {
        return None;
    }
    let depth = (columns / 2).clamp(1, MAX_LIST_DEPTH) as u8;
    Some(Line::ListItem {
        depth,
        kind,
        text: trimmed(line, range, after, line.len()),
    })
}

fn preformatted(line: &str, range: Range) -> Option<Line> {
    let (columns, _) = indentation(line);
    if columns < 2 {
        return None;
    }
    // Drop exactly two columns of indentation.
    let strip = match line.as_bytes() {
        [b'\t', ..] => 1,
        [b' ', b' ', ..] | [b' ', b'\t', ..] => 2,
        _ => 0,
    };
    Some(Line::Preformatted {
        text: range.skip(strip),
    })
}

fn quote(line: &str, range: Range) -> Option<Line> {
    let count = line.bytes().take_while(|&b| b == b'>').count();
    if count == 0 {
        return None;
    }
    let level = count.min(MAX_QUOTE_DEPTH) as u8;
    Some(Line::Quote {
        level,
        text: trimmed(line, range, count, line.len()),
    })
}

fn heading(line: &str, range: Range) -> Option<Line> {
    let body = line.trim();
    let left = body.bytes().take_while(|&b| b == b'=').count();
    let right = body.bytes().rev().take_while(|&b| b == b'=').count();
    if left < 2 || right < 2 || left + right >= body.len() {
        return None;
    }
    let title = &body[left..body.len() - right];
    if title.trim().is_empty() {
        return None;
    }
    let level = 7 - left.min(6) as u8;
    let start = offset_in(line, title);
    Some(Line::Heading {
        level,
        text: trimmed(line, range, start, start + title.len()),
    })
}

fn rule(line: &str, _range: Range) -> Option<Line> {
    let body = line.trim();
    (body.len() >= 4 && body.bytes().all(|b| b == b'-')).then_some(Line::Rule)
}

fn media(line: &str, _range: Range) -> Option<Line> {
    is_standalone_embed(line).then_some(Line::Media)
}

fn paragraph(_line: &str, _range: Range) -> Option<Line> {
    Some(Line::Paragraph)
}
