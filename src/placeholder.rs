//! Deferred fragments behind opaque tokens.
//!
//! Inline rules run over flat strings. Anything already rendered (links,
//! media, generated tags, protected text) is parked here and replaced by a
//! token, so later rules never see the characters inside it. Tokens are
//! `U+E000 <index> U+E001`; both sentinels are stripped from user input
//! before any rule runs.

use memchr::memchr;

/// Opens a token.
pub const TOKEN_START: char = '\u{E000}';
/// Closes a token.
pub const TOKEN_END: char = '\u{E001}';

const START_LEN: usize = TOKEN_START.len_utf8();
const END_LEN: usize = TOKEN_END.len_utf8();
// First byte of the UTF-8 encoding of U+E000.
const START_LEAD: u8 = 0xEE;

/// What a placeholder holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    /// A rendered hyperlink.
    Link,
    /// A rendered media embed.
    Media,
    /// Protected or generated markup emitted verbatim.
    Raw,
    /// Source of an inline `<html>`/`<php>` span, parked until the
    /// embedded-code stage renders it.
    Embedded,
}

/// Handle to a reserved slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token(usize);

impl Token {
    /// Textual form embedded in the document.
    pub fn text(self) -> String {
        format!("{TOKEN_START}{}{TOKEN_END}", self.0)
    }

    /// Parse text that consists of exactly one token.
    pub fn parse(text: &str) -> Option<Token> {
        let digits = text.strip_prefix(TOKEN_START)?.strip_suffix(TOKEN_END)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(Token)
    }
}

#[derive(Debug)]
struct Placeholder {
    kind: PlaceholderKind,
    fragment: Option<String>,
}

/// Per-render store of deferred fragments.
#[derive(Debug, Default)]
pub struct PlaceholderRegistry {
    entries: Vec<Placeholder>,
}

impl PlaceholderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a slot whose fragment is filled later.
    pub fn reserve(&mut self, kind: PlaceholderKind) -> Token {
        let token = Token(self.entries.len());
        self.entries.push(Placeholder { kind, fragment: None });
        token
    }

    /// Fill a reserved slot.
    pub fn fill(&mut self, token: Token, fragment: String) {
        if let Some(entry) = self.entries.get_mut(token.0) {
            entry.fragment = Some(fragment);
        }
    }

    /// Store a finished fragment and return its token text.
    pub fn insert(&mut self, kind: PlaceholderKind, fragment: String) -> String {
        let token = self.reserve(kind);
        self.fill(token, fragment);
        token.text()
    }

    /// Kind of a reserved slot.
    pub fn kind(&self, token: Token) -> Option<PlaceholderKind> {
        self.entries.get(token.0).map(|e| e.kind)
    }

    /// Remove and return the fragment of a slot, leaving it unfilled.
    pub fn take(&mut self, token: Token) -> Option<String> {
        self.entries.get_mut(token.0)?.fragment.take()
    }

    /// Replace every token in `text` with its fragment.
    ///
    /// Fragments may themselves contain tokens of earlier slots; those are
    /// substituted too. Unknown or unfilled tokens are logged and dropped.
    pub fn resolve_fragment(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() * 2);
        self.resolve_into(&mut out, text, 0);
        out
    }

    /// Final pass over an assembled document.
    pub fn resolve_all(&self, document: &str) -> String {
        let resolved = self.resolve_fragment(document);
        log::debug!("resolved {} placeholders", self.entries.len());
        resolved
    }

    fn resolve_into(&self, out: &mut String, text: &str, depth: usize) {
        let bytes = text.as_bytes();
        let mut pos = 0;
        while let Some(offset) = memchr(START_LEAD, &bytes[pos..]) {
            let at = pos + offset;
            if !text[at..].starts_with(TOKEN_START) {
                // Another character in the same UTF-8 block.
                let next = at + text[at..].chars().next().map_or(1, char::len_utf8);
                out.push_str(&text[pos..next]);
                pos = next;
                continue;
            }
            out.push_str(&text[pos..at]);
            let body_start = at + START_LEN;
            let digits = text[body_start..]
                .bytes()
                .take_while(u8::is_ascii_digit)
                .count();
            let body_end = body_start + digits;
            if digits == 0 || !text[body_end..].starts_with(TOKEN_END) {
                log::warn!("malformed placeholder token at byte {at}, dropping sentinel");
                pos = body_start;
                continue;
            }
            let index: usize = text[body_start..body_end].parse().unwrap_or(usize::MAX);
            match self.entries.get(index).and_then(|e| e.fragment.as_deref()) {
                Some(fragment) if depth < crate::limits::MAX_PLACEHOLDER_DEPTH => {
                    self.resolve_into(out, fragment, depth + 1);
                }
                Some(_) => log::warn!("placeholder {index} nested too deeply, dropping"),
                None => log::warn!("placeholder {index} was never resolved, dropping"),
            }
            pos = body_end + END_LEN;
        }
        out.push_str(&text[pos..]);
    }
}

/// Remove token sentinels from untrusted input.
pub fn strip_sentinels(text: &str) -> std::borrow::Cow<'_, str> {
    if text.contains([TOKEN_START, TOKEN_END]) {
        text.chars()
            .filter(|&c| c != TOKEN_START && c != TOKEN_END)
            .collect::<String>()
            .into()
    } else {
        text.into()
    }
}

/// Whether `text` still contains a token.
pub fn contains_token(text: &str) -> bool {
    text.contains(TOKEN_START)
}
