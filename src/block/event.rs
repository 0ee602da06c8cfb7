//! Block-level event types.

use crate::Range;

/// Type of list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `*` items.
    Unordered,
    /// `-` items.
    Ordered,
}

impl ListKind {
    pub fn is_ordered(self) -> bool {
        self == Self::Ordered
    }
}

/// What a literal block contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    /// `<code [lang]>`
    Code,
    /// `<file [lang] [name]>`
    File,
    /// `<html>`
    Html,
    /// `<php>`
    Php,
    /// Lines indented by two or more columns.
    Preformatted,
}

impl LiteralKind {
    /// Closing tags, in both accepted spellings.
    pub fn close_tags(self) -> &'static [&'static str] {
        match self {
            Self::Code => &["</code>"],
            Self::File => &["</file>"],
            Self::Html => &["</html>", "</HTML>"],
            Self::Php => &["</php>", "</PHP>"],
            Self::Preformatted => &[],
        }
    }
}

/// Events emitted by the block parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockEvent {
    /// Start of a paragraph.
    ParagraphStart,
    /// End of a paragraph.
    ParagraphEnd,

    /// One line of inline text (paragraph or quote body).
    Text(Range),

    /// A heading with its trimmed title.
    Heading {
        /// Heading level (1-6).
        level: u8,
        text: Range,
    },

    /// Start of a list.
    ListStart { kind: ListKind },
    /// End of a list.
    ListEnd { kind: ListKind },
    /// Opens a list item and renders its text; a nested list may follow
    /// before the matching `ListItemEnd`.
    ListItem {
        /// Nesting depth, 1-based.
        level: u8,
        text: Range,
    },
    /// End of a list item.
    ListItemEnd,

    /// Opens one blockquote level.
    QuoteStart,
    /// Closes one blockquote level.
    QuoteEnd,

    /// Start of a table.
    TableStart,
    /// One raw table row.
    TableRow(Range),
    /// End of a table.
    TableEnd,

    /// Start of a literal block.
    LiteralStart {
        kind: LiteralKind,
        lang: Option<Range>,
        filename: Option<Range>,
    },
    /// One raw line of a literal block.
    LiteralLine(Range),
    /// End of a literal block.
    LiteralEnd,

    /// A horizontal rule.
    Rule,

    /// A line consisting of a single media embed.
    Media(Range),
}
