//! Block parser implementation.

use smallvec::SmallVec;

use crate::cursor::LineCursor;
use crate::table;
use crate::Range;

use super::classify::{classify, Line};
use super::event::{BlockEvent, ListKind, LiteralKind};

/// One open list on the list stack.
#[derive(Debug, Clone, Copy)]
struct ListFrame {
    kind: ListKind,
    depth: u8,
}

/// The block that is currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    None,
    Paragraph,
    List,
    /// Number of open blockquote levels.
    Quote(u8),
    Table,
    Literal(LiteralKind),
}

/// Block parser state.
///
/// Consumes the input line by line and emits [`BlockEvent`]s. Every open
/// construct is closed again before `parse` returns, whatever the input.
pub struct BlockParser<'a> {
    /// Input text.
    input: &'a str,
    /// Open lists, innermost last. Depths strictly increase.
    lists: SmallVec<[ListFrame; 8]>,
    /// Currently open block.
    state: State,
}

impl<'a> BlockParser<'a> {
    /// Create a new block parser.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            lists: SmallVec::new(),
            state: State::None,
        }
    }

    /// Parse all blocks and collect events.
    pub fn parse(&mut self, events: &mut Vec<BlockEvent>) {
        self.lists.clear();
        self.state = State::None;

        for range in LineCursor::new(self.input) {
            self.process_line(range, events);
        }

        if let State::Literal(kind) = self.state {
            if kind != LiteralKind::Preformatted {
                log::debug!("unterminated {kind:?} block closed at end of input");
            }
        }
        self.close_block(events);
    }

    fn process_line(&mut self, range: Range, events: &mut Vec<BlockEvent>) {
        if let State::Literal(kind) = self.state {
            if kind != LiteralKind::Preformatted {
                self.literal_line(kind, range, events);
                return;
            }
        }

        match classify(self.input, range) {
            // Blank lines inside a table are skipped; the next non-table line ends it.
            Line::Blank if self.state == State::Table => {}
            Line::Blank => self.close_block(events),
            Line::LiteralOpen {
                kind,
                lang,
                filename,
                rest,
            } => {
                self.close_block(events);
                events.push(BlockEvent::LiteralStart {
                    kind,
                    lang,
                    filename,
                });
                self.state = State::Literal(kind);
                if !rest.is_empty() {
                    self.literal_line(kind, rest, events);
                }
            }
            Line::TableRow => self.table_row(range, events),
            Line::ListItem { depth, kind, text } => self.list_item(depth, kind, text, events),
            Line::Preformatted { text } => {
                if self.state != State::Literal(LiteralKind::Preformatted) {
                    self.close_block(events);
                    events.push(BlockEvent::LiteralStart {
                        kind: LiteralKind::Preformatted,
                        lang: None,
                        filename: None,
                    });
                    self.state = State::Literal(LiteralKind::Preformatted);
                }
                events.push(BlockEvent::LiteralLine(text));
            }
            Line::Quote { level, text } => self.quote_line(level, text, events),
            Line::Heading { level, text } => {
                self.close_block(events);
                events.push(BlockEvent::Heading { level, text });
            }
            Line::Rule => {
                self.close_block(events);
                events.push(BlockEvent::Rule);
            }
            Line::Media => {
                self.close_block(events);
                events.push(BlockEvent::Media(range.trim(self.input)));
            }
            Line::Paragraph => self.paragraph_line(range, events),
        }
    }

    /// A line inside a tag-delimited literal block.
    ///
    /// Only the close tag is recognised; whatever follows it on the same
    /// line is processed as a fresh line.
    fn literal_line(&mut self, kind: LiteralKind, range: Range, events: &mut Vec<BlockEvent>) {
        let text = range.slice(self.input);
        let close = kind
            .close_tags()
            .iter()
            .filter_map(|tag| text.find(tag).map(|pos| (pos, tag.len())))
            .min_by_key(|&(pos, _)| pos);

        let Some((pos, tag_len)) = close else {
            events.push(BlockEvent::LiteralLine(range));
            return;
        };

        if !text[..pos].trim().is_empty() {
            events.push(BlockEvent::LiteralLine(range.subrange(0, pos)));
        }
        events.push(BlockEvent::LiteralEnd);
        self.state = State::None;

        let after = range.skip(pos + tag_len);
        if !after.slice(self.input).trim().is_empty() {
            self.process_line(after, events);
        }
    }

    fn table_row(&mut self, range: Range, events: &mut Vec<BlockEvent>) {
        if !table::is_row(range.slice(self.input)) {
            log::debug!("malformed table row at byte {}, treated as text", range.start);
            if self.state == State::Table {
                self.close_block(events);
            }
            self.paragraph_line(range, events);
            return;
        }
        if self.state != State::Table {
            self.close_block(events);
            events.push(BlockEvent::TableStart);
            self.state = State::Table;
        }
        events.push(BlockEvent::TableRow(range));
    }

    fn list_item(&mut self, depth: u8, kind: ListKind, text: Range, events: &mut Vec<BlockEvent>) {
        if self.state != State::List {
            self.close_block(events);
            self.state = State::List;
        }

        while let Some(top) = self.lists.last().copied() {
            if top.depth <= depth {
                break;
            }
            self.lists.pop();
            events.push(BlockEvent::ListItemEnd);
            events.push(BlockEvent::ListEnd { kind: top.kind });
        }

        match self.lists.last().copied() {
            Some(top) if top.depth == depth => {
                events.push(BlockEvent::ListItemEnd);
                if top.kind != kind {
                    log::debug!("list kind changed at depth {depth}, reopening list");
                    self.lists.pop();
                    events.push(BlockEvent::ListEnd { kind: top.kind });
                    self.open_list(kind, depth, events);
                }
            }
            // Deeper than the innermost list (or no list yet): nest inside
            // the open item.
            _ => self.open_list(kind, depth, events),
        }

        events.push(BlockEvent::ListItem { level: depth, text });
    }

    fn open_list(&mut self, kind: ListKind, depth: u8, events: &mut Vec<BlockEvent>) {
        events.push(BlockEvent::ListStart { kind });
        self.lists.push(ListFrame { kind, depth });
    }

    fn quote_line(&mut self, level: u8, text: Range, events: &mut Vec<BlockEvent>) {
        let current = match self.state {
            State::Quote(open) => open,
            _ => {
                self.close_block(events);
                0
            }
        };
        for _ in current..level {
            events.push(BlockEvent::QuoteStart);
        }
        for _ in level..current {
            events.push(BlockEvent::QuoteEnd);
        }
        self.state = State::Quote(level);
        if !text.is_empty() {
            events.push(BlockEvent::Text(text));
        }
    }

    fn paragraph_line(&mut self, range: Range, events: &mut Vec<BlockEvent>) {
        if self.state != State::Paragraph {
            self.close_block(events);
            events.push(BlockEvent::ParagraphStart);
            self.state = State::Paragraph;
        }
        events.push(BlockEvent::Text(range.trim(self.input)));
    }

    /// Close whatever block is open.
    fn close_block(&mut self, events: &mut Vec<BlockEvent>) {
        let state = std::mem::replace(&mut self.state, State::None);
        match state {
            State::None => return,
            State::Paragraph => events.push(BlockEvent::ParagraphEnd),
            State::List => {
                while let Some(frame) = self.lists.pop() {
                    events.push(BlockEvent::ListItemEnd);
                    events.push(BlockEvent::ListEnd { kind: frame.kind });
                }
            }
            State::Quote(level) => {
                for _ in 0..level {
                    events.push(BlockEvent::QuoteEnd);
                }
            }
            State::Table => events.push(BlockEvent::TableEnd),
            State::Literal(_) => events.push(BlockEvent::LiteralEnd),
        }
        log::debug!("closed {state:?} block");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Vec<BlockEvent> {
        let mut parser = BlockParser::new(input);
        let mut events = Vec::new();
        parser.parse(&mut events);
        events
    }

    fn text_of<'a>(input: &'a str, event: &BlockEvent) -> &'a str {
        match event {
            BlockEvent::Text(r)
            | BlockEvent::TableRow(r)
            | BlockEvent::LiteralLine(r)
            | BlockEvent::Media(r)
            | BlockEvent::Heading { text: r, .. }
            | BlockEvent::ListItem { text: r, .. } => r.slice(input),
            other => panic!("no text in {other:?}"),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n  \n").is_empty());
    }

    #[test]
    fn test_paragraph_lines() {
        let input = "first line\n  second\n\nnext";
        let events = parse(input);
        assert_eq!(events.len(), 9);
        assert_eq!(events[0], BlockEvent::ParagraphStart);
        assert_eq!(text_of(input, &events[1]), "first line");
        // Indented text is preformatted, not a paragraph continuation.
        assert_eq!(events[2], BlockEvent::ParagraphEnd);
        assert!(matches!(
            events[3],
            BlockEvent::LiteralStart { kind: LiteralKind::Preformatted, .. }
        ));
        assert_eq!(text_of(input, &events[4]), "second");
        assert_eq!(events[5], BlockEvent::LiteralEnd);
        assert_eq!(events[6], BlockEvent::ParagraphStart);
    }

    #[test]
    fn test_heading_closes_paragraph() {
        let input = "text\n== Title ==\n";
        let events = parse(input);
        assert_eq!(events[2], BlockEvent::ParagraphEnd);
        assert!(matches!(events[3], BlockEvent::Heading { level: 5, .. }));
        assert_eq!(text_of(input, &events[3]), "Title");
    }

    #[test]
    fn test_flat_list() {
        let events = parse("  * one\n  * two\n");
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, BlockEvent::ListStart { .. }))
                .count(),
            1
        );
        assert_eq!(events.first(), Some(&BlockEvent::ListStart { kind: ListKind::Unordered }));
        assert_eq!(events.last(), Some(&BlockEvent::ListEnd { kind: ListKind::Unordered }));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, BlockEvent::ListItem { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_nested_list() {
        let input = "  * a\n    - b\n  * c\n";
        let events = parse(input);
        let kinds: Vec<_> = events
            .iter()
            .map(|e| match e {
                BlockEvent::ListStart { kind } => format!("start {kind:?}"),
                BlockEvent::ListEnd { kind } => format!("end {kind:?}"),
                BlockEvent::ListItem { level, .. } => format!("item {level}"),
                BlockEvent::ListItemEnd => "item end".to_string(),
                other => format!("{other:?}"),
            })
            .collect();
        assert_eq!(
            kinds,
            [
                "start Unordered",
                "item 1",
                "start Ordered",
                "item 2",
                "item end",
                "end Ordered",
                "item end",
                "item 1",
                "item end",
                "end Unordered",
            ]
        );
    }

    #[test]
    fn test_list_kind_collision_reopens() {
        let events = parse("  * a\n  - b\n");
        assert_eq!(
            events,
            [
                BlockEvent::ListStart { kind: ListKind::Unordered },
                BlockEvent::ListItem { level: 1, text: Range::new(4, 5) },
                BlockEvent::ListItemEnd,
                BlockEvent::ListEnd { kind: ListKind::Unordered },
                BlockEvent::ListStart { kind: ListKind::Ordered },
                BlockEvent::ListItem { level: 1, text: Range::new(10, 11) },
                BlockEvent::ListItemEnd,
                BlockEvent::ListEnd { kind: ListKind::Ordered },
            ]
        );
    }

    #[test]
    fn test_list_balanced_after_deep_jump() {
        let events = parse("        * deep\n  * shallow\ntext");
        let opens = events
            .iter()
            .filter(|e| matches!(e, BlockEvent::ListStart { .. }))
            .count();
        let closes = events
            .iter()
            .filter(|e| matches!(e, BlockEvent::ListEnd { .. }))
            .count();
        assert_eq!(opens, closes);
        assert_eq!(opens, 2);
    }

    #[test]
    fn test_quote_levels() {
        let input = "> a\n>> b\n> c\n";
        let events = parse(input);
        assert_eq!(
            events,
            [
                BlockEvent::QuoteStart,
                BlockEvent::Text(Range::new(2, 3)),
                BlockEvent::QuoteStart,
                BlockEvent::Text(Range::new(7, 8)),
                BlockEvent::QuoteEnd,
                BlockEvent::Text(Range::new(11, 12)),
                BlockEvent::QuoteEnd,
            ]
        );
    }

    #[test]
    fn test_blank_line_inside_table() {
        let input = "^ a ^ b ^\n| 1 | 2 |\n\n| 3 | 4 |\n\ntext\n";
        let events = parse(input);
        assert_eq!(events[0], BlockEvent::TableStart);
        assert_eq!(text_of(input, &events[1]), "^ a ^ b ^");
        assert_eq!(text_of(input, &events[3]), "| 3 | 4 |");
        assert_eq!(events[4], BlockEvent::TableEnd);
        assert_eq!(events[5], BlockEvent::ParagraphStart);
        assert_eq!(events.len(), 8);
    }

    #[test]
    fn test_malformed_table_row_becomes_paragraph() {
        let input = "| a | b |\n| broken\n";
        let events = parse(input);
        assert_eq!(
            events,
            [
                BlockEvent::TableStart,
                BlockEvent::TableRow(Range::new(0, 9)),
                BlockEvent::TableEnd,
                BlockEvent::ParagraphStart,
                BlockEvent::Text(Range::new(10, 18)),
                BlockEvent::ParagraphEnd,
            ]
        );
    }

    #[test]
    fn test_code_block_keeps_blank_lines() {
        let input = "<code rust>\nfn main() {}\n\n  * not a list\n</code>\nafter";
        let events = parse(input);
        assert!(matches!(events[0], BlockEvent::LiteralStart { kind: LiteralKind::Code, .. }));
        let lines: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, BlockEvent::LiteralLine(_)))
            .map(|e| text_of(input, e))
            .collect();
        assert_eq!(lines, ["fn main() {}", "", "  * not a list"]);
        assert!(events.contains(&BlockEvent::LiteralEnd));
        assert_eq!(events[events.len() - 3], BlockEvent::ParagraphStart);
    }

    #[test]
    fn test_single_line_literal() {
        let input = "<code>x = 1</code>";
        let events = parse(input);
        assert_eq!(events.len(), 3);
        assert_eq!(text_of(input, &events[1]), "x = 1");
        assert_eq!(events[2], BlockEvent::LiteralEnd);
    }

    #[test]
    fn test_text_after_close_tag_is_a_new_line() {
        let input = "<file>\ndata\n</file> trailing words";
        let events = parse(input);
        let end = events
            .iter()
            .position(|e| *e == BlockEvent::LiteralEnd)
            .unwrap();
        assert_eq!(events[end + 1], BlockEvent::ParagraphStart);
        assert_eq!(text_of(input, &events[end + 2]), "trailing words");
    }

    #[test]
    fn test_unterminated_literal_closes_at_eof() {
        let events = parse("<html>\n<b>open");
        assert_eq!(events.last(), Some(&BlockEvent::LiteralEnd));
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_rule_and_media() {
        let input = "----\n {{ logo.png }} \n";
        let events = parse(input);
        assert_eq!(events[0], BlockEvent::Rule);
        assert_eq!(text_of(input, &events[1]), "{{ logo.png }}");
    }

    #[test]
    fn test_parser_is_reusable() {
        let input = "  * a\n";
        let mut parser = BlockParser::new(input);
        let mut first = Vec::new();
        parser.parse(&mut first);
        let mut second = Vec::new();
        parser.parse(&mut second);
        assert_eq!(first, second);
    }
}
