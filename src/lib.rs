//! ferrowiki: streaming wiki markup to HTML renderer
//!
//! Converts the line-oriented DokuWiki markup dialect into an HTML fragment
//! for preview panes and static site generation.
//!
//! # Design Principles
//! - Line-oriented block parsing: one classification per line, events only
//! - Ordered inline stages over a flat string, protected by placeholder tokens
//! - Per-call state: nothing survives between two `to_html` calls
//! - Total: every input renders, malformed constructs degrade in place
//!
//! # Example
//! ```
//! let html = ferrowiki::to_html("====== Hello ======\n\n**bold** //italic//");
//! assert!(html.contains("<h1 id=\"hello\">Hello</h1>"));
//! assert!(html.contains("<strong>bold</strong> <em>italic</em>"));
//! ```

pub mod block;
pub mod context;
pub mod cursor;
pub mod escape;
pub mod footnote;
pub mod inline;
pub mod limits;
pub mod namespace;
pub mod placeholder;
pub mod range;
pub mod render;
pub mod table;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export primary types
pub use block::{BlockEvent, BlockParser, ListKind, LiteralKind};
pub use context::RenderContext;
pub use range::Range;
pub use render::HtmlWriter;

use escape::escape_text;
use inline::apply_inline;
use placeholder::strip_sentinels;
use rustc_hash::FxHashMap;

/// How page and media ids become hrefs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStyle {
    /// `{page_base}?id=ns:page` and `{media_base}?media=ns:file`.
    #[default]
    Query,
    /// `{page_base}/ns/page` and `{media_base}/ns/file`. Page ids keep
    /// their case.
    PathTemplate,
}

/// How emoticons are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmileyMode {
    /// A Unicode glyph.
    #[default]
    Emoji,
    /// `<img class="icon smiley">` below `smiley_base`.
    Image,
}

/// Rendering options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Namespace of the page being rendered (`a:b`, empty for the root).
    pub namespace: String,
    /// Interwiki prefixes. Templates may contain `{NAME}` (inserted as-is)
    /// or `{URL}` (percent-encoded); otherwise the encoded name is appended.
    pub interwiki: FxHashMap<String, String>,
    /// Pass `<html>` and `<php>` content through instead of escaping it.
    pub allow_html: bool,
    /// Replace arrows, dashes and similar sequences with typographic glyphs.
    pub typography: bool,
    /// Base of page hrefs.
    pub page_base: String,
    /// Base of media hrefs.
    pub media_base: String,
    pub link_style: LinkStyle,
    /// Append `.html` to page paths in [`LinkStyle::PathTemplate`] mode.
    pub append_extension: bool,
    pub smileys: SmileyMode,
    /// Directory of smiley images for [`SmileyMode::Image`].
    pub smiley_base: String,
}

impl Options {
    /// The interwiki map used by [`Options::default`].
    pub fn default_interwiki() -> FxHashMap<String, String> {
        [
            ("wp", "https://en.wikipedia.org/wiki/{NAME}"),
            ("doku", "https://www.dokuwiki.org/{NAME}"),
            ("google", "https://www.google.com/search?q={URL}"),
        ]
        .into_iter()
        .map(|(prefix, url)| (prefix.to_string(), url.to_string()))
        .collect()
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            interwiki: Self::default_interwiki(),
            allow_html: false,
            typography: true,
            page_base: "/doku.php".to_string(),
            media_base: "/lib/exe/fetch.php".to_string(),
            link_style: LinkStyle::Query,
            append_extension: false,
            smileys: SmileyMode::Emoji,
            smiley_base: "/lib/images/smileys".to_string(),
        }
    }
}

/// Convert wiki markup to HTML.
///
/// This is the primary API for simple use cases.
///
/// # Example
/// ```
/// let html = ferrowiki::to_html("  * one\n  * two");
/// assert!(html.contains("<ul>"));
/// assert!(html.contains("<li class=\"level1\"><div class=\"li\">two</div>"));
/// ```
pub fn to_html(input: &str) -> String {
    to_html_with_options(input, &Options::default())
}

/// Convert wiki markup to HTML with options.
pub fn to_html_with_options(input: &str, options: &Options) -> String {
    // Sentinels in the input would be mistaken for placeholder tokens.
    let input = strip_sentinels(input);
    let input = input.as_ref();

    let mut parser = BlockParser::new(input);
    let mut events = Vec::with_capacity((input.len() / 16).max(64));
    parser.parse(&mut events);
    log::debug!("parsed {} block events from {} bytes", events.len(), input.len());

    let mut renderer = Renderer::new(input, options);
    for event in &events {
        renderer.event(event);
    }
    renderer.finish()
}

/// A literal block being buffered until its end event.
struct LiteralBuffer<'a> {
    kind: LiteralKind,
    lang: Option<&'a str>,
    filename: Option<&'a str>,
    lines: Vec<&'a str>,
}

/// Turns block events into HTML.
struct Renderer<'a, 'o> {
    input: &'a str,
    ctx: RenderContext<'o>,
    writer: HtmlWriter,
    /// Paragraph or quote lines waiting for the inline engine.
    pending: Vec<&'a str>,
    table_rows: Vec<&'a str>,
    literal: Option<LiteralBuffer<'a>>,
}

impl<'a, 'o> Renderer<'a, 'o> {
    fn new(input: &'a str, options: &'o Options) -> Self {
        let mut writer = HtmlWriter::with_capacity_for(input.len());
        writer.write_str("<div class=\"wikitext\">\n");
        Self {
            input,
            ctx: RenderContext::new(options),
            writer,
            pending: Vec::new(),
            table_rows: Vec::new(),
            literal: None,
        }
    }

    fn event(&mut self, event: &BlockEvent) {
        let input = self.input;
        match event {
            BlockEvent::ParagraphStart => self.writer.paragraph_start(),
            BlockEvent::ParagraphEnd => {
                self.flush_text();
                self.writer.paragraph_end();
            }
            BlockEvent::Text(range) => self.pending.push(range.slice(input)),
            BlockEvent::Heading { level, text } => {
                let title = text.slice(input);
                let id = self.ctx.heading_id(title);
                self.ctx.enter_section(title);
                self.writer.heading_start(*level, &id);
                self.writer.write_escaped_text(title);
                self.writer.heading_end(*level);
            }
            BlockEvent::ListStart { kind } => self.writer.list_start(kind.is_ordered()),
            BlockEvent::ListEnd { kind } => self.writer.list_end(kind.is_ordered()),
            BlockEvent::ListItem { level, text } => {
                self.writer.li_start(*level as usize);
                let html = self.inline(text.slice(input));
                self.writer.write_str(&html);
                self.writer.li_content_end();
            }
            BlockEvent::ListItemEnd => self.writer.li_end(),
            BlockEvent::QuoteStart => {
                self.flush_quote_text();
                self.writer.blockquote_start();
            }
            BlockEvent::QuoteEnd => {
                self.flush_quote_text();
                self.writer.blockquote_end();
            }
            BlockEvent::TableStart => self.table_rows.clear(),
            BlockEvent::TableRow(range) => self.table_rows.push(range.slice(input)),
            BlockEvent::TableEnd => {
                let verbatim = self.ctx.in_verbatim_section();
                let html = table::layout(&self.table_rows, &mut self.ctx, verbatim);
                self.writer.write_str(&html);
                self.table_rows.clear();
            }
            BlockEvent::LiteralStart {
                kind,
                lang,
                filename,
            } => {
                self.literal = Some(LiteralBuffer {
                    kind: *kind,
                    lang: lang.map(|r| r.slice(input)),
                    filename: filename.map(|r| r.slice(input)),
                    lines: Vec::new(),
                });
            }
            BlockEvent::LiteralLine(range) => {
                if let Some(literal) = self.literal.as_mut() {
                    literal.lines.push(range.slice(input));
                }
            }
            BlockEvent::LiteralEnd => {
                if let Some(literal) = self.literal.take() {
                    self.literal_block(&literal);
                }
            }
            BlockEvent::Rule => self.writer.horizontal_rule(),
            BlockEvent::Media(range) => {
                let text = range.slice(input);
                if self.ctx.in_verbatim_section() {
                    self.writer.paragraph_start();
                    self.writer.write_escaped_text(text);
                    self.writer.paragraph_end();
                } else {
                    let html = apply_inline(text, &mut self.ctx);
                    self.writer.write_str("<div class=\"media\">");
                    self.writer.write_str(&html);
                    self.writer.write_str("</div>\n");
                }
            }
        }
    }

    /// Inline-process a text run, or escape it inside verbatim sections.
    fn inline(&mut self, text: &str) -> String {
        if self.ctx.in_verbatim_section() {
            escape_text(text)
        } else {
            apply_inline(text, &mut self.ctx)
        }
    }

    /// Render pending lines as one inline run. Returns whether anything
    /// was pending.
    fn flush_text(&mut self) -> bool {
        if self.pending.is_empty() {
            return false;
        }
        let text = self.pending.join("\n");
        self.pending.clear();
        let html = self.inline(&text);
        self.writer.write_str(&html);
        true
    }

    fn flush_quote_text(&mut self) {
        if self.flush_text() {
            self.writer.newline();
        }
    }

    fn literal_block(&mut self, literal: &LiteralBuffer<'_>) {
        let body = literal.lines.join("\n");
        let allow_html = self.ctx.options.allow_html;
        match literal.kind {
            LiteralKind::Code | LiteralKind::Preformatted => {
                self.writer.pre_start("code", literal.lang);
                self.writer.write_escaped_text(&body);
                self.writer.pre_end();
            }
            LiteralKind::File => {
                if let Some(name) = literal.filename {
                    self.writer.write_str("<dl class=\"file\">\n<dt>");
                    self.writer.write_escaped_text(name);
                    self.writer.write_str("</dt>\n<dd>");
                }
                self.writer.pre_start("file", literal.lang);
                self.writer.write_escaped_text(&body);
                self.writer.pre_end();
                if literal.filename.is_some() {
                    self.writer.write_str("</dd></dl>\n");
                }
            }
            LiteralKind::Html if allow_html => {
                self.writer.write_str(&body);
                self.writer.newline();
            }
            LiteralKind::Php if allow_html => {
                self.writer.write_str("<?php\n");
                self.writer.write_str(&body);
                self.writer.write_str("\n?>\n");
            }
            LiteralKind::Html | LiteralKind::Php => {
                log::debug!("{:?} block escaped, raw HTML is disabled", literal.kind);
                let lang = if literal.kind == LiteralKind::Html { "html" } else { "php" };
                self.writer.pre_start("code", Some(lang));
                self.writer.write_escaped_text(&body);
                self.writer.pre_end();
            }
        }
    }

    /// Append footnotes, close the root and resolve every placeholder.
    fn finish(mut self) -> String {
        self.flush_text();
        self.ctx.footnotes.write_html(&mut self.writer);
        self.writer.write_str("</div>\n");
        self.ctx.placeholders.resolve_all(self.writer.as_str())
    }
}
