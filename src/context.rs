//! Per-render mutable state.
//!
//! One `RenderContext` is created for every call to `to_html*` and
//! threaded through block rendering, the inline engine and the table
//! layout. Nothing here outlives the call, so concurrent renders sharing
//! one `Options` never observe each other.

use crate::footnote::FootnoteStore;
use crate::placeholder::{PlaceholderKind, PlaceholderRegistry};
use crate::Options;
use rustc_hash::FxHashMap;

/// Section titles whose content is shown verbatim (compared ASCII
/// case-insensitively).
pub const VERBATIM_SECTIONS: &[&str] = &["raw", "verbatim", "source", "literal"];

/// State of one render call.
pub struct RenderContext<'o> {
    /// Immutable configuration.
    pub options: &'o Options,
    /// Deferred fragments.
    pub placeholders: PlaceholderRegistry,
    /// Collected footnotes.
    pub footnotes: FootnoteStore,
    /// Title of the most recent heading.
    section: Option<String>,
    /// Heading ids handed out so far, with their duplicate counters.
    heading_ids: FxHashMap<String, usize>,
    /// Current inline recursion depth.
    pub(crate) inline_depth: usize,
    /// Set while rendering a link label; media skip their own link wrapper.
    pub(crate) in_link: bool,
}

impl<'o> RenderContext<'o> {
    pub fn new(options: &'o Options) -> Self {
        Self {
            options,
            placeholders: PlaceholderRegistry::new(),
            footnotes: FootnoteStore::new(),
            section: None,
            heading_ids: FxHashMap::default(),
            inline_depth: 0,
            in_link: false,
        }
    }

    /// Park verbatim markup behind a token.
    pub fn raw(&mut self, html: impl Into<String>) -> String {
        self.placeholders.insert(PlaceholderKind::Raw, html.into())
    }

    /// Record the heading that opens a new section.
    pub fn enter_section(&mut self, title: &str) {
        self.section = Some(title.trim().to_string());
    }

    /// Whether text in the current section must be escaped verbatim.
    pub fn in_verbatim_section(&self) -> bool {
        self.section.as_deref().is_some_and(|title| {
            VERBATIM_SECTIONS
                .iter()
                .any(|name| title.eq_ignore_ascii_case(name))
        })
    }

    /// Derive a document-unique id from a heading title.
    ///
    /// Repeats get a numeric suffix (`intro`, `intro_1`, `intro_2`).
    pub fn heading_id(&mut self, title: &str) -> String {
        let base = section_slug(title);
        let count = self.heading_ids.entry(base.clone()).or_insert(0);
        let id = if *count == 0 {
            base.clone()
        } else {
            format!("{base}_{count}")
        };
        *count += 1;
        if id != base {
            self.heading_ids.entry(id.clone()).or_insert(1);
        }
        id
    }
}

/// Slug used for heading ids and link fragments: lowercased, runs of
/// non-alphanumerics become `_`, `section` when nothing survives.
pub fn section_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending = false;
    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending && !slug.is_empty() {
                slug.push('_');
            }
            pending = false;
            slug.push(c);
        } else {
            pending = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("section");
    }
    slug
}
