//! Footnote collection.

use crate::render::HtmlWriter;
use rustc_hash::FxBuildHasher as FastHashBuilder;
use std::collections::HashMap;

/// A collected footnote.
#[derive(Debug, Clone)]
pub struct Footnote {
    /// Rendered body (may still contain placeholder tokens).
    pub body: String,
    /// Reference number, 1-based, in order of first appearance.
    pub number: usize,
}

/// Footnotes of one render, deduplicated by exact body text.
#[derive(Debug, Default)]
pub struct FootnoteStore {
    notes: Vec<Footnote>,
    by_body: HashMap<String, usize, FastHashBuilder>,
}

impl FootnoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a body and return its number and whether it is new.
    /// Identical bodies share one number.
    pub fn insert(&mut self, body: String) -> (usize, bool) {
        if let Some(&idx) = self.by_body.get(&body) {
            return (self.notes[idx].number, false);
        }
        let number = self.notes.len() + 1;
        self.by_body.insert(body.clone(), self.notes.len());
        self.notes.push(Footnote { body, number });
        (number, true)
    }

    pub fn get(&self, number: usize) -> Option<&Footnote> {
        number.checked_sub(1).and_then(|idx| self.notes.get(idx))
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Write the trailing footnote block; writes nothing when empty.
    pub fn write_html(&self, writer: &mut HtmlWriter) {
        if self.notes.is_empty() {
            return;
        }
        writer.write_str("<div class=\"footnotes\">\n");
        for note in &self.notes {
            writer.write_str("<div class=\"fn\"><sup><a href=\"#fnt__");
            writer.write_usize(note.number);
            writer.write_str("\" id=\"fn__");
            writer.write_usize(note.number);
            writer.write_str("\" class=\"fn_bot\">");
            writer.write_usize(note.number);
            writer.write_str(")</a></sup> <div class=\"content\">");
            writer.write_str(&note.body);
            writer.write_str("</div></div>\n");
        }
        writer.write_str("</div>\n");
    }
}

/// Reference marker placed in the text.
pub fn reference_marker(number: usize, first: bool) -> String {
    if first {
        format!("<sup><a href=\"#fn__{number}\" id=\"fnt__{number}\" class=\"fn_top\">{number})</a></sup>")
    } else {
        format!("<sup><a href=\"#fn__{number}\" class=\"fn_top\">{number})</a></sup>")
    }
}
