//! Block-level parser for wiki markup.
//!
//! The block parser is line-oriented. Each line is classified once (see
//! [`classify::CLASSIFIERS`] for the precedence order) and drives a small
//! state machine over:
//! - Headings
//! - Nested lists
//! - Blockquotes
//! - Tables
//! - Code, file, HTML and PHP blocks
//! - Preformatted text
//! - Paragraphs

pub mod classify;
mod event;
mod parser;

pub use classify::Line;
pub use event::{BlockEvent, ListKind, LiteralKind};
pub use parser::BlockParser;
