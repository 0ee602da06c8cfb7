//! Inline rule engine.
//!
//! Block text runs through [`STAGES`] in a fixed order. Each stage is a
//! plain string transform; whatever a stage renders is parked in the
//! placeholder registry, so later stages only see user text and opaque
//! tokens. After the last stage the remaining text is HTML-escaped and
//! footnotes are captured:
//!
//! 1. control macros and token sentinels are stripped
//! 2. `<nowiki>` and inline `<code>` spans are protected
//! 3. bare URLs and `<email>` addresses become links
//! 4. `[[target|label]]` links
//! 5. `{{media}}` embeds
//! 6. `%%no-format%%` spans
//! 7. character formatting and forced line breaks
//! 8. inline `<html>`/`<php>` spans
//! 9. typography
//! 10. smileys

mod format;
mod links;
mod media;
pub mod scan;
mod typography;

pub(crate) use links::{media_href, page_href};
pub(crate) use media::is_standalone_embed;

use crate::context::RenderContext;
use crate::escape::escape_text;
use crate::footnote::reference_marker;
use crate::limits::MAX_INLINE_DEPTH;
use crate::placeholder::strip_sentinels;
use std::borrow::Cow;

/// Signature of one inline stage.
pub type StageFn = fn(&str, &mut RenderContext<'_>) -> String;

/// A named inline stage.
#[derive(Clone, Copy)]
pub struct Stage {
    pub name: &'static str,
    pub run: StageFn,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage").field("name", &self.name).finish()
    }
}

/// The inline stages, in the order they must run.
pub const STAGES: &[Stage] = &[
    Stage { name: "control_macros", run: strip_control_macros },
    Stage { name: "protected_spans", run: format::protected_spans },
    Stage { name: "autolinks", run: links::autolinks },
    Stage { name: "links", run: links::bracketed_links },
    Stage { name: "media", run: media::embeds },
    Stage { name: "no_format", run: format::no_format_spans },
    Stage { name: "formatting", run: format::formatting },
    Stage { name: "embedded_code", run: format::embedded_code },
    Stage { name: "typography", run: typography::typography },
    Stage { name: "smileys", run: typography::smileys },
];

/// Run the inline pipeline over `text`.
///
/// The result is escaped HTML that may still contain placeholder tokens;
/// they are resolved by the caller, either locally or in the final
/// document pass.
pub fn apply_inline(text: &str, ctx: &mut RenderContext<'_>) -> String {
    if ctx.inline_depth >= MAX_INLINE_DEPTH {
        log::debug!("inline nesting limit reached, escaping {} bytes", text.len());
        return escape_text(text);
    }
    ctx.inline_depth += 1;
    let mut current = text.to_string();
    for stage in STAGES {
        current = (stage.run)(&current, ctx);
    }
    let escaped = escape_text(&current);
    let out = capture_footnotes(&escaped, ctx);
    ctx.inline_depth -= 1;
    out
}

/// Run the pipeline and resolve every token it produced.
pub fn apply_inline_resolved(text: &str, ctx: &mut RenderContext<'_>) -> String {
    let html = apply_inline(text, ctx);
    ctx.placeholders.resolve_fragment(&html)
}

fn strip_control_macros(text: &str, ctx: &mut RenderContext<'_>) -> String {
    // Nested calls see tokens produced by the outer call; keep those.
    let text = if ctx.inline_depth <= 1 {
        strip_sentinels(text)
    } else {
        Cow::Borrowed(text)
    };
    if !text.contains("~~") {
        return text.into_owned();
    }
    scan::replace_delimited(&text, "~~", "~~", |inner| {
        is_control_macro(inner).then(String::new)
    })
}

/// `~~NOTOC~~`, `~~NOCACHE~~`, `~~INFO:syntax~~` and the like.
fn is_control_macro(inner: &str) -> bool {
    let name = inner.split_once(':').map_or(inner, |(name, _)| name);
    !name.is_empty()
        && name.bytes().all(|b| b.is_ascii_uppercase() || b == b'_')
        && !inner.contains(char::is_whitespace)
}

/// Replace `((body))` with a numbered reference and register the body.
fn capture_footnotes(text: &str, ctx: &mut RenderContext<'_>) -> String {
    if !text.contains("((") {
        return text.to_string();
    }
    scan::replace_delimited(text, "((", "))", |body| {
        let body = body.trim();
        if body.is_empty() {
            return None;
        }
        let rendered = ctx.placeholders.resolve_fragment(body);
        let (number, first) = ctx.footnotes.insert(rendered);
        Some(ctx.raw(reference_marker(number, first)))
    })
}
