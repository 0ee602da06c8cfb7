//! Namespace resolution for page and media targets.
//!
//! Page and media ids are colon-delimited paths (`wiki:syntax`). Link
//! targets may be absolute (`:a:b`), relative to the current namespace
//! (`.:c`), walk up the hierarchy (`..:d`) or point at a namespace start
//! page (`e:`).

use smallvec::SmallVec;

/// Namespace separator.
pub const SEPARATOR: char = ':';

/// Page id a namespace resolves to when linked with a trailing separator.
pub const START_PAGE: &str = "start";

/// What a target refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A wiki page.
    Page,
    /// A media file.
    Media,
}

/// Resolve a page target against the current namespace, normalizing the id.
///
/// # Example
/// ```
/// use ferrowiki::namespace::resolve;
///
/// assert_eq!(resolve(":a:b", "x"), "a:b");
/// assert_eq!(resolve("..:c", "a:b"), "a:c");
/// assert_eq!(resolve(".:d", "a:b"), "a:b:d");
/// assert_eq!(resolve("e:", "x"), "e:start");
/// ```
pub fn resolve(target: &str, namespace: &str) -> String {
    resolve_with(target, namespace, Target::Page, true)
}

/// Resolve a target against the current namespace.
///
/// `normalize` restricts page ids to lowercase alphanumerics plus `_ - .`;
/// media ids are never case-folded.
pub fn resolve_with(target: &str, namespace: &str, kind: Target, normalize: bool) -> String {
    let target = target.trim();
    let namespace_start = target.ends_with(SEPARATOR);

    let mut segments: SmallVec<[&str; 8]> = SmallVec::new();
    let current = || namespace.split(SEPARATOR).filter(|s| !s.trim().is_empty());

    let rest = if let Some(rest) = target.strip_prefix(SEPARATOR) {
        rest
    } else if target.starts_with("..") {
        let mut rest = target;
        let mut levels = 0usize;
        while let Some(r) = rest.strip_prefix("..") {
            levels += 1;
            rest = r.strip_prefix(SEPARATOR).unwrap_or(r);
        }
        segments.extend(current());
        let keep = segments.len().saturating_sub(levels);
        segments.truncate(keep);
        rest
    } else if let Some(r) = target.strip_prefix('.').filter(|r| r.is_empty() || r.starts_with(SEPARATOR)) {
        segments.extend(current());
        r
    } else if target.contains(SEPARATOR) || kind == Target::Media {
        target
    } else {
        segments.extend(current());
        target
    };

    segments.extend(rest.split(SEPARATOR));

    let mut id = String::with_capacity(target.len() + namespace.len() + 8);
    for segment in segments {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let start = id.len();
        if start > 0 {
            id.push(SEPARATOR);
        }
        if normalize && kind == Target::Page {
            if !push_clean_segment(&mut id, segment) {
                id.truncate(start);
            }
        } else {
            id.push_str(segment);
        }
    }

    if namespace_start {
        if !id.is_empty() {
            id.push(SEPARATOR);
        }
        id.push_str(START_PAGE);
    } else if id.is_empty() {
        id.push_str(START_PAGE);
    }
    id
}

/// Append a normalized id segment. Returns false if nothing survived.
fn push_clean_segment(out: &mut String, segment: &str) -> bool {
    let start = out.len();
    let mut pending_underscore = false;
    for c in segment.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() || c == '-' || c == '.' {
            if pending_underscore && out.len() > start {
                out.push('_');
            }
            pending_underscore = false;
            out.push(c);
        } else {
            pending_underscore = true;
        }
    }
    out.len() > start
}
