//! DoS prevention constants.
//!
//! These limits keep pathological inputs linear and bound recursion.

/// Maximum list nesting depth; deeper items are clamped to this depth.
pub const MAX_LIST_DEPTH: usize = 32;

/// Maximum blockquote nesting level; deeper markers are clamped.
pub const MAX_QUOTE_DEPTH: usize = 32;

/// Maximum recursion of the inline engine (link labels, footnote bodies,
/// table cells). Deeper content is escaped instead of formatted.
pub const MAX_INLINE_DEPTH: usize = 8;

/// Maximum nesting of placeholder fragments during resolution.
pub const MAX_PLACEHOLDER_DEPTH: usize = 64;

/// Maximum table columns; extra cells are dropped.
pub const MAX_TABLE_COLUMNS: usize = 128;

/// Maximum image dimension accepted from media parameters.
pub const MAX_MEDIA_DIMENSION: u32 = 100_000;
