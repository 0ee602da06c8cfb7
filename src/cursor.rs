//! Line cursor over the input text.
//!
//! Yields one [`Range`] per line with the terminator removed. `\n` and
//! `\r\n` endings are both accepted.

use crate::Range;
use memchr::memchr;

/// Iterator over the lines of the input.
///
/// # Example
/// ```
/// use ferrowiki::cursor::LineCursor;
///
/// let input = "one\r\ntwo\n";
/// let lines: Vec<_> = LineCursor::new(input).map(|r| r.slice(input)).collect();
/// assert_eq!(lines, ["one", "two"]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct LineCursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    #[inline]
    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }
}

impl Iterator for LineCursor<'_> {
    type Item = Range;

    fn next(&mut self) -> Option<Range> {
        if self.is_eof() {
            return None;
        }
        let bytes = self.input.as_bytes();
        let start = self.pos;
        let newline = memchr(b'\n', &bytes[start..]).map_or(bytes.len(), |p| start + p);
        let mut end = newline;
        if end > start && bytes[end - 1] == b'\r' {
            end -= 1;
        }
        self.pos = newline + 1;
        Some(Range::from_usize(start, end))
    }
}
