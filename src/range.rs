//! Compact byte range into the source text.
//!
//! Block events refer to the input by `u32` offsets instead of owning
//! copies of each line. Documents up to 4GB are supported.

/// Compact range into the input text.
///
/// # Example
/// ```
/// use ferrowiki::Range;
///
/// let input = "Hello, World!";
/// let range = Range::new(0, 5);
/// assert_eq!(range.slice(input), "Hello");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Range {
    pub start: u32,
    pub end: u32,
}

const _: () = assert!(std::mem::size_of::<Range>() == 8);

impl Range {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Create a range from usize offsets.
    #[inline]
    pub fn from_usize(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        debug_assert!(end <= u32::MAX as usize);
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// The text this range refers to. Offsets must lie on char boundaries.
    #[inline]
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start as usize..self.end as usize]
    }

    #[inline]
    pub const fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub const fn start_usize(&self) -> usize {
        self.start as usize
    }

    /// Subrange `offset..offset + len`, relative to this range's start.
    #[inline]
    pub fn subrange(&self, offset: usize, len: usize) -> Self {
        debug_assert!(offset + len <= self.len());
        Self::from_usize(self.start_usize() + offset, self.start_usize() + offset + len)
    }

    /// The part of this range after `offset` bytes.
    #[inline]
    pub fn skip(&self, offset: usize) -> Self {
        self.subrange(offset, self.len() - offset)
    }

    /// Shrink the range to exclude leading and trailing whitespace.
    pub fn trim(&self, input: &str) -> Self {
        let text = self.slice(input);
        let leading = text.len() - text.trim_start().len();
        let trimmed = text.trim().len();
        self.subrange(leading, trimmed)
    }
}

impl From<std::ops::Range<usize>> for Range {
    #[inline]
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::from_usize(r.start, r.end)
    }
}
