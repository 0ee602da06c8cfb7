//! HTML output writer with optimized buffer management.

use crate::escape;

/// HTML output writer with pre-allocated, reusable buffer.
///
/// # Example
/// ```
/// use ferrowiki::HtmlWriter;
///
/// let mut writer = HtmlWriter::with_capacity_for(1000);
/// writer.write_str("<p>");
/// writer.write_escaped_text("Hello <World>");
/// writer.write_str("</p>");
///
/// let html = writer.into_string();
/// assert_eq!(html, "<p>Hello &lt;World&gt;</p>");
/// ```
pub struct HtmlWriter {
    out: String,
}

impl HtmlWriter {
    /// Create a new writer with default capacity.
    #[inline]
    pub fn new() -> Self {
        Self {
            out: String::with_capacity(1024),
        }
    }

    /// Create with pre-allocated capacity based on expected input size.
    ///
    /// Typical HTML is ~1.5x wiki input size.
    #[inline]
    pub fn with_capacity_for(input_len: usize) -> Self {
        let capacity = input_len + input_len / 2;
        Self {
            out: String::with_capacity(capacity),
        }
    }

    /// Write raw markup without escaping.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.out.push_str(s);
    }

    /// Write a single character.
    #[inline]
    pub fn write_char(&mut self, c: char) {
        self.out.push(c);
    }

    /// Write text with HTML escaping (for text content).
    #[inline]
    pub fn write_escaped_text(&mut self, text: &str) {
        escape::escape_text_into(&mut self.out, text);
    }

    /// Write attribute value with full escaping (including quotes).
    #[inline]
    pub fn write_escaped_attr(&mut self, attr: &str) {
        escape::escape_attr_into(&mut self.out, attr);
    }

    /// Write a user-supplied URL into an attribute.
    #[inline]
    pub fn write_url(&mut self, url: &str) {
        escape::url_attr_into(&mut self.out, url);
    }

    /// Write a newline.
    #[inline]
    pub fn newline(&mut self) {
        self.out.push('\n');
    }

    /// Current output length.
    #[inline]
    pub fn len(&self) -> usize {
        self.out.len()
    }

    /// Check if output is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Get output as str.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Take ownership as String.
    #[inline]
    pub fn into_string(self) -> String {
        self.out
    }

    /// Write a number as decimal.
    pub fn write_usize(&mut self, n: usize) {
        use std::fmt::Write;
        let _ = write!(self.out, "{n}");
    }

    // --- Common HTML Elements ---

    /// Write paragraph start: `<p>\n`
    #[inline]
    pub fn paragraph_start(&mut self) {
        self.write_str("<p>\n");
    }

    /// Write paragraph end: `\n</p>\n`
    #[inline]
    pub fn paragraph_end(&mut self) {
        self.write_str("\n</p>\n");
    }

    /// Write heading start: `<hN id="...">`
    #[inline]
    pub fn heading_start(&mut self, level: u8, id: &str) {
        debug_assert!((1..=6).contains(&level));
        self.write_str("<h");
        self.write_char((b'0' + level) as char);
        self.write_str(" id=\"");
        self.write_escaped_attr(id);
        self.write_str("\">");
    }

    /// Write heading end: `</hN>\n`
    #[inline]
    pub fn heading_end(&mut self, level: u8) {
        debug_assert!((1..=6).contains(&level));
        self.write_str("</h");
        self.write_char((b'0' + level) as char);
        self.write_str(">\n");
    }

    /// Write `<pre class="...">` with an optional language class.
    pub fn pre_start(&mut self, class: &str, lang: Option<&str>) {
        self.write_str("<pre class=\"");
        self.write_str(class);
        if let Some(lang) = lang.filter(|l| !l.is_empty()) {
            self.write_char(' ');
            self.write_escaped_attr(lang);
        }
        self.write_str("\">");
    }

    /// Write code block end: `</pre>\n`
    #[inline]
    pub fn pre_end(&mut self) {
        self.write_str("</pre>\n");
    }

    /// Write horizontal rule: `<hr />\n`
    #[inline]
    pub fn horizontal_rule(&mut self) {
        self.write_str("<hr />\n");
    }

    /// Write blockquote start: `<blockquote><div class="no">\n`
    #[inline]
    pub fn blockquote_start(&mut self) {
        self.write_str("<blockquote><div class=\"no\">\n");
    }

    /// Write blockquote end: `</div></blockquote>\n`
    #[inline]
    pub fn blockquote_end(&mut self) {
        self.write_str("</div></blockquote>\n");
    }

    /// Write list start: `<ul>\n` or `<ol>\n`
    #[inline]
    pub fn list_start(&mut self, ordered: bool) {
        self.write_str(if ordered { "<ol>\n" } else { "<ul>\n" });
    }

    /// Write list end: `</ul>\n` or `</ol>\n`
    #[inline]
    pub fn list_end(&mut self, ordered: bool) {
        self.write_str(if ordered { "</ol>\n" } else { "</ul>\n" });
    }

    /// Write list item start: `<li class="levelN"><div class="li">`
    #[inline]
    pub fn li_start(&mut self, level: usize) {
        self.write_str("<li class=\"level");
        self.write_usize(level);
        self.write_str("\"><div class=\"li\">");
    }

    /// Close the item's content wrapper: `</div>\n`
    #[inline]
    pub fn li_content_end(&mut self) {
        self.write_str("</div>\n");
    }

    /// Write list item end: `</li>\n`
    #[inline]
    pub fn li_end(&mut self) {
        self.write_str("</li>\n");
    }

    /// Write link start: `<a href="url" class="..." title="..." rel="...">`
    ///
    /// `href` is a raw URL and is made attribute-safe here.
    pub fn link_start(&mut self, href: &str, class: &str, title: Option<&str>, rel: Option<&str>) {
        self.write_str("<a href=\"");
        self.write_url(href);
        self.write_str("\" class=\"");
        self.write_escaped_attr(class);
        self.write_char('"');
        if let Some(title) = title {
            self.write_str(" title=\"");
            self.write_escaped_attr(title);
            self.write_char('"');
        }
        if let Some(rel) = rel {
            self.write_str(" rel=\"");
            self.write_str(rel);
            self.write_char('"');
        }
        self.write_char('>');
    }

    /// Write link end: `</a>`
    #[inline]
    pub fn link_end(&mut self) {
        self.write_str("</a>");
    }
}

impl Default for HtmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Write for HtmlWriter {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.out.push_str(s);
        Ok(())
    }
}
