//! Table layout.
//!
//! A table arrives as a block of raw row lines. Each line is split into
//! cells, padded to the table width, then two span passes run over the
//! whole buffer:
//!
//! - colspan: empty cells following a non-empty cell fold into it
//! - rowspan: a `:::` cell continues the open cell above it
//!
//! Both passes are linear in the number of cells.

use crate::context::RenderContext;
use crate::escape::escape_text;
use crate::inline::apply_inline_resolved;
use crate::inline::scan::Scanner;
use crate::limits::MAX_TABLE_COLUMNS;
use crate::render::HtmlWriter;

/// Header or data cell, from the delimiter that opens it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Header,
    Data,
}

/// Horizontal alignment, from the padding inside the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Why a cell produces no output of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// Folded into the colspan of a cell to its left.
    Colspan,
    /// Continues the rowspan of a cell above.
    Rowspan,
}

/// One table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell<'a> {
    /// Trimmed cell text.
    pub content: &'a str,
    pub kind: CellKind,
    pub align: Align,
    pub colspan: usize,
    pub rowspan: usize,
    /// First grid column the cell occupies.
    pub column: usize,
    pub skipped: Option<Skip>,
    /// Added to fill a short row.
    pub padding: bool,
}

impl<'a> Cell<'a> {
    fn new(raw: &'a str, kind: CellKind) -> Self {
        Self {
            content: raw.trim(),
            kind,
            align: alignment(raw),
            colspan: 1,
            rowspan: 1,
            column: 0,
            skipped: None,
            padding: false,
        }
    }

    fn padding(kind: CellKind) -> Self {
        Self {
            padding: true,
            ..Self::new("", kind)
        }
    }

    /// Whether the cell is a rowspan continuation marker.
    pub fn is_sentinel(&self) -> bool {
        self.content.len() >= 3 && self.content.bytes().all(|b| b == b':')
    }
}

/// A laid-out table.
#[derive(Debug, Default)]
pub struct TableLayout<'a> {
    pub rows: Vec<Vec<Cell<'a>>>,
    pub columns: usize,
}

impl TableLayout<'_> {
    /// Number of leading rows made entirely of header cells.
    pub fn header_rows(&self) -> usize {
        self.rows
            .iter()
            .take_while(|row| {
                let mut visible = row.iter().filter(|c| c.skipped.is_none()).peekable();
                visible.peek().is_some() && visible.all(|c| c.kind == CellKind::Header)
            })
            .count()
    }
}

fn alignment(raw: &str) -> Align {
    if raw.trim().is_empty() {
        return Align::Left;
    }
    let leading = raw.bytes().take_while(|&b| b == b' ').count();
    let trailing = raw.bytes().rev().take_while(|&b| b == b' ').count();
    match (leading >= 2, trailing >= 2) {
        (true, true) => Align::Center,
        (true, false) => Align::Right,
        _ => Align::Left,
    }
}

fn kind_of(delimiter: u8) -> CellKind {
    if delimiter == b'^' {
        CellKind::Header
    } else {
        CellKind::Data
    }
}

/// End of a span that hides delimiters, if one starts at `pos`.
fn protected_end(scanner: &mut Scanner<'_>, line: &str, pos: usize) -> Option<usize> {
    let rest = &line[pos..];
    if rest.starts_with("[[") || rest.starts_with("{{") {
        scanner.bracketed_span_end(pos)
    } else if rest.starts_with("%%") {
        scanner.find("%%", pos + 2).map(|end| end + 2)
    } else if rest.starts_with("<nowiki>") {
        scanner.find("</nowiki>", pos).map(|end| end + "</nowiki>".len())
    } else if rest.starts_with("<code") {
        scanner.find("</code>", pos).map(|end| end + "</code>".len())
    } else {
        None
    }
}

/// Split a row line into cells.
///
/// Returns `None` for a malformed row: one that does not start with a
/// delimiter or does not end with one.
pub fn split_row(line: &str) -> Option<Vec<Cell<'_>>> {
    let line = line.trim_end();
    let bytes = line.as_bytes();
    if !matches!(bytes.first(), Some(b'^' | b'|')) {
        return None;
    }

    let mut scanner = Scanner::new(line);
    let mut cells = Vec::new();
    let mut open = 0;
    let mut i = 1;
    let mut last_delimiter = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'[' | b'{' | b'%' | b'<' => {
                if let Some(end) = protected_end(&mut scanner, line, i) {
                    i = end;
                    continue;
                }
            }
            b'^' | b'|' => {
                cells.push(Cell::new(&line[open + 1..i], kind_of(bytes[open])));
                open = i;
                last_delimiter = i;
            }
            _ => {}
        }
        i += 1;
    }

    if cells.is_empty() || last_delimiter + 1 != bytes.len() {
        return None;
    }
    Some(cells)
}

/// Whether `line` is a complete table row.
pub fn is_row(line: &str) -> bool {
    split_row(line).is_some()
}

/// Split, pad and span a buffered table.
pub fn compute<'a>(lines: &[&'a str]) -> TableLayout<'a> {
    let mut rows: Vec<Vec<Cell<'a>>> = lines
        .iter()
        .filter_map(|&line| {
            let row = split_row(line);
            if row.is_none() {
                log::debug!("dropping malformed table row `{line}`");
            }
            row
        })
        .collect();

    let columns = rows
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0)
        .min(MAX_TABLE_COLUMNS);
    for row in &mut rows {
        if row.len() > columns {
            log::debug!("truncating table row of {} cells to {columns}", row.len());
            row.truncate(columns);
        }
        let kind = row.last().map_or(CellKind::Data, |c| c.kind);
        row.resize_with(columns, || Cell::padding(kind));
    }

    for row in &mut rows {
        fold_colspans(row);
    }
    attach_rowspans(&mut rows, columns);

    TableLayout { rows, columns }
}

fn fold_colspans(row: &mut [Cell<'_>]) {
    let mut owner: Option<usize> = None;
    for j in 0..row.len() {
        if row[j].padding {
            owner = None;
        } else if row[j].content.is_empty() {
            if let Some(o) = owner {
                row[o].colspan += 1;
                row[j].skipped = Some(Skip::Colspan);
            }
        } else {
            owner = Some(j);
        }
    }

    let mut column = 0;
    for cell in row.iter_mut().filter(|c| c.skipped.is_none()) {
        cell.column = column;
        column += cell.colspan;
    }
}

fn attach_rowspans(rows: &mut [Vec<Cell<'_>>], columns: usize) {
    // Per column, the cell a continuation below would extend.
    let mut anchors: Vec<Option<(usize, usize)>> = vec![None; columns];
    for r in 0..rows.len() {
        for j in 0..rows[r].len() {
            let cell = &rows[r][j];
            if cell.skipped.is_some() {
                continue;
            }
            let (column, colspan) = (cell.column, cell.colspan);
            if column >= columns {
                continue;
            }

            if cell.is_sentinel() {
                if let Some((ar, aj)) = anchors[column] {
                    if rows[ar][aj].colspan == colspan {
                        rows[ar][aj].rowspan += 1;
                        rows[r][j].skipped = Some(Skip::Rowspan);
                        continue;
                    }
                }
                log::debug!("rowspan marker in row {r} has no cell above, kept as text");
            }

            anchors[column] = Some((r, j));
            let covered = (column + colspan).min(columns);
            for anchor in &mut anchors[column + 1..covered] {
                *anchor = None;
            }
        }
    }
}

/// Lay out and render a buffered table.
///
/// Cell text runs through the inline engine with its placeholders resolved
/// locally, or is escaped as-is when `verbatim` is set.
pub fn layout(lines: &[&str], ctx: &mut RenderContext<'_>, verbatim: bool) -> String {
    let table = compute(lines);
    if table.rows.is_empty() {
        return String::new();
    }
    log::debug!("table: {} rows x {} columns", table.rows.len(), table.columns);

    let header_rows = table.header_rows();
    let mut writer = HtmlWriter::new();
    writer.write_str("<div class=\"table\"><table class=\"inline\">\n");
    for (r, row) in table.rows.iter().enumerate() {
        if r == 0 && header_rows > 0 {
            writer.write_str("<thead>\n");
        }
        if r == header_rows {
            writer.write_str("<tbody>\n");
        }
        writer.write_str("<tr class=\"row");
        writer.write_usize(r);
        writer.write_str("\">\n");
        for cell in row.iter().filter(|c| c.skipped.is_none()) {
            write_cell(&mut writer, cell, ctx, verbatim);
        }
        writer.write_str("</tr>\n");
        if r + 1 == header_rows {
            writer.write_str("</thead>\n");
        }
    }
    if header_rows < table.rows.len() {
        writer.write_str("</tbody>\n");
    }
    writer.write_str("</table></div>\n");
    writer.into_string()
}

fn write_cell(writer: &mut HtmlWriter, cell: &Cell<'_>, ctx: &mut RenderContext<'_>, verbatim: bool) {
    let tag = match cell.kind {
        CellKind::Header => "th",
        CellKind::Data => "td",
    };
    writer.write_str("\t<");
    writer.write_str(tag);
    writer.write_str(" class=\"col");
    writer.write_usize(cell.column);
    match cell.align {
        Align::Center => writer.write_str(" centeralign"),
        Align::Right => writer.write_str(" rightalign"),
        Align::Left => {}
    }
    writer.write_char('"');
    if cell.colspan > 1 {
        writer.write_str(" colspan=\"");
        writer.write_usize(cell.colspan);
        writer.write_char('"');
    }
    if cell.rowspan > 1 {
        writer.write_str(" rowspan=\"");
        writer.write_usize(cell.rowspan);
        writer.write_char('"');
    }
    writer.write_char('>');
    if !cell.content.is_empty() {
        if verbatim {
            writer.write_str(&escape_text(cell.content));
        } else {
            writer.write_str(&apply_inline_resolved(cell.content, ctx));
        }
    }
    writer.write_str("</");
    writer.write_str(tag);
    writer.write_str(">\n");
}
