//! Table layout tests: spans, alignment, sections and malformed rows.

use ferrowiki::table::{compute, Skip};
use ferrowiki::to_html;

#[test]
fn simple_table() {
    let html = to_html("^ Name ^ Value ^\n| a | 1 |\n");
    assert_eq!(
        html,
        "<div class=\"wikitext\">\n\
         <div class=\"table\"><table class=\"inline\">\n\
         <thead>\n\
         <tr class=\"row0\">\n\t<th class=\"col0\">Name</th>\n\t<th class=\"col1\">Value</th>\n</tr>\n\
         </thead>\n\
         <tbody>\n\
         <tr class=\"row1\">\n\t<td class=\"col0\">a</td>\n\t<td class=\"col1\">1</td>\n</tr>\n\
         </tbody>\n\
         </table></div>\n\
         </div>\n"
    );
}

#[test]
fn rowspan_sentinel_extends_cell_above() {
    let html = to_html("| a | b |\n| c | ::: |");
    assert!(html.contains("<td class=\"col1\" rowspan=\"2\">b</td>"), "{html}");
    assert!(html.contains("<tr class=\"row1\">\n\t<td class=\"col0\">c</td>\n</tr>"), "{html}");
    assert!(!html.contains(":::"), "{html}");
}

#[test]
fn longer_sentinels_also_span() {
    let html = to_html("| a | b |\n| c | :::: |");
    assert!(html.contains("rowspan=\"2\""), "{html}");
}

#[test]
fn empty_cells_widen_the_previous_cell() {
    let html = to_html("^ Heading spanning three |||\n| a | b | c |");
    assert!(html.contains("<th class=\"col0\" colspan=\"3\">Heading spanning three</th>"), "{html}");
}

#[test]
fn alignment_classes() {
    let html = to_html("|  centered  |   right| left   |");
    assert!(html.contains("class=\"col0 centeralign\""), "{html}");
    assert!(html.contains("class=\"col1 rightalign\""), "{html}");
    assert!(html.contains("<td class=\"col2\">left</td>"), "{html}");
}

#[test]
fn header_column_in_body_rows() {
    let html = to_html("^ h | d |\n^ h2 | d2 |");
    assert!(!html.contains("<thead>"), "{html}");
    assert!(html.contains("<th class=\"col0\">h</th>\n\t<td class=\"col1\">d</td>"), "{html}");
}

#[test]
fn only_leading_header_rows_form_thead() {
    let html = to_html("^ a ^\n| b |\n^ c ^");
    assert_eq!(html.matches("<thead>").count(), 1);
    let tbody = html.find("<tbody>").unwrap();
    assert!(html[tbody..].contains("<th class=\"col0\">c</th>"), "{html}");
}

#[test]
fn short_rows_are_padded() {
    let html = to_html("| a | b | c |\n| x |");
    let row1 = html.split("<tr class=\"row1\">").nth(1).unwrap();
    assert_eq!(row1.split("</tr>").next().unwrap().matches("<td").count(), 3, "{html}");
}

#[test]
fn cells_may_contain_pipes_in_links() {
    let html = to_html("| [[page|Label]] | x |");
    assert!(html.contains(">Label</a></td>"), "{html}");
    assert!(html.contains("<td class=\"col1\">x</td>"), "{html}");
}

#[test]
fn malformed_row_ends_table() {
    let html = to_html("| a | b |\n| broken row\n| c | d |");
    assert_eq!(html.matches("<table").count(), 2, "{html}");
    assert!(html.contains("</table></div>\n<p>\n| broken row\n</p>\n"), "{html}");
}

#[test]
fn malformed_row_alone_is_a_paragraph() {
    let html = to_html("| no end");
    assert!(!html.contains("<table"), "{html}");
    assert!(html.contains("<p>\n| no end\n</p>"), "{html}");
}

#[test]
fn blank_line_keeps_table_open() {
    let html = to_html("| a |\n\n| b |");
    assert_eq!(html.matches("<table").count(), 1, "{html}");
    assert!(html.contains("<tr class=\"row1\">"), "{html}");
}

#[test]
fn rowspan_crosses_blank_line() {
    let html = to_html("^ h1 ^ h2 ^\n| a | b |\n\n| c | ::: |");
    assert_eq!(html.matches("<table").count(), 1, "{html}");
    assert!(html.contains("<td class=\"col1\" rowspan=\"2\">b</td>"), "{html}");
    assert!(!html.contains(":::"), "{html}");
}

#[test]
fn text_after_blank_line_ends_table() {
    let html = to_html("| a |\n\nafter");
    assert!(html.contains("</table></div>\n<p>\nafter\n</p>"), "{html}");
}

#[test]
fn colspans_sum_to_column_count() {
    let lines = ["^ a ^ b ^ c ^", "| wide || c |", "| x | y | z |", "| all |||"];
    let table = compute(&lines);
    assert_eq!(table.columns, 3);
    for row in &table.rows {
        let spans: usize = row
            .iter()
            .filter(|c| c.skipped != Some(Skip::Colspan))
            .map(|c| c.colspan)
            .sum();
        assert_eq!(spans, table.columns);
    }
}

#[test]
fn rowspans_chain_down_a_column() {
    let table = compute(&["| a | b |", "| c | ::: |", "| d | ::: |", "| e | f |"]);
    assert_eq!(table.rows[0][1].rowspan, 3);
    assert_eq!(table.rows[1][1].skipped, Some(Skip::Rowspan));
    assert_eq!(table.rows[2][1].skipped, Some(Skip::Rowspan));
    assert_eq!(table.rows[3][1].rowspan, 1);
    assert!(table.rows.iter().flatten().all(|c| c.rowspan >= 1));
}
