//! Plain-text table rendering for terminal reports
//!
//! Layout:
//!
//! ```text
//! +------+-------+
//! | Step | Count |
//! +------+-------+
//! | S2   | 3     |
//! +------+-------+
//! ```
//!
//! A rule is drawn under the header, under every divider row, and at the end
//! (unless the last row already drew one).

use crate::table::{ResultTable, TitledTable};

/// Render a table as boxed ASCII text
pub fn render_table(table: &ResultTable) -> String {
    let widths = column_widths(table);
    let rule = rule_line(&widths);

    let mut output = String::new();
    output.push_str(&rule);
    output.push_str(&format_line(&table.headers, &widths));
    output.push_str(&rule);

    for row in &table.rows {
        output.push_str(&format_line(&row.cells, &widths));
        if row.divider {
            output.push_str(&rule);
        }
    }

    if table.rows.last().is_some_and(|row| !row.divider) {
        output.push_str(&rule);
    }

    output
}

/// Render a titled table with its heading line
pub fn render_titled(titled: &TitledTable) -> String {
    format!("{}\n{}", titled.title, render_table(&titled.table))
}

fn column_widths(table: &ResultTable) -> Vec<usize> {
    let mut widths: Vec<usize> = table.headers.iter().map(|h| display_width(h)).collect();
    for row in &table.rows {
        for (width, cell) in widths.iter_mut().zip(&row.cells) {
            *width = (*width).max(display_width(cell));
        }
    }
    widths
}

fn display_width(text: &str) -> usize {
    text.chars().count()
}

fn rule_line(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line.push('\n');
    line
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        let pad = width - display_width(cell);
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(pad + 1));
        line.push('|');
    }
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResultTable {
        let mut table = ResultTable::new(["Step", "Count"]);
        table.push_row(vec!["S2".to_string(), "3".to_string()], false);
        table.push_row(vec!["Σ".to_string(), "10".to_string()], true);
        table
    }

    #[test]
    fn test_render_layout() {
        let text = render_table(&sample());
        let expected = "\
+------+-------+
| Step | Count |
+------+-------+
| S2   | 3     |
| Σ    | 10    |
+------+-------+
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_closing_rule_without_divider() {
        let mut table = ResultTable::new(["a"]);
        table.push_row(vec!["1".to_string()], false);
        let text = render_table(&table);
        assert_eq!(text.lines().filter(|l| l.starts_with('+')).count(), 3);
    }

    #[test]
    fn test_render_header_only() {
        let table = ResultTable::new(["a"]);
        assert_eq!(render_table(&table), "+---+\n| a |\n+---+\n");
    }

    #[test]
    fn test_render_titled() {
        let titled = TitledTable {
            title: "(R6) Transitions".to_string(),
            table: sample(),
        };
        assert!(render_titled(&titled).starts_with("(R6) Transitions\n+"));
    }
}
