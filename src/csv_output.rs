//! CSV output format for result tables
//!
//! For spreadsheet analysis of the reports. Divider flags have no CSV
//! representation and are dropped.

use crate::table::{ResultTable, TitledTable};

/// CSV output formatter
#[derive(Debug)]
pub struct CsvOutput<'a> {
    table: &'a ResultTable,
}

impl<'a> CsvOutput<'a> {
    pub fn new(table: &'a ResultTable) -> Self {
        Self { table }
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        // If field contains comma, quote, or newline, wrap in quotes and escape quotes
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn format_row(cells: &[String]) -> String {
        cells
            .iter()
            .map(|cell| Self::escape_field(cell))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        output.push_str(&Self::format_row(&self.table.headers));
        output.push('\n');

        for row in &self.table.rows {
            output.push_str(&Self::format_row(&row.cells));
            output.push('\n');
        }

        output
    }
}

/// Render several titled tables, each preceded by a `# title` comment line
pub fn titled_tables_to_csv(tables: &[TitledTable]) -> String {
    tables
        .iter()
        .map(|t| format!("# {}\n{}", t.title, CsvOutput::new(&t.table).to_csv()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_escape_field_simple() {
        assert_eq!(CsvOutput::escape_field("hello"), "hello");
    }

    #[test]
    fn test_csv_escape_field_with_comma() {
        assert_eq!(CsvOutput::escape_field("Jest, NaNo"), "\"Jest, NaNo\"");
    }

    #[test]
    fn test_csv_escape_field_with_quote() {
        assert_eq!(CsvOutput::escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_csv_to_csv_output() {
        let mut table = ResultTable::new(["Dataset", "Step", "N"]);
        table.push_row(
            vec!["Jest, NaNo".to_string(), "S1".to_string(), "12".to_string()],
            true,
        );

        let csv = CsvOutput::new(&table).to_csv();
        assert_eq!(csv, "Dataset,Step,N\n\"Jest, NaNo\",S1,12\n");
    }

    #[test]
    fn test_titled_tables_to_csv() {
        let tables = vec![
            TitledTable {
                title: "first".to_string(),
                table: ResultTable::new(["a"]),
            },
            TitledTable {
                title: "second".to_string(),
                table: ResultTable::new(["b"]),
            },
        ];
        assert_eq!(titled_tables_to_csv(&tables), "# first\na\n\n# second\nb\n");
    }
}
