//! CSV input for study data files
//!
//! Reads the exports the coders produce (step transcripts, step transitions,
//! participant task data) into a [`Dataset`]. Quoting follows the same rules
//! as `csv_output`: a field containing a comma, quote, or newline is wrapped
//! in quotes with inner quotes doubled.

use crate::record::{Dataset, Record};
use anyhow::{Context, Result};
use std::path::Path;

/// Cell values treated as the CSV-null sentinel
pub const NULL_SENTINELS: &[&str] = &["", "nan", "NaN", "NA", "N/A", "null", "NULL", "#N/A"];

pub fn is_null_sentinel(value: &str) -> bool {
    NULL_SENTINELS.contains(&value)
}

/// Read and parse a CSV file
pub fn read_csv(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read CSV file {}", path.display()))?;
    let dataset =
        parse_csv(&text).with_context(|| format!("Failed to parse CSV file {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        rows = dataset.len(),
        columns = dataset.columns.len(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Parse CSV text whose first row is the header
pub fn parse_csv(text: &str) -> Result<Dataset> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rows = split_rows(text)?.into_iter();

    let Some((_, header)) = rows.next() else {
        anyhow::bail!("CSV input has no header row");
    };
    let columns: Vec<String> = header.into_iter().map(|c| c.trim().to_string()).collect();

    let mut records = Vec::new();
    for (line, fields) in rows {
        // A trailing blank line parses as one empty field
        if fields.len() == 1 && fields[0].is_empty() {
            continue;
        }
        if fields.len() != columns.len() {
            anyhow::bail!(
                "Line {} has {} fields but the header has {}",
                line,
                fields.len(),
                columns.len()
            );
        }
        let values = columns
            .iter()
            .cloned()
            .zip(fields)
            .map(|(column, value)| {
                let value = if is_null_sentinel(&value) {
                    None
                } else {
                    Some(value)
                };
                (column, value)
            })
            .collect();
        records.push(Record::new(line, values));
    }

    Ok(Dataset::new(columns, records))
}

/// Split CSV text into rows of unescaped fields, tagged with their starting line
fn split_rows(text: &str) -> Result<Vec<(usize, Vec<String>)>> {
    let mut rows = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut row_start = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                rows.push((row_start, std::mem::take(&mut fields)));
                line += 1;
                row_start = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        anyhow::bail!("Unterminated quoted field starting on line {}", row_start);
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        rows.push((row_start, fields));
    }

    Ok(rows)
}
