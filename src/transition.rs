//! Step transition matrix
//!
//! Counts how often each coded step is immediately followed by each other
//! step. Row percentages are relative to the row's own total ("what does this
//! step lead to"), never to the grand total.

use crate::error::Result;
use crate::format::{count_or_empty, format_percent, EMPTY_CELL};
use crate::record::{columns, Dataset, Record};
use crate::steps::StepCode;
use crate::table::ResultTable;

/// Header of the row-label column
pub const CURRENT_NEXT_HEADER: &str = "Current \\ Next Step";

/// Transition counts over a fixed, ordered step vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionMatrix {
    vocabulary: Vec<StepCode>,
    /// `counts[i][j]`: rows with `ThisStep == vocabulary[i]` and `NextStep == vocabulary[j]`
    counts: Vec<Vec<u64>>,
    /// Rows with `ThisStep == vocabulary[i]`, whatever their next step
    row_totals: Vec<u64>,
    /// Rows with `NextStep == vocabulary[j]`
    column_totals: Vec<u64>,
    /// Rows with any non-null `NextStep`
    grand_total: u64,
}

impl TransitionMatrix {
    /// Count transitions in rows carrying `ThisStep` / `NextStep`
    pub fn build(dataset: &Dataset, vocabulary: &[StepCode]) -> Result<Self> {
        let n = vocabulary.len();
        let mut counts = vec![vec![0u64; n]; n];
        let mut row_totals = vec![0u64; n];
        let mut column_totals = vec![0u64; n];
        let mut grand_total = 0u64;

        let position = |value: Option<&str>| {
            value.and_then(|v| vocabulary.iter().position(|step| step.as_str() == v))
        };

        for record in dataset.iter() {
            let this_value = record.field(columns::THIS_STEP)?;
            let next_value = record.field(columns::NEXT_STEP)?;
            let this_step = position(this_value);
            let next_step = position(next_value);

            if next_value.is_some() {
                grand_total += 1;
                if next_step.is_none() {
                    tracing::warn!(
                        next_step = next_value.unwrap_or_default(),
                        line = record.line(),
                        "next step outside the transition vocabulary"
                    );
                }
            }
            if let Some(i) = this_step {
                row_totals[i] += 1;
            }
            if let Some(j) = next_step {
                column_totals[j] += 1;
            }
            if let (Some(i), Some(j)) = (this_step, next_step) {
                counts[i][j] += 1;
            }
        }

        tracing::debug!(rows = dataset.len(), grand_total, "built transition matrix");

        Ok(Self {
            vocabulary: vocabulary.to_vec(),
            counts,
            row_totals,
            column_totals,
            grand_total,
        })
    }

    pub fn vocabulary(&self) -> &[StepCode] {
        &self.vocabulary
    }

    fn index(&self, step: StepCode) -> Option<usize> {
        self.vocabulary.iter().position(|s| *s == step)
    }

    pub fn count(&self, this_step: StepCode, next_step: StepCode) -> u64 {
        match (self.index(this_step), self.index(next_step)) {
            (Some(i), Some(j)) => self.counts[i][j],
            _ => 0,
        }
    }

    pub fn row_total(&self, this_step: StepCode) -> u64 {
        self.index(this_step).map_or(0, |i| self.row_totals[i])
    }

    pub fn column_total(&self, next_step: StepCode) -> u64 {
        self.index(next_step).map_or(0, |j| self.column_totals[j])
    }

    pub fn grand_total(&self) -> u64 {
        self.grand_total
    }

    /// Share of `this_step`'s transitions that go to `next_step`
    pub fn row_share(&self, this_step: StepCode, next_step: StepCode) -> Option<f64> {
        crate::format::ratio(self.count(this_step, next_step), self.row_total(this_step))
    }

    pub fn headers(vocabulary: &[StepCode]) -> Vec<String> {
        let mut headers = vec!["Treatment".to_string(), CURRENT_NEXT_HEADER.to_string()];
        headers.extend(vocabulary.iter().map(|s| s.to_string()));
        headers.push("Σ".to_string());
        headers
    }

    /// Render one treatment block: a row per step plus the column-total row
    ///
    /// The last step row and the total row close their groups, so blocks from
    /// several treatments can be appended into one table.
    pub fn to_table(&self, treatment: &str) -> ResultTable {
        let mut table = ResultTable::new(Self::headers(&self.vocabulary));

        for (i, this_step) in self.vocabulary.iter().enumerate() {
            let row_total = self.row_totals[i];
            let mut cells = vec![treatment.to_string(), this_step.to_string()];
            for &count in &self.counts[i] {
                cells.push(if count == 0 {
                    EMPTY_CELL.to_string()
                } else {
                    format!(
                        "{} ({})",
                        count,
                        format_percent(count as f64 / row_total as f64, 2)
                    )
                });
            }
            cells.push(format!("{} (100%)", row_total));
            table.push_row(cells, i + 1 == self.vocabulary.len());
        }

        let mut cells = vec![String::new(), "Σ".to_string()];
        cells.extend(self.column_totals.iter().map(|&c| count_or_empty(c)));
        cells.push(self.grand_total.to_string());
        table.push_row(cells, true);

        table
    }
}

/// Turn one session's ordered step sequence into `Session, ThisStep, NextStep` rows
pub fn transitions_from_sequence(session: &str, steps: &[StepCode]) -> Vec<Record> {
    steps
        .windows(2)
        .map(|pair| {
            Record::from_pairs(&[
                (columns::SESSION, session),
                (columns::THIS_STEP, pair[0].as_str()),
                (columns::NEXT_STEP, pair[1].as_str()),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use StepCode::{S2, S3, S4};

    fn transition(session: &str, this_step: &str, next_step: &str) -> Record {
        Record::from_pairs(&[
            ("Session", session),
            ("ThisStep", this_step),
            ("NextStep", next_step),
        ])
    }

    fn cells(table: &ResultTable, row: usize) -> Vec<&str> {
        table.rows[row].cells.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_two_session_regression_fixture() {
        let mut records = transitions_from_sequence("P01J", &[S2, S3, S2]);
        records.extend(transitions_from_sequence("P02J", &[S3, S2]));
        let dataset = Dataset::from_records(records);

        let matrix = TransitionMatrix::build(&dataset, &StepCode::TRANSITION).unwrap();
        let table = matrix.to_table("Jest");

        assert_eq!(
            cells(&table, 0),
            vec!["Jest", "S2", "--", "1 (100.00%)", "--", "--", "--", "--", "1 (100%)"]
        );
        assert_eq!(
            cells(&table, 1),
            vec!["Jest", "S3", "2 (100.00%)", "--", "--", "--", "--", "--", "2 (100%)"]
        );
        assert_eq!(
            cells(&table, 2),
            vec!["Jest", "S4", "--", "--", "--", "--", "--", "--", "0 (100%)"]
        );
        assert_eq!(
            cells(&table, 6),
            vec!["", "Σ", "2", "1", "--", "--", "--", "--", "3"]
        );
        assert_eq!(table.divider_positions(), vec![5, 6]);
    }

    #[test]
    fn test_row_percentages_use_row_total() {
        let dataset = Dataset::from_records(vec![
            transition("P01J", "S2", "S3"),
            transition("P01J", "S2", "S4"),
            transition("P01J", "S2", "S4"),
            transition("P01J", "S4", "S7"),
        ]);
        let matrix = TransitionMatrix::build(&dataset, &StepCode::TRANSITION).unwrap();

        assert_eq!(matrix.row_total(S2), 3);
        assert_eq!(matrix.count(S2, S4), 2);
        assert_eq!(matrix.grand_total(), 4);

        let table = matrix.to_table("Jest");
        assert_eq!(table.rows[0].cells[3], "1 (33.33%)");
        assert_eq!(table.rows[0].cells[4], "2 (66.67%)");
        assert_eq!(table.rows[2].cells[7], "1 (100.00%)");
    }

    #[test]
    fn test_out_of_vocabulary_next_step_counts_in_totals_only() {
        let dataset = Dataset::from_records(vec![
            transition("P01J", "S2", "S1"),
            transition("P01J", "S2", "S3"),
        ]);
        let matrix = TransitionMatrix::build(&dataset, &StepCode::TRANSITION).unwrap();
        assert_eq!(matrix.row_total(S2), 2);
        assert_eq!(matrix.column_total(S3), 1);
        assert_eq!(matrix.grand_total(), 2);
    }

    #[test]
    fn test_null_next_step_excluded_from_grand_total() {
        let dataset = Dataset::from_records(vec![
            transition("P01J", "S2", "S3"),
            transition("P01J", "S3", ""),
        ]);
        let matrix = TransitionMatrix::build(&dataset, &StepCode::TRANSITION).unwrap();
        assert_eq!(matrix.row_total(S3), 1);
        assert_eq!(matrix.grand_total(), 1);
    }

    #[test]
    fn test_missing_column_is_error() {
        let dataset = Dataset::from_records(vec![Record::from_pairs(&[("ThisStep", "S2")])]);
        assert!(TransitionMatrix::build(&dataset, &StepCode::TRANSITION).is_err());
    }

    #[test]
    fn test_blocks_append_into_one_table() {
        let jest = Dataset::from_records(vec![transition("P01J", "S2", "S3")]);
        let nano = Dataset::from_records(vec![transition("P01A", "S3", "S2")]);

        let mut table = TransitionMatrix::build(&jest, &StepCode::TRANSITION)
            .unwrap()
            .to_table("Jest");
        table
            .append(
                TransitionMatrix::build(&nano, &StepCode::TRANSITION)
                    .unwrap()
                    .to_table("NaNofuzz"),
            )
            .unwrap();

        assert_eq!(table.len(), 14);
        assert_eq!(table.rows[7].cells[0], "NaNofuzz");
        assert_eq!(table.divider_positions(), vec![5, 6, 12, 13]);
    }

    #[test]
    fn test_row_share() {
        let dataset = Dataset::from_records(vec![transition("P01J", "S2", "S3")]);
        let matrix = TransitionMatrix::build(&dataset, &StepCode::TRANSITION).unwrap();
        assert_eq!(matrix.row_share(S2, S3), Some(1.0));
        assert_eq!(matrix.row_share(S4, S3), None);
    }
}
