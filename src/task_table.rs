//! Raw per-task participant data
//!
//! Passes the study-specific task fields through untouched, one block of
//! participant rows per task.

use crate::error::Result;
use crate::record::{columns, Dataset};
use crate::table::ResultTable;

pub const HEADERS: [&str; 6] = [
    "Task",
    "Participant",
    "Bugs Elicited",
    "Bug Desc. Accuracy",
    "Confidence",
    "Time (mm:ss)",
];

/// Build the task table; null cells render empty
pub fn build_task_table(dataset: &Dataset, tasks: &[u32]) -> Result<ResultTable> {
    let mut table = ResultTable::new(HEADERS);

    for &task in tasks {
        let fields = [
            columns::test_cases(task),
            columns::accuracy(task),
            columns::confidence(task),
            columns::elapsed(task),
        ];
        for (i, record) in dataset.iter().enumerate() {
            let mut cells = vec![
                task.to_string(),
                record.field(columns::PARTICIPANT)?.unwrap_or_default().to_string(),
            ];
            for field in &fields {
                cells.push(record.field(field)?.unwrap_or_default().to_string());
            }
            table.push_row(cells, i + 1 == dataset.len());
        }
    }

    Ok(table)
}
