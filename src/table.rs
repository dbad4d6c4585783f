//! Result tables produced by the aggregators
//!
//! A table is write-once: rows keep construction order and are never sorted.
//! Several aggregator outputs with the same headers can be concatenated with
//! [`ResultTable::append`].

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};

/// One formatted row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<String>,
    /// The row closes a visual group (a rule is drawn below it)
    pub divider: bool,
}

/// Ordered, formatted output of one aggregation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTable {
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl ResultTable {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, cells: Vec<String>, divider: bool) {
        debug_assert_eq!(cells.len(), self.headers.len());
        self.rows.push(TableRow { cells, divider });
    }

    /// Flag the current last row as closing its group
    pub fn mark_last_divider(&mut self) {
        if let Some(last) = self.rows.last_mut() {
            last.divider = true;
        }
    }

    /// Append another table's rows; headers must match exactly
    pub fn append(&mut self, other: ResultTable) -> Result<()> {
        if self.headers != other.headers {
            return Err(AnalysisError::HeaderMismatch {
                expected: self.headers.clone(),
                found: other.headers,
            });
        }
        self.rows.extend(other.rows);
        Ok(())
    }

    /// Concatenate tables in order; `None` for an empty input
    pub fn concat(tables: impl IntoIterator<Item = ResultTable>) -> Result<Option<ResultTable>> {
        let mut merged: Option<ResultTable> = None;
        for table in tables {
            match merged.as_mut() {
                Some(acc) => acc.append(table)?,
                None => merged = Some(table),
            }
        }
        Ok(merged)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row indices that carry a divider
    pub fn divider_positions(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.divider)
            .map(|(i, _)| i)
            .collect()
    }
}

/// A table with the report title it is printed under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitledTable {
    pub title: String,
    #[serde(flatten)]
    pub table: ResultTable,
}
