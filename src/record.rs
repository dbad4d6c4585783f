//! In-memory study records
//!
//! A `Dataset` is one fully loaded table of observations. Records are never
//! mutated by the aggregators; a null cell (the CSV-null sentinel) is stored
//! as `None`.

use crate::error::{AnalysisError, Result};
use std::fmt;

/// Column names shared by the study data files
pub mod columns {
    pub const SESSION: &str = "Session";
    pub const RATER: &str = "Rater";
    pub const TREATMENT: &str = "Treatment";
    pub const RECORDING_TIME: &str = "Time (Recording)";
    pub const THIS_STEP: &str = "ThisStep";
    pub const NEXT_STEP: &str = "NextStep";
    pub const PARTICIPANT: &str = "ID";

    pub fn elapsed(task: u32) -> String {
        format!("Elapsed{}", task)
    }

    pub fn iterations(task: u32) -> String {
        format!("Iterations{}", task)
    }

    pub fn intervention(task: u32) -> String {
        format!("Intervention{}", task)
    }

    pub fn test_cases(task: u32) -> String {
        format!("TestCases{}", task)
    }

    pub fn accuracy(task: u32) -> String {
        format!("Accuracy{}", task)
    }

    pub fn confidence(task: u32) -> String {
        format!("Confidence{}", task)
    }
}

/// One row of study data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based line of the row in its source file (0 when built in memory)
    line: usize,
    fields: Vec<(String, Option<String>)>,
}

impl Record {
    pub fn new(line: usize, fields: Vec<(String, Option<String>)>) -> Self {
        Self { line, fields }
    }

    /// Build a record from `(column, value)` pairs; empty values become null
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let fields = pairs
            .iter()
            .map(|(k, v)| {
                let value = if v.is_empty() {
                    None
                } else {
                    Some(v.to_string())
                };
                (k.to_string(), value)
            })
            .collect();
        Self { line: 0, fields }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == column)
    }

    /// Value of `column`; `Ok(None)` for a null cell, an error if the column is absent
    pub fn field(&self, column: &str) -> Result<Option<&str>> {
        self.fields
            .iter()
            .find(|(k, _)| k == column)
            .map(|(_, v)| v.as_deref())
            .ok_or_else(|| AnalysisError::MissingField {
                field: column.to_string(),
                record: self.to_string(),
            })
    }

    /// Value of `column`, treating a null cell as an error
    pub fn require(&self, column: &str) -> Result<&str> {
        self.field(column)?
            .ok_or_else(|| AnalysisError::MissingField {
                field: column.to_string(),
                record: self.to_string(),
            })
    }

    /// Value of `column`, with null and absent both mapped to `None`
    pub fn get(&self, column: &str) -> Option<&str> {
        self.field(column).ok().flatten()
    }

    /// Parse a whole-number cell; `Ok(None)` for null
    ///
    /// Spreadsheet exports write integer columns that contain nulls as floats,
    /// so `"4.0"` is accepted as 4.
    pub fn count(&self, column: &str) -> Result<Option<u64>> {
        let Some(raw) = self.field(column)? else {
            return Ok(None);
        };
        let trimmed = raw.trim();
        let invalid = || AnalysisError::InvalidNumber {
            field: column.to_string(),
            value: raw.to_string(),
            record: self.to_string(),
        };
        if let Ok(n) = trimmed.parse::<u64>() {
            return Ok(Some(n));
        }
        let float: f64 = trimmed.parse().map_err(|_| invalid())?;
        if float.is_nan() {
            return Ok(None);
        }
        if float < 0.0 || float.fract() != 0.0 || !float.is_finite() {
            return Err(invalid());
        }
        Ok(Some(float as u64))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row at line {} {{", self.line)?;
        for (i, (k, v)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {}: {}", k, v.as_deref().unwrap_or("nan"))?;
        }
        write!(f, " }}")
    }
}

/// A complete table of records loaded from one source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    /// Build a dataset from in-memory records, taking columns from the first row
    pub fn from_records(records: Vec<Record>) -> Self {
        let columns = records
            .first()
            .map(|r| r.fields.iter().map(|(k, _)| k.clone()).collect())
            .unwrap_or_default();
        Self { columns, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Rows whose `Session` ends with `suffix` (null sessions never match)
    pub fn filter_session_suffix(&self, suffix: &str) -> Dataset {
        let records = self
            .records
            .iter()
            .filter(|r| {
                r.get(columns::SESSION)
                    .is_some_and(|session| session.ends_with(suffix))
            })
            .cloned()
            .collect();
        Dataset {
            columns: self.columns.clone(),
            records,
        }
    }
}
