//! Error types for the aggregation engine
//!
//! Every variant is fatal for the call that produced it: aggregators never
//! return a partial table.

use thiserror::Error;

/// Errors raised while reducing study records into statistics
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// A duration matched neither `m:s` nor `h:m:s`
    #[error("Accepted time formats: m:s or h:m:s (value was: '{value}')")]
    Format { value: String },

    /// A first-rater transcript row has no counterpart from the second rater
    #[error("No '{rater}' IRR step record found corresponding to: {record}")]
    MatchNotFound { rater: String, record: String },

    /// A first-rater transcript row matches several second-rater rows
    #[error("Duplicate step records found for {record}: {}", .matches.join("; "))]
    DuplicateRecord {
        record: String,
        matches: Vec<String>,
    },

    /// The two raters contributed a different number of rows to one session
    #[error(
        "Inconsistent number of records for session {session}: '{first_rater}' has {first_count} but '{second_rater}' has {second_count}"
    )]
    Consistency {
        session: String,
        first_rater: String,
        first_count: usize,
        second_rater: String,
        second_count: usize,
    },

    #[error("Missing field '{field}' in {record}")]
    MissingField { field: String, record: String },

    #[error("Invalid number '{value}' in field '{field}' of {record}")]
    InvalidNumber {
        field: String,
        value: String,
        record: String,
    },

    #[error("Rater '{rater}' is neither '{first_rater}' nor '{second_rater}' in {record}")]
    UnknownRater {
        rater: String,
        first_rater: String,
        second_rater: String,
        record: String,
    },

    #[error("Treatment index {index} has no label (known treatments: {count}) in {record}")]
    TreatmentIndexOutOfRange {
        index: usize,
        count: usize,
        record: String,
    },

    #[error("Cannot append table with headers {found:?} to table with headers {expected:?}")]
    HeaderMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_names_value() {
        let err = AnalysisError::Format {
            value: "1:2:3:4".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Accepted time formats: m:s or h:m:s (value was: '1:2:3:4')"
        );
    }

    #[test]
    fn test_consistency_error_names_both_counts() {
        let err = AnalysisError::Consistency {
            session: "P01J".to_string(),
            first_rater: "Author 3".to_string(),
            first_count: 3,
            second_rater: "Author 2".to_string(),
            second_count: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("session P01J"));
        assert!(msg.contains("'Author 3' has 3"));
        assert!(msg.contains("'Author 2' has 2"));
    }

    #[test]
    fn test_duplicate_error_lists_matches() {
        let err = AnalysisError::DuplicateRecord {
            record: "line 2".to_string(),
            matches: vec!["line 5".to_string(), "line 6".to_string()],
        };
        assert!(err.to_string().ends_with("line 5; line 6"));
    }
}
