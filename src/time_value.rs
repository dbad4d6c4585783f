//! Duration parsing for coded timestamps and elapsed times
//!
//! Durations are written `m:s` or `h:m:s`. A null cell means no time was
//! recorded and counts as zero seconds.

use crate::error::{AnalysisError, Result};

/// Parse an optional duration cell into whole seconds
///
/// `None` is the CSV-null sentinel and maps to 0.
///
/// # Example
/// ```
/// use stepwise::time_value::parse_duration;
///
/// assert_eq!(parse_duration(Some("1:30")).unwrap(), 90);
/// assert_eq!(parse_duration(Some("1:02:03")).unwrap(), 3723);
/// assert_eq!(parse_duration(None).unwrap(), 0);
/// assert!(parse_duration(Some("1:2:3:4")).is_err());
/// ```
pub fn parse_duration(value: Option<&str>) -> Result<u64> {
    match value {
        None => Ok(0),
        Some(text) => parse_duration_str(text),
    }
}

/// Parse a non-null `m:s` or `h:m:s` duration into whole seconds
pub fn parse_duration_str(text: &str) -> Result<u64> {
    let format_error = || AnalysisError::Format {
        value: text.to_string(),
    };

    let separators = text.matches(':').count();
    if separators != 1 && separators != 2 {
        return Err(format_error());
    }

    let parts = text
        .split(':')
        .map(|part| part.trim().parse::<u64>().map_err(|_| format_error()))
        .collect::<Result<Vec<u64>>>()?;

    let seconds = match parts.as_slice() {
        [m, s] => m.checked_mul(60).and_then(|m| m.checked_add(*s)),
        [h, m, s] => h
            .checked_mul(3600)
            .and_then(|h| m.checked_mul(60).and_then(|m| h.checked_add(m)))
            .and_then(|hm| hm.checked_add(*s)),
        _ => None,
    };

    seconds.ok_or_else(format_error)
}
