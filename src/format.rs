//! Display formatting for aggregated statistics
//!
//! Aggregators return numbers; these helpers turn them into table cells.

/// Placeholder for an empty count or an undefined ratio
pub const EMPTY_CELL: &str = "--";

/// Format whole seconds as `H:MM:SS`, with a day prefix past 24 hours
///
/// # Example
/// ```
/// use stepwise::format::format_hms;
///
/// assert_eq!(format_hms(3723), "1:02:03");
/// assert_eq!(format_hms(59), "0:00:59");
/// ```
pub fn format_hms(seconds: u64) -> String {
    let days = seconds / 86_400;
    let rem = seconds % 86_400;
    let hms = format!("{}:{:02}:{:02}", rem / 3600, (rem % 3600) / 60, rem % 60);
    match days {
        0 => hms,
        1 => format!("1 day, {}", hms),
        n => format!("{} days, {}", n, hms),
    }
}

/// Format a ratio (0.5 = half) as a percentage with `decimals` places
pub fn format_percent(ratio: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, ratio * 100.0)
}

/// Format an optional ratio, using [`EMPTY_CELL`] when it is undefined
pub fn format_optional_percent(ratio: Option<f64>, decimals: usize) -> String {
    ratio
        .map(|r| format_percent(r, decimals))
        .unwrap_or_else(|| EMPTY_CELL.to_string())
}

/// `"--"` for zero, otherwise the count itself
pub fn count_or_empty(count: u64) -> String {
    if count == 0 {
        EMPTY_CELL.to_string()
    } else {
        count.to_string()
    }
}

/// Divide, returning `None` when the denominator is zero
pub fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}
