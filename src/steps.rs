//! Abstract step vocabulary used to code observed workflows

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One abstract stage of the observed workflow
///
/// `S1` is only coded for presence/absence; `S2`..`S7` also take part in
/// transition and duration analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StepCode {
    S1,
    S2,
    S3,
    S4,
    S5,
    S6,
    S7,
}

impl StepCode {
    /// Every step, in order (inter-rater reliability vocabulary)
    pub const ALL: [StepCode; 7] = [
        StepCode::S1,
        StepCode::S2,
        StepCode::S3,
        StepCode::S4,
        StepCode::S5,
        StepCode::S6,
        StepCode::S7,
    ];

    /// Steps that take part in transition and duration analysis
    pub const TRANSITION: [StepCode; 6] = [
        StepCode::S2,
        StepCode::S3,
        StepCode::S4,
        StepCode::S5,
        StepCode::S6,
        StepCode::S7,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepCode::S1 => "S1",
            StepCode::S2 => "S2",
            StepCode::S3 => "S3",
            StepCode::S4 => "S4",
            StepCode::S5 => "S5",
            StepCode::S6 => "S6",
            StepCode::S7 => "S7",
        }
    }
}

impl fmt::Display for StepCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StepCode::ALL
            .iter()
            .copied()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| format!("Unknown step code: {}", s))
    }
}
