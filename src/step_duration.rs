//! Time spent per abstract step
//!
//! Sums each step's coded duration per (treatment, session) and reports each
//! step's share of the session, then of the whole treatment.

use crate::error::Result;
use crate::format::{format_hms, format_optional_percent, ratio};
use crate::record::{columns, Dataset};
use crate::steps::StepCode;
use crate::table::ResultTable;
use crate::time_value::parse_duration;
use std::collections::HashMap;

/// Accumulated step times of one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDurations {
    pub session: String,
    /// Seconds per step, in vocabulary order
    pub step_seconds: Vec<u64>,
    pub total_seconds: u64,
}

impl SessionDurations {
    fn new(session: &str, steps: usize) -> Self {
        Self {
            session: session.to_string(),
            step_seconds: vec![0; steps],
            total_seconds: 0,
        }
    }

    /// First three characters of the session id plus the task number (its last character)
    pub fn label(&self) -> String {
        let prefix: String = self.session.chars().take(3).collect();
        let task = self.session.chars().last().map(String::from).unwrap_or_default();
        format!("{} Task {}", prefix, task)
    }

    /// Share of the session's own time spent in step `index`
    pub fn share(&self, index: usize) -> Option<f64> {
        ratio(self.step_seconds[index], self.total_seconds)
    }
}

/// Sessions of one treatment, in first-seen order, with treatment-wide sums
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreatmentDurations {
    pub treatment: String,
    pub sessions: Vec<SessionDurations>,
    pub step_totals: Vec<u64>,
    pub grand_total: u64,
}

impl TreatmentDurations {
    fn from_sessions(treatment: &str, steps: usize, sessions: Vec<SessionDurations>) -> Self {
        let (step_totals, grand_total) = sessions.iter().fold(
            (vec![0u64; steps], 0u64),
            |(mut totals, grand), session| {
                for (total, seconds) in totals.iter_mut().zip(&session.step_seconds) {
                    *total += seconds;
                }
                (totals, grand + session.total_seconds)
            },
        );
        Self {
            treatment: treatment.to_string(),
            sessions,
            step_totals,
            grand_total,
        }
    }

    /// Share of the treatment's total time spent in step `index`
    pub fn share(&self, index: usize) -> Option<f64> {
        ratio(self.step_totals[index], self.grand_total)
    }
}

/// Step durations for every requested treatment, in caller order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDurationReport {
    pub steps: Vec<StepCode>,
    pub treatments: Vec<TreatmentDurations>,
}

/// Aggregate `Treatment, Session, S*` duration rows
///
/// Rows of treatments not listed in `treatments` are ignored. A listed
/// treatment without rows yields an empty group.
pub fn aggregate_step_durations(
    dataset: &Dataset,
    treatments: &[String],
    steps: &[StepCode],
) -> Result<StepDurationReport> {
    let mut groups: HashMap<String, Vec<SessionDurations>> = HashMap::new();
    let mut session_index: HashMap<(String, String), usize> = HashMap::new();

    for record in dataset.iter() {
        let treatment = record.require(columns::TREATMENT)?;
        let session = record.require(columns::SESSION)?;

        let sessions = groups.entry(treatment.to_string()).or_default();
        let index = *session_index
            .entry((treatment.to_string(), session.to_string()))
            .or_insert_with(|| {
                sessions.push(SessionDurations::new(session, steps.len()));
                sessions.len() - 1
            });
        let entry = &mut sessions[index];

        for (i, step) in steps.iter().enumerate() {
            let seconds = parse_duration(record.field(step.as_str())?)?;
            entry.step_seconds[i] += seconds;
            entry.total_seconds += seconds;
        }
    }

    let report = StepDurationReport {
        steps: steps.to_vec(),
        treatments: treatments
            .iter()
            .map(|treatment| {
                let sessions = groups.remove(treatment).unwrap_or_default();
                TreatmentDurations::from_sessions(treatment, steps.len(), sessions)
            })
            .collect(),
    };

    if !groups.is_empty() {
        tracing::debug!(
            ignored = ?groups.keys().collect::<Vec<_>>(),
            "step durations for unlisted treatments ignored"
        );
    }

    Ok(report)
}

impl StepDurationReport {
    pub fn headers(steps: &[StepCode]) -> Vec<String> {
        let mut headers = vec!["Treatment".to_string(), "Session".to_string()];
        headers.extend(steps.iter().map(|s| s.to_string()));
        headers
    }

    /// One row per session, then a `Σ` row per treatment that had sessions
    pub fn to_table(&self) -> ResultTable {
        let mut table = ResultTable::new(Self::headers(&self.steps));

        for group in &self.treatments {
            if group.sessions.is_empty() {
                continue;
            }

            for session in &group.sessions {
                let mut cells = vec![group.treatment.clone(), session.label()];
                for (i, &seconds) in session.step_seconds.iter().enumerate() {
                    cells.push(duration_cell(seconds, session.share(i)));
                }
                table.push_row(cells, false);
            }

            table.mark_last_divider();
            let mut cells = vec![String::new(), "Σ".to_string()];
            for (i, &seconds) in group.step_totals.iter().enumerate() {
                cells.push(duration_cell(seconds, group.share(i)));
            }
            table.push_row(cells, true);
        }

        table
    }
}

fn duration_cell(seconds: u64, share: Option<f64>) -> String {
    format!("{} ({})", format_hms(seconds), format_optional_percent(share, 0))
}
