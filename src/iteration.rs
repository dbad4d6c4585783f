//! Loop-iteration efficiency
//!
//! For every completed task, the mean wall-clock seconds the participant spent
//! per refinement iteration, grouped by treatment. The per-treatment mean is
//! total seconds over total iterations, which weights long sessions by their
//! iteration count; it is NOT the mean of the per-session ratios.

use crate::error::{AnalysisError, Result};
use crate::record::{columns, Dataset, Record};
use crate::table::ResultTable;
use crate::time_value::parse_duration;

/// Running sums for one treatment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EfficiencyTotals {
    pub sessions: u64,
    pub seconds: u64,
    pub iterations: u64,
}

impl EfficiencyTotals {
    /// Fold one session into the totals
    pub fn add(self, seconds: u64, iterations: u64) -> Self {
        Self {
            sessions: self.sessions + 1,
            seconds: self.seconds + seconds,
            iterations: self.iterations + iterations,
        }
    }

    pub fn mean_seconds(&self) -> Option<f64> {
        (self.sessions > 0).then(|| self.seconds as f64 / self.sessions as f64)
    }

    pub fn mean_iterations(&self) -> Option<f64> {
        (self.sessions > 0).then(|| self.iterations as f64 / self.sessions as f64)
    }

    /// Total seconds over total iterations
    pub fn seconds_per_iteration(&self) -> Option<f64> {
        (self.iterations > 0).then(|| self.seconds as f64 / self.iterations as f64)
    }
}

/// One completed task of one participant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEfficiency {
    pub participant: String,
    pub task: u32,
    pub elapsed_seconds: u64,
    pub iterations: u64,
}

impl TaskEfficiency {
    pub fn label(&self) -> String {
        format!("{} Task {}", self.participant, self.task)
    }

    /// `None` when the task recorded zero iterations
    pub fn seconds_per_iteration(&self) -> Option<f64> {
        (self.iterations > 0).then(|| self.elapsed_seconds as f64 / self.iterations as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreatmentEfficiency {
    pub treatment: String,
    pub sessions: Vec<TaskEfficiency>,
    pub totals: EfficiencyTotals,
}

/// Efficiency rows for each treatment, in treatment-index order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationReport {
    pub treatments: Vec<TreatmentEfficiency>,
}

/// Compute per-session and per-treatment efficiency from participant rows
///
/// Each row carries `ID`, `Elapsed{n}`, `Iterations{n}` and, when there is
/// more than one treatment, `Intervention{n}` (a 0-based index into
/// `treatments`). Tasks with a null iteration count were not completed and
/// are skipped.
pub fn compute_iteration_efficiency(
    dataset: &Dataset,
    tasks: &[u32],
    treatments: &[String],
) -> Result<IterationReport> {
    let mut report = IterationReport {
        treatments: Vec::with_capacity(treatments.len()),
    };

    for (index, treatment) in treatments.iter().enumerate() {
        let (sessions, totals) = collect_treatment(dataset, tasks, treatments.len(), index)?;
        tracing::debug!(
            treatment = treatment.as_str(),
            sessions = totals.sessions,
            "collected iteration efficiency"
        );
        report.treatments.push(TreatmentEfficiency {
            treatment: treatment.clone(),
            sessions,
            totals,
        });
    }

    Ok(report)
}

fn collect_treatment(
    dataset: &Dataset,
    tasks: &[u32],
    treatment_count: usize,
    index: usize,
) -> Result<(Vec<TaskEfficiency>, EfficiencyTotals)> {
    let mut sessions = Vec::new();
    let mut totals = EfficiencyTotals::default();

    for record in dataset.iter() {
        for &task in tasks {
            let Some(iterations) = record.count(&columns::iterations(task))? else {
                continue;
            };
            let Some(assigned) = assigned_treatment(record, task, treatment_count)? else {
                continue;
            };
            if assigned != index {
                continue;
            }

            let elapsed_seconds = parse_duration(record.field(&columns::elapsed(task))?)?;
            totals = totals.add(elapsed_seconds, iterations);
            sessions.push(TaskEfficiency {
                participant: record.require(columns::PARTICIPANT)?.to_string(),
                task,
                elapsed_seconds,
                iterations,
            });
        }
    }

    Ok((sessions, totals))
}

/// Treatment index a task was performed under; `None` if unassigned
fn assigned_treatment(record: &Record, task: u32, treatment_count: usize) -> Result<Option<usize>> {
    if treatment_count <= 1 {
        return Ok(Some(0));
    }
    let Some(assigned) = record.count(&columns::intervention(task))? else {
        return Ok(None);
    };
    let assigned = assigned as usize;
    if assigned >= treatment_count {
        return Err(AnalysisError::TreatmentIndexOutOfRange {
            index: assigned,
            count: treatment_count,
            record: record.to_string(),
        });
    }
    Ok(Some(assigned))
}

impl IterationReport {
    pub const HEADERS: [&'static str; 5] = [
        "Treatment",
        "Session",
        "Session Length (seconds)",
        "Loop Iterations",
        "Mean Seconds per Iteration",
    ];

    /// Session rows per treatment, each treatment closed by a `Mean` row
    pub fn to_table(&self) -> ResultTable {
        let mut table = ResultTable::new(Self::HEADERS);

        for group in &self.treatments {
            for session in &group.sessions {
                table.push_row(
                    vec![
                        group.treatment.clone(),
                        session.label(),
                        session.elapsed_seconds.to_string(),
                        session.iterations.to_string(),
                        rounded(session.seconds_per_iteration(), 0),
                    ],
                    false,
                );
            }

            if group.totals.sessions > 0 {
                table.mark_last_divider();
                table.push_row(
                    vec![
                        String::new(),
                        "Mean".to_string(),
                        rounded(group.totals.mean_seconds(), 0),
                        rounded(group.totals.mean_iterations(), 1),
                        rounded(group.totals.seconds_per_iteration(), 0),
                    ],
                    true,
                );
            }
        }

        table
    }
}

fn rounded(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{:.*}", decimals, v))
        .unwrap_or_else(|| crate::format::EMPTY_CELL.to_string())
}
