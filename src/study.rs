//! Study runner
//!
//! Loads each configured dataset's files and produces the titled report
//! tables in study order: inter-rater reliability, step transitions, loop
//! iterations, step durations, then raw task data per dataset.

use crate::agreement::compute_agreement;
use crate::cli::ReportKind;
use crate::config::{DatasetConfig, StudyConfig};
use crate::csv_input::read_csv;
use crate::iteration::compute_iteration_efficiency;
use crate::record::Dataset;
use crate::step_duration::aggregate_step_durations;
use crate::steps::StepCode;
use crate::table::{ResultTable, TitledTable};
use crate::task_table::build_task_table;
use crate::transition::TransitionMatrix;
use anyhow::{Context, Result};
use std::path::Path;

pub const AGREEMENT_TITLE: &str = "(R5) Inter-rater Reliability of Coding, by dataset and step";
pub const TRANSITIONS_TITLE: &str =
    "(R6) Abstract Step Transitions by treatment, current, next step";
pub const ITERATIONS_TITLE: &str = "(R7) Loop Iterations by treatment, session";
pub const DURATIONS_TITLE: &str =
    "(R8) Step Summary by treatment, session, step (times in hours:minutes:seconds)";

/// Report order for [`ReportKind::All`]
const ALL_REPORTS: [ReportKind; 5] = [
    ReportKind::Agreement,
    ReportKind::Transitions,
    ReportKind::Iterations,
    ReportKind::Durations,
    ReportKind::Tasks,
];

/// The datasets selected for one run
pub struct Study<'a> {
    config: &'a StudyConfig,
    datasets: Vec<&'a DatasetConfig>,
}

impl<'a> Study<'a> {
    /// Select every dataset, or only the one named by `only`
    pub fn new(config: &'a StudyConfig, only: Option<&str>) -> Result<Self> {
        let datasets = match only {
            Some(name) => match config.dataset(name) {
                Some(dataset) => vec![dataset],
                None => anyhow::bail!(
                    "Unknown dataset '{}' (configured: {})",
                    name,
                    config
                        .datasets
                        .iter()
                        .map(|d| d.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            },
            None => config.datasets.iter().collect(),
        };
        Ok(Self { config, datasets })
    }

    /// Produce the tables for `kind`; reports with no contributing dataset are omitted
    pub fn run(&self, kind: ReportKind) -> Result<Vec<TitledTable>> {
        let kinds: &[ReportKind] = match kind {
            ReportKind::All => &ALL_REPORTS,
            ref single => std::slice::from_ref(single),
        };

        let mut tables = Vec::new();
        for &kind in kinds {
            match kind {
                ReportKind::Agreement => tables.extend(self.agreement()?),
                ReportKind::Transitions => tables.extend(self.transitions()?),
                ReportKind::Iterations => tables.extend(self.iterations()?),
                ReportKind::Durations => tables.extend(self.durations()?),
                ReportKind::Tasks => tables.extend(self.tasks()?),
                ReportKind::All => {}
            }
        }
        Ok(tables)
    }

    fn load(&self, dataset: &DatasetConfig, file: &Path) -> Result<Dataset> {
        let path = self.config.resolve(dataset, file);
        tracing::info!(dataset = dataset.name.as_str(), path = %path.display(), "loading");
        read_csv(&path)
    }

    /// Cohen's Kappa per step for every dataset with coded fixed-interval transcripts
    pub fn agreement(&self) -> Result<Option<TitledTable>> {
        let mut parts = Vec::new();
        for dataset in &self.datasets {
            let (Some(file), Some(raters)) = (&dataset.fixed_transcripts, &dataset.raters) else {
                continue;
            };
            let data = self.load(dataset, file)?;
            let report = compute_agreement(&data, dataset.irr_label(), raters).with_context(
                || format!("Inter-rater reliability failed for dataset '{}'", dataset.name),
            )?;
            parts.push(report.to_table());
        }
        titled(AGREEMENT_TITLE, parts)
    }

    /// Transition matrices for every transition group of every dataset
    pub fn transitions(&self) -> Result<Option<TitledTable>> {
        let mut parts = Vec::new();
        for dataset in &self.datasets {
            let Some(file) = &dataset.transitions else {
                continue;
            };
            let data = self.load(dataset, file)?;
            for group in dataset.effective_transition_groups() {
                let matrix = match &group.session_suffix {
                    Some(suffix) => {
                        TransitionMatrix::build(&data.filter_session_suffix(suffix), &StepCode::TRANSITION)
                    }
                    None => TransitionMatrix::build(&data, &StepCode::TRANSITION),
                }
                .with_context(|| {
                    format!(
                        "Step transitions failed for dataset '{}', treatment '{}'",
                        dataset.name, group.treatment
                    )
                })?;
                parts.push(matrix.to_table(&group.treatment));
            }
        }
        titled(TRANSITIONS_TITLE, parts)
    }

    /// Iteration efficiency per treatment for every dataset with participant data
    pub fn iterations(&self) -> Result<Option<TitledTable>> {
        let mut parts = Vec::new();
        for dataset in &self.datasets {
            let Some(file) = &dataset.participants else {
                continue;
            };
            let data = self.load(dataset, file)?;
            let report = compute_iteration_efficiency(&data, &dataset.tasks, &dataset.treatments)
                .with_context(|| {
                    format!("Loop iterations failed for dataset '{}'", dataset.name)
                })?;
            parts.push(report.to_table());
        }
        titled(ITERATIONS_TITLE, parts)
    }

    /// Time per step for every dataset with variable-interval transcripts
    pub fn durations(&self) -> Result<Option<TitledTable>> {
        let mut parts = Vec::new();
        for dataset in &self.datasets {
            let Some(file) = &dataset.variable_transcripts else {
                continue;
            };
            let data = self.load(dataset, file)?;
            let report =
                aggregate_step_durations(&data, &dataset.treatments, &StepCode::TRANSITION)
                    .with_context(|| {
                        format!("Step durations failed for dataset '{}'", dataset.name)
                    })?;
            parts.push(report.to_table());
        }
        titled(DURATIONS_TITLE, parts)
    }

    /// One raw task-data table per dataset
    pub fn tasks(&self) -> Result<Vec<TitledTable>> {
        let mut tables = Vec::new();
        for dataset in &self.datasets {
            let Some(file) = dataset.participants.as_ref().filter(|_| dataset.task_table) else {
                continue;
            };
            let data = self.load(dataset, file)?;
            let table = build_task_table(&data, &dataset.tasks)
                .with_context(|| format!("Task data failed for dataset '{}'", dataset.name))?;
            tables.push(TitledTable {
                title: format!("Task Data for {}", dataset.name),
                table,
            });
        }
        Ok(tables)
    }
}

fn titled(title: &str, parts: Vec<ResultTable>) -> Result<Option<TitledTable>> {
    let Some(table) = ResultTable::concat(parts)? else {
        tracing::debug!(title, "no dataset contributes to report");
        return Ok(None);
    };
    Ok(Some(TitledTable {
        title: title.to_string(),
        table,
    }))
}
