// Inter-rater reliability of step coding (Cohen's Kappa per step)
//
// Two coders independently mark, at each recording timestamp of a session,
// which abstract steps are present ("X"). Their judgements are paired by
// (Session, Treatment, Time (Recording)) and every step gets its own 2x2
// contingency table and Kappa.
//
// The computation runs in two passes within one call: pairing plus per-session
// count validation over all rows, then per-step finalization. Any failure in
// either pass aborts the call.

mod contingency;
mod matching;

pub use contingency::Contingency;
pub use matching::RaterPair;

use crate::error::Result;
use crate::record::Dataset;
use crate::steps::StepCode;
use crate::table::ResultTable;

/// Marker a coder writes when a step is present
pub const PRESENT_MARKER: &str = "X";

/// Agreement statistics for one step
#[derive(Debug, Clone, PartialEq)]
pub struct StepAgreement {
    pub step: StepCode,
    pub cells: Contingency,
    pub n: u64,
    pub observed: u64,
    pub expected: f64,
    pub kappa: f64,
}

impl StepAgreement {
    fn from_cells(step: StepCode, cells: Contingency) -> Self {
        Self {
            step,
            n: cells.total(),
            observed: cells.observed(),
            expected: cells.expected(),
            kappa: cells.kappa(),
            cells,
        }
    }
}

/// Per-step agreement for one dataset
#[derive(Debug, Clone, PartialEq)]
pub struct AgreementReport {
    /// Dataset label shown in the leading column
    pub label: String,
    pub steps: Vec<StepAgreement>,
}

/// Compute Cohen's Kappa for every step in [`StepCode::ALL`]
pub fn compute_agreement(dataset: &Dataset, label: &str, raters: &RaterPair) -> Result<AgreementReport> {
    compute_agreement_for_steps(dataset, label, raters, &StepCode::ALL)
}

/// Compute Cohen's Kappa for the given steps
pub fn compute_agreement_for_steps(
    dataset: &Dataset,
    label: &str,
    raters: &RaterPair,
    steps: &[StepCode],
) -> Result<AgreementReport> {
    let pairs = matching::matched_pairs(dataset, raters)?;

    let mut tables = vec![Contingency::default(); steps.len()];
    for (first, second) in &pairs {
        for (cells, step) in tables.iter_mut().zip(steps) {
            let first_present = first.field(step.as_str())? == Some(PRESENT_MARKER);
            let second_present = second.field(step.as_str())? == Some(PRESENT_MARKER);
            cells.record(first_present, second_present);
        }
    }

    Ok(AgreementReport {
        label: label.to_string(),
        steps: steps
            .iter()
            .zip(tables)
            .map(|(&step, cells)| StepAgreement::from_cells(step, cells))
            .collect(),
    })
}

impl AgreementReport {
    pub const HEADERS: [&'static str; 11] =
        ["Dataset", "Step", "N", "O", "E", "K", "", "YY", "YN", "NY", "NN"];

    pub fn step(&self, step: StepCode) -> Option<&StepAgreement> {
        self.steps.iter().find(|s| s.step == step)
    }

    /// One row per step; the last row closes the dataset's group
    pub fn to_table(&self) -> ResultTable {
        let mut table = ResultTable::new(Self::HEADERS);
        for (i, agreement) in self.steps.iter().enumerate() {
            let cells = agreement.cells;
            table.push_row(
                vec![
                    self.label.clone(),
                    agreement.step.to_string(),
                    agreement.n.to_string(),
                    agreement.observed.to_string(),
                    format!("{:.3}", agreement.expected),
                    format!("{:.3}", agreement.kappa),
                    String::new(),
                    cells.yy.to_string(),
                    cells.yn.to_string(),
                    cells.ny.to_string(),
                    cells.nn.to_string(),
                ],
                i + 1 == self.steps.len(),
            );
        }
        table
    }
}

#[cfg(test)]
mod tests;
