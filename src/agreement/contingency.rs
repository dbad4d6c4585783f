// Cohen's Kappa from a 2x2 presence/absence contingency table
//
//                 second: present   second: absent
// first: present        YY               YN
// first: absent         NY               NN
//
// All quantities are kept as counts, so Kappa = (O - E) / (N - E) is
// dimensionless:
//   N = YY + YN + NY + NN
//   O = YY + NN
//   E = (YY+YN)(YY+NY)/N + (NY+NN)(YN+NN)/N

use serde::{Deserialize, Serialize};

/// Contingency counts for one step across all matched observation pairs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contingency {
    /// Both raters marked the step present
    pub yy: u64,
    /// Only the first rater marked it present
    pub yn: u64,
    /// Only the second rater marked it present
    pub ny: u64,
    /// Both raters marked it absent
    pub nn: u64,
}

impl Contingency {
    /// Classify one matched pair of judgements
    pub fn record(&mut self, first_present: bool, second_present: bool) {
        match (first_present, second_present) {
            (true, true) => self.yy += 1,
            (true, false) => self.yn += 1,
            (false, true) => self.ny += 1,
            (false, false) => self.nn += 1,
        }
    }

    /// N: number of matched pairs
    pub fn total(&self) -> u64 {
        self.yy + self.yn + self.ny + self.nn
    }

    /// O: pairs on which the raters agree
    pub fn observed(&self) -> u64 {
        self.yy + self.nn
    }

    /// E: agreements expected if both raters coded independently at their own rates
    ///
    /// Zero when there are no pairs.
    pub fn expected(&self) -> f64 {
        let n = self.total();
        if n == 0 {
            return 0.0;
        }
        let n = n as f64;
        let present = ((self.yy + self.yn) * (self.yy + self.ny)) as f64 / n;
        let absent = ((self.ny + self.nn) * (self.yn + self.nn)) as f64 / n;
        present + absent
    }

    /// Cohen's Kappa; 1 when every pair falls into a single category (N == E)
    pub fn kappa(&self) -> f64 {
        let n = self.total() as f64;
        let expected = self.expected();
        if n == expected {
            return 1.0;
        }
        (self.observed() as f64 - expected) / (n - expected)
    }
}
