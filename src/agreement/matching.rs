// Pairing of independently coded transcript rows
//
// Every first-rater row must have exactly one second-rater row with the same
// (Session, Treatment, Time (Recording)). Per-session row counts of the two
// raters must be equal once all rows are seen.

use crate::error::{AnalysisError, Result};
use crate::record::{columns, Dataset, Record};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The two coders whose judgements are compared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaterPair {
    pub first: String,
    pub second: String,
}

impl RaterPair {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }
}

type MatchKey<'a> = (&'a str, &'a str, &'a str);

fn match_key(record: &Record) -> Result<MatchKey<'_>> {
    Ok((
        record.require(columns::SESSION)?,
        record.require(columns::TREATMENT)?,
        record.require(columns::RECORDING_TIME)?,
    ))
}

#[derive(Debug, Default, Clone, Copy)]
struct SessionCounts {
    first: usize,
    second: usize,
}

/// Pair each first-rater row with its unique second-rater counterpart
///
/// Pairs come back in the first rater's row order.
pub(crate) fn matched_pairs<'a>(
    dataset: &'a Dataset,
    raters: &RaterPair,
) -> Result<Vec<(&'a Record, &'a Record)>> {
    let mut counterparts: HashMap<MatchKey<'a>, Vec<&'a Record>> = HashMap::new();
    for record in dataset.iter() {
        if record.require(columns::RATER)? == raters.second {
            counterparts
                .entry(match_key(record)?)
                .or_default()
                .push(record);
        }
    }

    let mut session_order: Vec<&'a str> = Vec::new();
    let mut session_counts: HashMap<&'a str, SessionCounts> = HashMap::new();
    let mut pairs = Vec::new();

    for record in dataset.iter() {
        let session = record.require(columns::SESSION)?;
        let rater = record.require(columns::RATER)?;

        let counts = session_counts.entry(session).or_insert_with(|| {
            session_order.push(session);
            SessionCounts::default()
        });
        if rater == raters.first {
            counts.first += 1;
        } else if rater == raters.second {
            counts.second += 1;
            continue;
        } else {
            return Err(AnalysisError::UnknownRater {
                rater: rater.to_string(),
                first_rater: raters.first.clone(),
                second_rater: raters.second.clone(),
                record: record.to_string(),
            });
        }

        let key = match_key(record)?;
        match counterparts.get(&key).map(Vec::as_slice) {
            None | Some([]) => {
                return Err(AnalysisError::MatchNotFound {
                    rater: raters.second.clone(),
                    record: record.to_string(),
                });
            }
            Some([counterpart]) => pairs.push((record, *counterpart)),
            Some(many) => {
                return Err(AnalysisError::DuplicateRecord {
                    record: record.to_string(),
                    matches: many.iter().map(|r| r.to_string()).collect(),
                });
            }
        }
    }

    for session in session_order {
        let counts = session_counts[session];
        if counts.first != counts.second {
            return Err(AnalysisError::Consistency {
                session: session.to_string(),
                first_rater: raters.first.clone(),
                first_count: counts.first,
                second_rater: raters.second.clone(),
                second_count: counts.second,
            });
        }
    }

    tracing::debug!(
        pairs = pairs.len(),
        sessions = session_counts.len(),
        "matched rater judgements"
    );

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(session: &str, rater: &str, time: &str) -> Record {
        Record::from_pairs(&[
            ("Session", session),
            ("Rater", rater),
            ("Treatment", "Jest"),
            ("Time (Recording)", time),
        ])
    }

    fn raters() -> RaterPair {
        RaterPair::new("Author 3", "Author 2")
    }

    #[test]
    fn test_pairs_in_first_rater_order() {
        let dataset = Dataset::from_records(vec![
            row("P01J", "Author 2", "0:30"),
            row("P01J", "Author 3", "0:00"),
            row("P01J", "Author 3", "0:30"),
            row("P01J", "Author 2", "0:00"),
        ]);
        let pairs = matched_pairs(&dataset, &raters()).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0.get("Time (Recording)"), Some("0:00"));
        assert_eq!(pairs[0].1.get("Rater"), Some("Author 2"));
        assert_eq!(pairs[1].1.get("Time (Recording)"), Some("0:30"));
    }

    #[test]
    fn test_unknown_rater() {
        let dataset = Dataset::from_records(vec![row("P01J", "Author 9", "0:00")]);
        assert!(matches!(
            matched_pairs(&dataset, &raters()),
            Err(AnalysisError::UnknownRater { .. })
        ));
    }

    #[test]
    fn test_match_must_share_treatment() {
        let other_treatment = Record::from_pairs(&[
            ("Session", "P01J"),
            ("Rater", "Author 2"),
            ("Treatment", "NaNofuzz"),
            ("Time (Recording)", "0:00"),
        ]);
        let dataset = Dataset::from_records(vec![row("P01J", "Author 3", "0:00"), other_treatment]);
        assert!(matches!(
            matched_pairs(&dataset, &raters()),
            Err(AnalysisError::MatchNotFound { .. })
        ));
    }

    #[test]
    fn test_second_rater_only_session_is_inconsistent() {
        let dataset = Dataset::from_records(vec![row("P02J", "Author 2", "0:00")]);
        assert!(matches!(
            matched_pairs(&dataset, &raters()),
            Err(AnalysisError::Consistency {
                first_count: 0,
                second_count: 1,
                ..
            })
        ));
    }
}
