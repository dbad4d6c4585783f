// Tests for inter-rater reliability over realistic coded transcripts
//
// Fixtures mirror the fixed-interval step transcripts: one row per rater per
// 30-second recording mark, with "X" for each step observed.

use super::*;
use crate::error::AnalysisError;
use crate::record::Record;

const FIRST: &str = "Author 3";
const SECOND: &str = "Author 2";

fn raters() -> RaterPair {
    RaterPair::new(FIRST, SECOND)
}

fn transcript(session: &str, rater: &str, time: &str, present: &[StepCode]) -> Record {
    let marks: Vec<(&str, &str)> = StepCode::ALL
        .iter()
        .map(|step| {
            let mark = if present.contains(step) { "X" } else { "" };
            (step.as_str(), mark)
        })
        .collect();
    let mut pairs = vec![
        ("Session", session),
        ("Rater", rater),
        ("Treatment", "Jest"),
        ("Time (Recording)", time),
    ];
    pairs.extend(marks);
    Record::from_pairs(&pairs)
}

/// Both raters code the same steps at every mark
fn agreeing_dataset() -> Dataset {
    let marks = [
        ("P01J", "0:00", vec![StepCode::S1, StepCode::S2]),
        ("P01J", "0:30", vec![StepCode::S3]),
        ("P02J", "0:00", vec![StepCode::S1]),
        ("P02J", "0:30", vec![StepCode::S3, StepCode::S7]),
    ];
    let mut records = Vec::new();
    for (session, time, steps) in &marks {
        records.push(transcript(session, FIRST, time, steps));
    }
    for (session, time, steps) in marks.iter().rev() {
        records.push(transcript(session, SECOND, time, steps));
    }
    Dataset::from_records(records)
}

#[test]
fn test_full_agreement_yields_kappa_one() {
    let report = compute_agreement(&agreeing_dataset(), "Jest, NaNo", &raters()).unwrap();

    assert_eq!(report.steps.len(), 7);
    for agreement in &report.steps {
        assert_eq!(agreement.n, 4);
        assert_eq!(agreement.observed, 4);
        assert_eq!(agreement.cells.yn, 0);
        assert_eq!(agreement.cells.ny, 0);
        assert_eq!(agreement.kappa, 1.0);
    }

    let table = report.to_table();
    for row in &table.rows {
        assert_eq!(row.cells[5], "1.000");
    }
}

#[test]
fn test_never_coded_step_uses_single_category_shortcut() {
    let report = compute_agreement(&agreeing_dataset(), "Jest, NaNo", &raters()).unwrap();
    let s4 = report.step(StepCode::S4).unwrap();
    assert_eq!(s4.cells.nn, 4);
    assert_eq!(s4.expected, 4.0);
    assert_eq!(s4.kappa, 1.0);
}

#[test]
fn test_partial_agreement_row() {
    use StepCode::S2;
    let dataset = Dataset::from_records(vec![
        transcript("P01J", FIRST, "0:00", &[S2]),
        transcript("P01J", FIRST, "0:30", &[S2]),
        transcript("P01J", FIRST, "1:00", &[]),
        transcript("P01J", FIRST, "1:30", &[]),
        transcript("P01J", SECOND, "0:00", &[S2]),
        transcript("P01J", SECOND, "0:30", &[]),
        transcript("P01J", SECOND, "1:00", &[]),
        transcript("P01J", SECOND, "1:30", &[]),
    ]);
    let report = compute_agreement(&dataset, "Jest, NaNo", &raters()).unwrap();
    let table = report.to_table();

    // YY=1 YN=1 NY=0 NN=2: E = 2*1/4 + 2*3/4 = 2, K = (3-2)/(4-2)
    assert_eq!(
        table.rows[1].cells,
        vec!["Jest, NaNo", "S2", "4", "3", "2.000", "0.500", "", "1", "1", "0", "2"]
    );
}

#[test]
fn test_unmatched_first_rater_row() {
    let mut records = agreeing_dataset().records;
    records.push(transcript("P02J", FIRST, "1:00", &[]));
    let err = compute_agreement(&Dataset::from_records(records), "x", &raters()).unwrap_err();

    match err {
        AnalysisError::MatchNotFound { rater, record } => {
            assert_eq!(rater, SECOND);
            assert!(record.contains("1:00"));
        }
        other => panic!("Expected MatchNotFound, got {:?}", other),
    }
}

#[test]
fn test_duplicate_counterpart() {
    let mut records = agreeing_dataset().records;
    records.push(transcript("P01J", SECOND, "0:30", &[StepCode::S3]));
    let err = compute_agreement(&Dataset::from_records(records), "x", &raters()).unwrap_err();

    match err {
        AnalysisError::DuplicateRecord { matches, .. } => assert_eq!(matches.len(), 2),
        other => panic!("Expected DuplicateRecord, got {:?}", other),
    }
}

#[test]
fn test_three_first_rater_rows_against_two() {
    // Every first-rater row finds exactly one counterpart, but the first
    // rater coded one mark twice.
    let dataset = Dataset::from_records(vec![
        transcript("P03J", FIRST, "0:00", &[]),
        transcript("P03J", FIRST, "0:00", &[]),
        transcript("P03J", FIRST, "0:30", &[]),
        transcript("P03J", SECOND, "0:00", &[]),
        transcript("P03J", SECOND, "0:30", &[]),
    ]);
    let err = compute_agreement(&dataset, "x", &raters()).unwrap_err();

    assert_eq!(
        err,
        AnalysisError::Consistency {
            session: "P03J".to_string(),
            first_rater: FIRST.to_string(),
            first_count: 3,
            second_rater: SECOND.to_string(),
            second_count: 2,
        }
    );
}

#[test]
fn test_tables_from_two_datasets_append() {
    let mut table = compute_agreement(&agreeing_dataset(), "Jest, NaNo", &raters())
        .unwrap()
        .to_table();
    let second = compute_agreement(&agreeing_dataset(), "Hypothesis", &raters())
        .unwrap()
        .to_table();
    table.append(second).unwrap();

    assert_eq!(table.len(), 14);
    assert_eq!(table.rows[7].cells[0], "Hypothesis");
    assert_eq!(table.divider_positions(), vec![6, 13]);
}

#[test]
fn test_empty_transcript_has_no_pairs() {
    let report = compute_agreement(&Dataset::default(), "empty", &raters()).unwrap();
    assert!(report.steps.iter().all(|s| s.n == 0 && s.kappa == 1.0));
}
