//! Tests for the missingness-pattern MCAR test.

use polars::prelude::*;
use survey_stats::{McarVerdict, test_missing_mcar};

fn column(name: &str, present: &[bool]) -> Column {
    let values: Vec<Option<&str>> = present.iter().map(|&p| p.then_some("x")).collect();
    Series::new(name.into(), values).into()
}

#[test]
fn test_unbalanced_patterns() {
    // Patterns: 6 complete rows, 3 missing "b", 1 missing both.
    let a = [true, true, true, true, true, true, true, true, true, false];
    let b = [true, true, true, true, true, true, false, false, false, false];
    let df = DataFrame::new(vec![column("a", &a), column("b", &b)]).unwrap();

    let report = test_missing_mcar(&df, 0.01).unwrap().unwrap();

    assert_eq!(report.patterns.len(), 3);
    assert_eq!(report.dof, 2);
    assert!((report.statistic - 3.8).abs() < 1e-12);
    assert!((report.p_value - 0.149_568_619_222_635_06).abs() < 1e-12);
    assert!((report.expected - 10.0 / 3.0).abs() < 1e-12);
    assert_eq!(report.verdict, McarVerdict::Mcar);
}

#[test]
fn test_rejects_at_loose_alpha() {
    let a = [true, true, true, true, true, true, true, true, true, false];
    let b = [true, true, true, true, true, true, false, false, false, false];
    let df = DataFrame::new(vec![column("a", &a), column("b", &b)]).unwrap();

    let report = test_missing_mcar(&df, 0.2).unwrap().unwrap();

    assert_eq!(report.verdict, McarVerdict::NotMcar);
}

#[test]
fn test_patterns_sorted_by_mask() {
    let df = DataFrame::new(vec![column("a", &[false, true, true])]).unwrap();

    let report = test_missing_mcar(&df, 0.01).unwrap().unwrap();

    let masks: Vec<&str> = report.patterns.iter().map(|p| p.mask.as_str()).collect();
    assert_eq!(masks, vec!["0", "1"]);
    assert_eq!(report.patterns[0].rows, 2);
}
