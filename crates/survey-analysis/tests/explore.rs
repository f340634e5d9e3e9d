//! Tests for question-versus-target comparisons.

use polars::prelude::*;
use survey_analysis::{Comparison, PlotRequest, explore_relationship};
use survey_stats::TestKind;

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}

fn target(values: &[i64]) -> Column {
    Series::new("Trabaja".into(), values.to_vec()).into()
}

#[test]
fn test_missing_target() {
    let df = DataFrame::new(vec![Series::new("Q".into(), vec!["a"]).into()]).unwrap();

    let comparison = explore_relationship(&df, "Q", "Trabaja");

    assert_eq!(
        comparison,
        Comparison::MissingColumn {
            column: "Trabaja".to_string()
        }
    );
    assert!(comparison.plots().is_empty());
}

#[test]
fn test_missing_question() {
    let df = DataFrame::new(vec![target(&[0, 1])]).unwrap();

    let comparison = explore_relationship(&df, "Q", "Trabaja");

    assert_eq!(
        comparison,
        Comparison::MissingColumn {
            column: "Q".to_string()
        }
    );
}

#[test]
fn test_multiselect_rates_per_group() {
    let df = DataFrame::new(vec![
        target(&[0, 0, 1, 1]),
        Series::new("Lugar__A".into(), vec![1i64, 0, 1, 1]).into(),
        Series::new("Lugar__B".into(), vec![0i64, 0, 1, 0]).into(),
    ])
    .unwrap();

    let Comparison::Multiselect(result) = explore_relationship(&df, "Lugar", "Trabaja") else {
        panic!("expected multiselect comparison");
    };

    assert_eq!(result.groups, vec!["0", "1"]);
    assert_eq!(result.options.len(), 2);
    assert_eq!(result.options[0].option, "A");
    assert_eq!(result.options[0].rates, vec![Some(0.5), Some(1.0)]);
    assert_eq!(result.options[1].rates, vec![Some(0.0), Some(0.5)]);
    assert!(matches!(
        result.plots.as_slice(),
        [PlotRequest::HorizontalBars { .. }]
    ));
}

#[test]
fn test_multiselect_branch_wins_without_test() {
    let df = DataFrame::new(vec![
        target(&[0, 1]),
        Series::new("Lugar__A".into(), vec![1i64, 0]).into(),
    ])
    .unwrap();

    let comparison = explore_relationship(&df, "Lugar", "Trabaja");

    assert!(comparison.test().is_none());
}

#[test]
fn test_numeric_comparison() {
    let df = DataFrame::new(vec![
        target(&[0, 0, 0, 1, 1, 1]),
        Series::new("Nivel".into(), vec![1i64, 2, 3, 4, 5, 6]).into(),
    ])
    .unwrap();

    let Comparison::Numeric(result) = explore_relationship(&df, "Nivel", "Trabaja") else {
        panic!("expected numeric comparison");
    };

    assert!(result.discrete);
    assert_eq!(result.groups.len(), 2);
    let first = result.groups[0].stats.as_ref().unwrap();
    assert_eq!(first.count, 3);
    assert_eq!(first.mean, 2.0);
    let test = result.test.unwrap();
    assert_eq!(test.kind, TestKind::MannWhitneyU);
    assert_eq!(test.statistic, 0.0);
    assert!(close(test.p_value, 0.1));
    assert!(matches!(
        result.plots.as_slice(),
        [
            PlotRequest::StackedPercentBars {
                horizontal: false,
                ..
            },
            PlotRequest::BoxPlot { .. }
        ]
    ));
}

#[test]
fn test_numeric_continuous_has_only_box_plot() {
    let df = DataFrame::new(vec![
        target(&[0, 1, 0, 1]),
        Series::new("Horas".into(), vec![1.5f64, 2.25, 3.0, 4.75]).into(),
    ])
    .unwrap();

    let Comparison::Numeric(result) = explore_relationship(&df, "Horas", "Trabaja") else {
        panic!("expected numeric comparison");
    };

    assert!(!result.discrete);
    assert!(matches!(
        result.plots.as_slice(),
        [PlotRequest::BoxPlot { .. }]
    ));
}

#[test]
fn test_numeric_with_empty_group_has_no_test() {
    let df = DataFrame::new(vec![
        target(&[1, 1]),
        Series::new("Nivel".into(), vec![1i64, 2]).into(),
    ])
    .unwrap();

    let comparison = explore_relationship(&df, "Nivel", "Trabaja");

    assert!(comparison.test().is_none());
}

#[test]
fn test_categorical_uses_chi_squared() {
    let answers: Vec<&str> = std::iter::repeat_n("x", 30)
        .chain(std::iter::repeat_n("y", 70))
        .collect();
    let targets: Vec<i64> = std::iter::repeat_n(0, 10)
        .chain(std::iter::repeat_n(1, 20))
        .chain(std::iter::repeat_n(0, 30))
        .chain(std::iter::repeat_n(1, 40))
        .collect();
    let df = DataFrame::new(vec![
        target(&targets),
        Series::new("Carrera".into(), answers).into(),
    ])
    .unwrap();

    let Comparison::Categorical(result) = explore_relationship(&df, "Carrera", "Trabaja") else {
        panic!("expected categorical comparison");
    };

    assert!(!result.low_expected);
    assert_eq!(result.test.kind, TestKind::ChiSquaredYates);
    assert!(close(result.test.p_value, 0.504_035_866_452_504_8));
    assert!(matches!(
        result.plots.as_slice(),
        [PlotRequest::StackedPercentBars {
            horizontal: true,
            ..
        }]
    ));
}

#[test]
fn test_categorical_small_2x2_uses_fisher() {
    // Table [[8, 2], [1, 5]].
    let answers: Vec<&str> = std::iter::repeat_n("Sí", 10)
        .chain(std::iter::repeat_n("No", 6))
        .collect();
    let targets: Vec<i64> = std::iter::repeat_n(0, 8)
        .chain(std::iter::repeat_n(1, 2))
        .chain(std::iter::repeat_n(0, 1))
        .chain(std::iter::repeat_n(1, 5))
        .collect();
    let df = DataFrame::new(vec![
        target(&targets),
        Series::new("Beca".into(), answers).into(),
    ])
    .unwrap();

    let Comparison::Categorical(result) = explore_relationship(&df, "Beca", "Trabaja") else {
        panic!("expected categorical comparison");
    };

    assert!(result.low_expected);
    assert_eq!(result.test.kind, TestKind::FisherExact);
    assert!(close(result.test.p_value, 0.034_965_034_965_034_96));
    // Rows sort as "No", "Sí".
    assert_eq!(result.table.counts(), [vec![1, 5], vec![8, 2]]);
}

#[test]
fn test_categorical_small_wide_table_uses_g_test() {
    let df = DataFrame::new(vec![
        target(&[0, 1, 0, 1, 0, 1]),
        Series::new("Ciudad".into(), vec!["a", "a", "b", "b", "c", "c"]).into(),
    ])
    .unwrap();

    let comparison = explore_relationship(&df, "Ciudad", "Trabaja");

    assert_eq!(comparison.test().map(|t| t.kind), Some(TestKind::GTest));
}

#[test]
fn test_dataset_is_not_modified() {
    let df = DataFrame::new(vec![
        target(&[0, 1]),
        Series::new("Ciudad".into(), vec![Some("a"), None]).into(),
    ])
    .unwrap();
    let before = df.clone();

    explore_relationship(&df, "Ciudad", "Trabaja");

    assert!(df.equals_missing(&before));
}
