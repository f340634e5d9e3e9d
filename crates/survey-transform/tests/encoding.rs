//! Tests for schema-driven survey encoding.

use polars::prelude::*;
use proptest::prelude::*;
use survey_model::{Encoding, QuestionRule, RuleKind, RuleStatus, Schema, SkipReason};
use survey_schema::parse_schema;
use survey_transform::{EncodingOptions, process_survey_data};

const PROGRAMAR: &str = "¿Te gusta programar?";
const LUGAR: &str = "¿Dónde estudias?";

fn quiet() -> EncodingOptions {
    EncodingOptions::default().with_log_unmapped(false)
}

fn single(question: &str, values: Vec<Option<&str>>) -> DataFrame {
    DataFrame::new(vec![Series::new(question.into(), values).into()]).unwrap()
}

fn ints(df: &DataFrame, column: &str) -> Vec<Option<i64>> {
    df.column(column)
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .collect()
}

fn binary_schema() -> Schema {
    parse_schema(&format!(
        "- question: '{PROGRAMAR}'\n  type: binary\n  encoding:\n    Sí: 1\n    No: 0\n"
    ))
    .unwrap()
}

#[test]
fn test_binary_encoding() {
    let df = single(PROGRAMAR, vec![Some("Sí"), Some("No"), Some("Sí")]);

    let outcome = process_survey_data(&df, &binary_schema(), &quiet()).unwrap();

    assert_eq!(
        ints(&outcome.data, PROGRAMAR),
        vec![Some(1), Some(0), Some(1)]
    );
    assert!(outcome.unmapped.is_empty());
}

#[test]
fn test_unmapped_answer_becomes_null() {
    let df = single(PROGRAMAR, vec![Some("Sí"), Some("Tal vez"), Some("No")]);

    let outcome = process_survey_data(&df, &binary_schema(), &quiet()).unwrap();

    assert_eq!(
        ints(&outcome.data, PROGRAMAR),
        vec![Some(1), None, Some(0)]
    );
    assert_eq!(
        outcome.unmapped.values(PROGRAMAR),
        Some(&["Tal vez".to_string()][..])
    );
}

#[test]
fn test_unmapped_answers_are_recorded_trimmed() {
    let df = single(PROGRAMAR, vec![Some("Sí"), Some(" Tal vez "), Some("Tal vez")]);

    let outcome = process_survey_data(&df, &binary_schema(), &quiet()).unwrap();

    assert_eq!(
        outcome.unmapped.values(PROGRAMAR),
        Some(&["Tal vez".to_string(), "Tal vez".to_string()][..])
    );
    assert_eq!(
        outcome.unmapped.unique_values(PROGRAMAR).into_iter().collect::<Vec<_>>(),
        vec!["Tal vez"]
    );
}

#[test]
fn test_categorical_with_encoding_maps_labels() {
    let schema = parse_schema(&format!(
        "- question: '{LUGAR}'\n  type: categorical\n  encoding:\n    Casa: 1\n    Biblioteca: 2\n"
    ))
    .unwrap();
    let df = single(
        LUGAR,
        vec![Some("Casa"), Some("Parque"), None, Some(" Biblioteca")],
    );

    let outcome = process_survey_data(&df, &schema, &quiet()).unwrap();

    assert_eq!(
        ints(&outcome.data, LUGAR),
        vec![Some(1), None, None, Some(2)]
    );
    assert!(outcome.rules[0].is_applied());
    assert_eq!(
        outcome.unmapped.values(LUGAR),
        Some(&["Parque".to_string()][..])
    );
    assert_eq!(outcome.unmapped.total(), 1);
}

#[test]
fn test_ordinal_encoding_with_numeric_keys() {
    let schema = parse_schema(
        "- question: Nivel\n  type: ordinal\n  encoding: {1: 1, 2: 2, 3: 3}\n",
    )
    .unwrap();
    let df = single("Nivel", vec![Some("3"), Some("1"), None]);

    let outcome = process_survey_data(&df, &schema, &quiet()).unwrap();

    assert_eq!(ints(&outcome.data, "Nivel"), vec![Some(3), Some(1), None]);
}

#[test]
fn test_categorical_without_encoding_is_identity() {
    let schema = parse_schema(&format!(
        "- question: '{LUGAR}'\n  type: categorical\n  encoding: null\n"
    ))
    .unwrap();
    let df = single(LUGAR, vec![Some("Casa"), Some("Biblioteca")]);

    let outcome = process_survey_data(&df, &schema, &quiet()).unwrap();

    assert_eq!(outcome.data.shape(), df.shape());
    assert!(outcome.data.equals_missing(&df));
    assert_eq!(
        outcome.rules[0].skip_reason(),
        Some(&SkipReason::MissingEncoding)
    );
}

#[test]
fn test_multiselect_expansion() {
    let schema = parse_schema(&format!(
        "- question: '{LUGAR}'\n  type: multiselect\n  encoding:\n    Biblioteca: A\n    Casa: B\n    Cafetería: C\n"
    ))
    .unwrap();
    let df = DataFrame::new(vec![
        Series::new("id".into(), vec![1i64, 2, 3]).into(),
        Series::new(
            LUGAR.into(),
            vec![Some("Biblioteca, Casa"), None, Some("Cafetería")],
        )
        .into(),
    ])
    .unwrap();

    let outcome = process_survey_data(&df, &schema, &quiet()).unwrap();

    let names: Vec<String> = outcome
        .data
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "id".to_string(),
            format!("{LUGAR}__A"),
            format!("{LUGAR}__B"),
            format!("{LUGAR}__C"),
        ]
    );
    assert_eq!(
        ints(&outcome.data, &format!("{LUGAR}__A")),
        vec![Some(1), Some(0), Some(0)]
    );
    assert_eq!(
        ints(&outcome.data, &format!("{LUGAR}__B")),
        vec![Some(1), Some(0), Some(0)]
    );
    assert_eq!(
        ints(&outcome.data, &format!("{LUGAR}__C")),
        vec![Some(0), Some(0), Some(1)]
    );
    assert_eq!(outcome.indicators.columns(LUGAR).map(<[String]>::len), Some(3));
}

#[test]
fn test_legacy_multiple_categorical_expands() {
    let schema = parse_schema(&format!(
        "- question: '{LUGAR}'\n  type: categorical\n  multiple: true\n  encoding: {{Casa: B}}\n"
    ))
    .unwrap();
    let df = single(LUGAR, vec![Some("Casa"), Some("Parque")]);

    let outcome = process_survey_data(&df, &schema, &quiet()).unwrap();

    assert_eq!(
        ints(&outcome.data, &format!("{LUGAR}__B")),
        vec![Some(1), Some(0)]
    );
    assert!(outcome.data.column(LUGAR).is_err());
}

#[test]
fn test_multiselect_without_options_is_skipped() {
    let schema = Schema::new(vec![QuestionRule::new(LUGAR, "multiselect")]);
    let df = single(LUGAR, vec![Some("Casa")]);

    let outcome = process_survey_data(&df, &schema, &quiet()).unwrap();

    assert!(outcome.data.column(LUGAR).is_ok());
    assert_eq!(
        outcome.rules[0].skip_reason(),
        Some(&SkipReason::MissingEncoding)
    );
}

#[test]
fn test_reencoding_numeric_output_yields_nulls() {
    let df = single(PROGRAMAR, vec![Some("Sí"), Some("No"), Some("Sí")]);
    let first = process_survey_data(&df, &binary_schema(), &quiet()).unwrap();

    let second = process_survey_data(&first.data, &binary_schema(), &quiet()).unwrap();

    assert_eq!(ints(&second.data, PROGRAMAR), vec![None, None, None]);
    assert_eq!(
        second.unmapped.values(PROGRAMAR),
        Some(&["1".to_string(), "0".to_string(), "1".to_string()][..])
    );
}

#[test]
fn test_question_not_found() {
    let df = single("Otra", vec![Some("x")]);

    let outcome = process_survey_data(&df, &binary_schema(), &quiet()).unwrap();

    assert!(outcome.data.equals_missing(&df));
    assert_eq!(outcome.rules[0].question, PROGRAMAR);
    assert_eq!(
        outcome.rules[0].skip_reason(),
        Some(&SkipReason::QuestionNotFound)
    );
}

#[test]
fn test_unknown_type_is_skipped() {
    let schema = parse_schema("- question: Q\n  type: likert\n  encoding: {a: 1}\n").unwrap();
    let df = single("Q", vec![Some("a")]);

    let outcome = process_survey_data(&df, &schema, &quiet()).unwrap();

    assert!(outcome.data.equals_missing(&df));
    assert_eq!(
        outcome.rules[0].skip_reason(),
        Some(&SkipReason::UnknownKind("likert".to_string()))
    );
}

#[test]
fn test_type_names_are_case_insensitive() {
    let encoding: Encoding = [("Sí", 1)].into_iter().collect();
    let schema = Schema::new(vec![QuestionRule::new(PROGRAMAR, "Binary").with_encoding(&encoding)]);
    let df = single(PROGRAMAR, vec![Some("Sí")]);

    let outcome = process_survey_data(&df, &schema, &quiet()).unwrap();

    match &outcome.rules[0].status {
        RuleStatus::Applied(applied) => assert_eq!(applied.kind, RuleKind::Binary),
        other => panic!("expected applied rule, got {other:?}"),
    }
}

#[test]
fn test_unmapped_report_written_when_needed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unmapped_values.json");
    let options = EncodingOptions::default().with_unmapped_path(&path);
    let df = single(PROGRAMAR, vec![Some("Sí"), Some("Tal vez")]);

    process_survey_data(&df, &binary_schema(), &options).unwrap();

    let saved = std::fs::read_to_string(&path).unwrap();
    insta::assert_snapshot!(saved, @r#"
    {
      "¿Te gusta programar?": [
        "Tal vez"
      ]
    }
    "#);
}

#[test]
fn test_unmapped_report_not_written_when_clean() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unmapped_values.json");
    let options = EncodingOptions::default().with_unmapped_path(&path);
    let df = single(PROGRAMAR, vec![Some("Sí"), Some("No")]);

    process_survey_data(&df, &binary_schema(), &options).unwrap();

    assert!(!path.exists());
}

#[test]
fn test_outcome_reports_are_mergeable() {
    let first = process_survey_data(
        &single(PROGRAMAR, vec![Some("Quizás")]),
        &binary_schema(),
        &quiet(),
    )
    .unwrap();
    let second = process_survey_data(
        &single(PROGRAMAR, vec![Some("Tal vez")]),
        &binary_schema(),
        &quiet(),
    )
    .unwrap();

    let mut combined = first.unmapped.clone();
    combined.merge(second.unmapped);

    assert_eq!(combined.total(), 2);
    assert_eq!(first.unmapped.total(), 1);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 64,
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

fn arb_answer() -> impl Strategy<Value = Option<&'static str>> {
    prop_oneof![
        4 => prop::sample::select(vec!["Sí", "No", " Sí", "No "]).prop_map(Some),
        1 => prop::sample::select(vec!["Tal vez", " Tal vez ", "sí", ""]).prop_map(Some),
        1 => Just(None),
    ]
}

fn arb_selection() -> impl Strategy<Value = Vec<&'static str>> {
    prop::sample::subsequence(vec!["Biblioteca", "Casa", "Cafetería"], 0..=3)
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn prop_each_cell_is_its_lookup(answers in prop::collection::vec(arb_answer(), 1..40)) {
        let df = single(PROGRAMAR, answers.clone());

        let outcome = process_survey_data(&df, &binary_schema(), &quiet()).unwrap();
        let encoded = ints(&outcome.data, PROGRAMAR);

        let mut expected_unmapped: Vec<String> = Vec::new();
        for (answer, code) in answers.iter().zip(&encoded) {
            let expected = match answer.map(str::trim) {
                Some("Sí") => Some(1),
                Some("No") => Some(0),
                Some(other) => {
                    expected_unmapped.push(other.to_string());
                    None
                }
                None => None,
            };
            prop_assert_eq!(*code, expected);
        }
        prop_assert_eq!(outcome.data.height(), answers.len());
        prop_assert_eq!(outcome.unmapped.total(), expected_unmapped.len());
        if !expected_unmapped.is_empty() {
            prop_assert_eq!(
                outcome.unmapped.values(PROGRAMAR),
                Some(expected_unmapped.as_slice())
            );
        }
    }

    #[test]
    fn prop_indicators_match_selections(rows in prop::collection::vec(arb_selection(), 1..30)) {
        let cells: Vec<Option<String>> = rows
            .iter()
            .map(|selected| (!selected.is_empty()).then(|| selected.join(", ")))
            .collect();
        let df = DataFrame::new(vec![Series::new(LUGAR.into(), cells).into()]).unwrap();
        let options: Encoding = [("Biblioteca", "A"), ("Casa", "B"), ("Cafetería", "C")]
            .into_iter()
            .collect();
        let schema = Schema::new(vec![QuestionRule::new(LUGAR, "multiselect").with_encoding(&options)]);

        let outcome = process_survey_data(&df, &schema, &quiet()).unwrap();

        prop_assert_eq!(outcome.data.width(), options.len());
        prop_assert_eq!(outcome.data.height(), rows.len());
        for (label, code) in options.iter() {
            let column = ints(&outcome.data, &format!("{LUGAR}__{code}"));
            for (selected, flag) in rows.iter().zip(column) {
                prop_assert_eq!(flag, Some(i64::from(selected.contains(&label))));
            }
        }
    }
}
