use std::io::Write;

use survey_model::{EncodingRule, RuleKind};
use survey_schema::{SchemaError, load_schema};
use tempfile::NamedTempFile;

fn schema_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{content}").unwrap();
    file
}

#[test]
fn loads_schema_in_document_order() {
    let file = schema_file(
        r#"
- question: "¿Te gusta programar?"
  type: binary
  encoding:
    "Sí": 1
    "No": 0
- question: "¿Con qué frecuencia estudias?"
  type: ordinal
  encoding:
    Nunca: 0
    A veces: 1
    Siempre: 2
- question: "¿Qué lugar(es) utilizas para estudiar?"
  type: multiselect
  encoding:
    Biblioteca: A
    Casa: B
"#,
    );

    let schema = load_schema(file.path()).expect("load schema");

    let kinds: Vec<RuleKind> = schema
        .iter()
        .map(|rule| EncodingRule::try_from(rule).unwrap().kind())
        .collect();
    assert_eq!(
        kinds,
        vec![RuleKind::Binary, RuleKind::Ordinal, RuleKind::Multiselect]
    );
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_schema(&dir.path().join("encodings.yaml"));
    assert!(matches!(result, Err(SchemaError::NotFound { .. })));
}

#[test]
fn malformed_document_fails() {
    let file = schema_file("question: Q1\ntype: binary\n");
    let result = load_schema(file.path());
    assert!(matches!(result, Err(SchemaError::Parse { .. })));
}
