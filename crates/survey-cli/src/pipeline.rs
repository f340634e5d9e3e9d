//! Encode pipeline and helpers shared by the CLI commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use polars::prelude::DataFrame;
use tracing::{info, info_span};

use survey_ingest::{read_raw_survey, write_csv};
use survey_model::INDICATOR_SEPARATOR;
use survey_schema::load_schema;
use survey_transform::{
    DEFAULT_UNMAPPED_REPORT, EncodingOptions, EncodingOutcome, derive_age_column,
    process_survey_data,
};

/// Suffix appended to the raw file stem for the default output name.
pub const ENCODED_SUFFIX: &str = "_encoded";

/// Birth-date column to derive an age column from before encoding.
#[derive(Debug, Clone)]
pub struct AgeDerivation {
    pub source: String,
    pub target: String,
    pub today: NaiveDate,
}

/// Inputs of one `encode` run.
#[derive(Debug, Clone)]
pub struct EncodeRequest {
    pub raw: PathBuf,
    pub schema: PathBuf,
    /// Defaults to [`default_output_path`].
    pub output: Option<PathBuf>,
    /// Defaults to `unmapped_values.json` in the output directory.
    pub unmapped_report: Option<PathBuf>,
    pub log_unmapped: bool,
    pub age: Option<AgeDerivation>,
}

#[derive(Debug)]
pub struct EncodeResult {
    pub output: PathBuf,
    /// Set when the unmapped report was written.
    pub unmapped_report: Option<PathBuf>,
    /// Rows with a derived age, when age derivation was requested.
    pub derived_ages: Option<usize>,
    pub outcome: EncodingOutcome,
}

/// `<stem>_encoded.csv` next to `raw`.
pub fn default_output_path(raw: &Path) -> PathBuf {
    let stem = raw
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "survey".to_string());
    raw.with_file_name(format!("{stem}{ENCODED_SUFFIX}.csv"))
}

/// The unmapped report path used when none is given: next to `output`.
pub fn default_unmapped_path(output: &Path) -> PathBuf {
    match output.parent() {
        Some(parent) => parent.join(DEFAULT_UNMAPPED_REPORT),
        None => PathBuf::from(DEFAULT_UNMAPPED_REPORT),
    }
}

/// Load, optionally derive ages, encode and write the encoded table.
pub fn run_encode_pipeline(request: &EncodeRequest) -> Result<EncodeResult> {
    let span = info_span!("encode_pipeline", raw = %request.raw.display());
    let _guard = span.enter();

    let schema = load_schema(&request.schema)
        .with_context(|| format!("load schema {}", request.schema.display()))?;
    info!(rules = schema.len(), "loaded schema");

    let mut raw = read_raw_survey(&request.raw)
        .with_context(|| format!("read raw survey {}", request.raw.display()))?;

    let derived_ages = match &request.age {
        Some(age) => Some(
            derive_age_column(&mut raw, &age.source, &age.target, age.today)
                .with_context(|| format!("derive ages from {}", age.source))?,
        ),
        None => None,
    };

    let output = request
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&request.raw));
    let unmapped_path = request
        .unmapped_report
        .clone()
        .unwrap_or_else(|| default_unmapped_path(&output));
    let options = EncodingOptions::new()
        .with_log_unmapped(request.log_unmapped)
        .with_unmapped_path(unmapped_path.clone());

    let mut outcome = process_survey_data(&raw, &schema, &options).context("encode survey")?;
    write_csv(&mut outcome.data, &output)
        .with_context(|| format!("write encoded survey {}", output.display()))?;
    info!(path = %output.display(), "wrote encoded survey");

    let unmapped_report =
        (request.log_unmapped && !outcome.unmapped.is_empty()).then_some(unmapped_path);

    Ok(EncodeResult {
        output,
        unmapped_report,
        derived_ages,
        outcome,
    })
}

/// Questions to compare against `target`: every other column, with
/// multiselect indicators (`question__code`) collapsed to their question.
///
/// A column is treated as an indicator only when at least two columns share
/// its `question__` prefix and no column is named `question` itself. Other
/// names containing the separator are kept as they are.
///
/// Order follows the table; each question appears once.
pub fn comparison_questions(df: &DataFrame, target: &str) -> Vec<String> {
    let names: Vec<&str> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.as_str())
        .filter(|name| *name != target)
        .collect();

    let indicator_question = |name: &str| -> Option<String> {
        let (question, _) = name.rsplit_once(INDICATOR_SEPARATOR)?;
        if question.is_empty() || names.contains(&question) {
            return None;
        }
        let prefix = format!("{question}{INDICATOR_SEPARATOR}");
        let siblings = names.iter().filter(|other| other.starts_with(&prefix)).count();
        (siblings >= 2).then(|| question.to_string())
    };

    let mut questions: Vec<String> = Vec::new();
    for name in &names {
        let question = indicator_question(name).unwrap_or_else(|| name.to_string());
        if !questions.contains(&question) {
            questions.push(question);
        }
    }
    questions
}
