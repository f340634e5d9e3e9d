use anyhow::{Context, Result};
use tracing::{info, info_span};

use survey_analysis::{Comparison, PlotRequest, distribution_plot, explore_relationship};
use survey_cli::pipeline::{
    AgeDerivation, EncodeRequest, EncodeResult, comparison_questions, run_encode_pipeline,
};
use survey_ingest::{read_processed_survey, read_raw_survey};
use survey_stats::{McarReport, test_missing_mcar};

use crate::cli::{CompareArgs, DistributionArgs, EncodeArgs, McarArgs};

pub fn run_encode(args: &EncodeArgs) -> Result<EncodeResult> {
    let age = match (&args.birth_date_column, &args.age_column) {
        (Some(source), Some(target)) => Some(AgeDerivation {
            source: source.clone(),
            target: target.clone(),
            today: chrono::Local::now().date_naive(),
        }),
        _ => None,
    };
    let request = EncodeRequest {
        raw: args.raw.clone(),
        schema: args.schema.clone(),
        output: args.output.clone(),
        unmapped_report: args.unmapped_report.clone(),
        log_unmapped: !args.no_log_unmapped,
        age,
    };
    run_encode_pipeline(&request)
}

pub fn run_compare(args: &CompareArgs) -> Result<Vec<Comparison>> {
    let span = info_span!("compare", target = %args.target);
    let _guard = span.enter();

    let df = read_processed_survey(&args.processed)
        .with_context(|| format!("read processed survey {}", args.processed.display()))?;
    let questions = if args.questions.is_empty() {
        comparison_questions(&df, &args.target)
    } else {
        args.questions.clone()
    };
    info!(questions = questions.len(), "comparing questions");

    Ok(questions
        .iter()
        .map(|question| explore_relationship(&df, question, &args.target))
        .collect())
}

pub fn run_distribution(args: &DistributionArgs) -> Result<PlotRequest> {
    let df = read_processed_survey(&args.data)
        .with_context(|| format!("read survey {}", args.data.display()))?;
    distribution_plot(
        &df,
        &args.column,
        args.question_text.as_deref(),
        args.ascending,
    )
    .with_context(|| format!("count values of {}", args.column))
}

pub fn run_mcar(args: &McarArgs) -> Result<Option<McarReport>> {
    let df = read_raw_survey(&args.data)
        .with_context(|| format!("read survey {}", args.data.display()))?;
    test_missing_mcar(&df, args.alpha).context("test missingness patterns")
}
