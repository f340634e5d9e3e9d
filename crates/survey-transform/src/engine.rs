//! Rule dispatch over a survey table.

use polars::prelude::*;
use survey_model::{
    AppliedRule, EncodingRule, IndicatorRegistry, QuestionRule, RuleError, RuleOutcome, Schema,
    SkipReason, UnmappedReport,
};
use tracing::{info, info_span};

use crate::error::Result;
use crate::executors::{encode_lookup_column, expand_multiselect};
use crate::options::EncodingOptions;
use crate::reporting::{log_unmapped_summary, persist_unmapped_report, report_outcome};

/// Everything one encoding call produced.
///
/// The reports are local to the call. Use
/// [`UnmappedReport::merge`] and [`IndicatorRegistry::merge`] to combine
/// several calls.
#[derive(Debug, Clone)]
pub struct EncodingOutcome {
    /// Encoded copy of the input table.
    pub data: DataFrame,
    pub unmapped: UnmappedReport,
    pub indicators: IndicatorRegistry,
    /// One entry per schema rule, in schema order.
    pub rules: Vec<RuleOutcome>,
}

impl EncodingOutcome {
    pub fn applied_count(&self) -> usize {
        self.rules.iter().filter(|r| r.is_applied()).count()
    }

    pub fn skipped(&self) -> impl Iterator<Item = &RuleOutcome> {
        self.rules.iter().filter(|r| !r.is_applied())
    }
}

/// Apply every schema rule, in order, to a copy of `df`.
///
/// Rules whose question is absent, whose type is unknown, or whose encoding
/// is missing are skipped and reported in [`EncodingOutcome::rules`]; they
/// never fail the call. Unmapped answers become null and are collected in
/// [`EncodingOutcome::unmapped`]. When `options.log_unmapped` is set, a
/// per-question warning is logged and the report is written to
/// `options.unmapped_path` if anything was unmapped.
///
/// # Errors
///
/// Fails only on DataFrame errors or when the unmapped report cannot be
/// written.
pub fn process_survey_data(
    df: &DataFrame,
    schema: &Schema,
    options: &EncodingOptions,
) -> Result<EncodingOutcome> {
    let span = info_span!("encode", rules = schema.len(), rows = df.height());
    let _guard = span.enter();

    let mut data = df.clone();
    let mut unmapped = UnmappedReport::new();
    let mut indicators = IndicatorRegistry::new();
    let mut rules = Vec::with_capacity(schema.len());

    for (position, rule) in schema.iter().enumerate() {
        let outcome = apply_rule(&mut data, rule, position, &mut unmapped, &mut indicators)?;
        report_outcome(&outcome);
        rules.push(outcome);
    }

    if options.log_unmapped {
        log_unmapped_summary(&unmapped);
        persist_unmapped_report(&unmapped, &options.unmapped_path)?;
    }

    let outcome = EncodingOutcome {
        data,
        unmapped,
        indicators,
        rules,
    };
    info!(
        applied = outcome.applied_count(),
        skipped = outcome.rules.len() - outcome.applied_count(),
        unmapped = outcome.unmapped.total(),
        columns = outcome.data.width(),
        "encoding complete"
    );
    Ok(outcome)
}

fn apply_rule(
    data: &mut DataFrame,
    rule: &QuestionRule,
    position: usize,
    unmapped: &mut UnmappedReport,
    indicators: &mut IndicatorRegistry,
) -> Result<RuleOutcome> {
    let Some(question) = rule.question_name() else {
        return Ok(RuleOutcome::skipped(
            format!("rule #{}", position + 1),
            RuleError::MissingQuestion.into(),
        ));
    };

    // Absent questions report QuestionNotFound even when the type is unknown.
    if data.column(&question).is_err() {
        return Ok(RuleOutcome::skipped(question, SkipReason::QuestionNotFound));
    }

    let validated = match EncodingRule::try_from(rule) {
        Ok(validated) => validated,
        Err(error) => return Ok(RuleOutcome::skipped(question, error.into())),
    };
    let kind = validated.kind();

    let applied = match &validated {
        EncodingRule::Binary { encoding, .. }
        | EncodingRule::Ordinal { encoding, .. }
        | EncodingRule::Categorical {
            encoding: Some(encoding),
            ..
        } => {
            let count = encode_lookup_column(data, &question, encoding, unmapped)?;
            AppliedRule {
                kind,
                unmapped: count,
                columns: vec![question.clone()],
            }
        }
        EncodingRule::Categorical { encoding: None, .. } => {
            return Ok(RuleOutcome::skipped(question, SkipReason::MissingEncoding));
        }
        EncodingRule::Multiselect { options, .. } => {
            let columns = expand_multiselect(data, &question, options)?;
            for column in &columns {
                indicators.register(&question, column.as_str());
            }
            AppliedRule {
                kind,
                unmapped: 0,
                columns,
            }
        }
    };

    Ok(RuleOutcome::applied(question, applied))
}
