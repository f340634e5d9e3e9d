//! Diagnostics for an encoding run.

use std::path::Path;

use survey_ingest::write_json_pretty;
use survey_model::{RuleOutcome, RuleStatus, UnmappedReport};
use tracing::{debug, info, warn};

use crate::error::Result;

/// Log one rule outcome. Skips are warnings; applied rules are debug.
pub fn report_outcome(outcome: &RuleOutcome) {
    match &outcome.status {
        RuleStatus::Applied(applied) => debug!(
            question = %outcome.question,
            kind = %applied.kind,
            unmapped = applied.unmapped,
            columns = applied.columns.len(),
            "rule applied"
        ),
        RuleStatus::Skipped { reason } => warn!(
            question = %outcome.question,
            %reason,
            "rule skipped"
        ),
    }
}

/// Warn once per question that had unmapped answers, listing its distinct values.
pub fn log_unmapped_summary(report: &UnmappedReport) {
    for (question, values) in report.iter() {
        if values.is_empty() {
            continue;
        }
        let unique = report.unique_values(question);
        warn!(
            question,
            occurrences = values.len(),
            unique = unique.len(),
            values = ?unique,
            "unmapped answers"
        );
    }
}

/// Write the unmapped report as pretty JSON when it has any entries.
///
/// Returns whether a file was written.
pub fn persist_unmapped_report(report: &UnmappedReport, path: &Path) -> Result<bool> {
    if report.is_empty() {
        debug!("no unmapped answers, report not written");
        return Ok(false);
    }
    write_json_pretty(report, path)?;
    info!(
        path = %path.display(),
        questions = report.questions().count(),
        total = report.total(),
        "unmapped answers saved"
    );
    Ok(true)
}
