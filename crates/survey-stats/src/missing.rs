//! Missingness-pattern test.
//!
//! Rows are grouped by which columns are missing. Under MCAR every pattern is
//! assumed equally likely, and the pattern frequencies are compared to that
//! with a χ² goodness-of-fit test.

use polars::prelude::*;
use survey_common::column_text_values;
use tracing::{debug, info};

use crate::special::chi_squared_sf;

/// Decision of the MCAR test at the requested significance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum McarVerdict {
    /// The null hypothesis cannot be rejected.
    Mcar,
    /// The null hypothesis is rejected.
    NotMcar,
}

/// One observed missingness pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingPattern {
    /// One character per column: `1` missing, `0` present.
    pub mask: String,
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct McarReport {
    /// Patterns sorted by mask.
    pub patterns: Vec<MissingPattern>,
    pub statistic: f64,
    pub dof: usize,
    pub p_value: f64,
    /// Rows expected per pattern under equal frequencies.
    pub expected: f64,
    pub alpha: f64,
    pub verdict: McarVerdict,
}

/// Missingness mask of every row. Nulls and empty strings count as missing.
pub fn missing_masks(df: &DataFrame) -> PolarsResult<Vec<String>> {
    let mut masks = vec![String::with_capacity(df.width()); df.height()];
    for column in df.get_columns() {
        for (mask, cell) in masks.iter_mut().zip(column_text_values(column)?) {
            let missing = cell.as_deref().is_none_or(str::is_empty);
            mask.push(if missing { '1' } else { '0' });
        }
    }
    Ok(masks)
}

/// Test whether the data's missing values are Missing Completely At Random.
///
/// Returns `Ok(None)` when fewer than two distinct patterns exist and the
/// test cannot be performed. A p-value above `alpha` gives
/// [`McarVerdict::Mcar`].
pub fn test_missing_mcar(df: &DataFrame, alpha: f64) -> PolarsResult<Option<McarReport>> {
    let mut masks = missing_masks(df)?;
    masks.sort_unstable();

    let mut patterns: Vec<MissingPattern> = Vec::new();
    for mask in masks {
        match patterns.last_mut() {
            Some(last) if last.mask == mask => last.rows += 1,
            _ => patterns.push(MissingPattern { mask, rows: 1 }),
        }
    }

    if patterns.len() < 2 {
        info!(
            patterns = patterns.len(),
            "not enough missingness patterns for an MCAR test"
        );
        return Ok(None);
    }

    let expected = df.height() as f64 / patterns.len() as f64;
    let statistic: f64 = patterns
        .iter()
        .map(|pattern| (pattern.rows as f64 - expected).powi(2) / expected)
        .sum();
    let dof = patterns.len() - 1;
    let p_value = chi_squared_sf(statistic, dof);
    let verdict = if p_value > alpha {
        McarVerdict::Mcar
    } else {
        McarVerdict::NotMcar
    };
    debug!(statistic, dof, p_value, ?verdict, "MCAR test");

    Ok(Some(McarReport {
        patterns,
        statistic,
        dof,
        p_value,
        expected,
        alpha,
        verdict,
    }))
}
