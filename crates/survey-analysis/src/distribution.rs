//! Answer distributions of a single column.

use polars::prelude::*;
use survey_common::column_display_values;
use survey_stats::compare_labels;

use crate::plot::PlotRequest;

/// Counts of each distinct non-null value in `column`, ordered by value.
///
/// Numeric values order by magnitude, before any text values. With
/// `ascending` false the order is reversed.
///
/// # Errors
///
/// Fails when the column does not exist.
pub fn value_counts(
    df: &DataFrame,
    column: &str,
    ascending: bool,
) -> PolarsResult<Vec<(String, usize)>> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for value in column_display_values(df.column(column)?)?.into_iter().flatten() {
        match counts.iter_mut().find(|(existing, _)| *existing == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }
    counts.sort_by(|(a, _), (b, _)| {
        let order = compare_labels(a, b);
        if ascending { order } else { order.reverse() }
    });
    Ok(counts)
}

/// Distribution chart request for `column`.
///
/// `question_text` titles the chart; the column name is used when absent.
pub fn distribution_plot(
    df: &DataFrame,
    column: &str,
    question_text: Option<&str>,
    ascending: bool,
) -> PolarsResult<PlotRequest> {
    let counts = value_counts(df, column, ascending)?;
    let title = match question_text {
        Some(text) => format!("Distribution for: {text} ({column})"),
        None => format!("Distribution for {column}"),
    };
    Ok(PlotRequest::Distribution { title, counts })
}
