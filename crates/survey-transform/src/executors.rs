//! Column-level encoding functions.
//!
//! The engine dispatches each validated rule to one of these. Both operate on
//! the working DataFrame in place and never touch other columns.

use polars::prelude::*;
use survey_common::column_text_values;
use survey_model::{
    Code, CodeKind, Encoding, MULTISELECT_DELIMITER, UnmappedReport, indicator_column,
};
use tracing::trace;

/// Replace a question column with its encoded codes.
///
/// Each non-null cell is trimmed and looked up in `encoding`. A cell with no
/// entry becomes null and its trimmed text is recorded in `unmapped` under
/// `question`. Null cells stay null and are not recorded.
///
/// The output column is Int64 when every code is an integer, Float64 when any
/// code is fractional, and String when any code is text. Non-text input is
/// compared by its rendered text, so re-encoding already numeric data yields
/// nulls.
///
/// # Returns
///
/// Number of unmapped cells.
pub fn encode_lookup_column(
    df: &mut DataFrame,
    question: &str,
    encoding: &Encoding,
    unmapped: &mut UnmappedReport,
) -> PolarsResult<usize> {
    let values = column_text_values(df.column(question)?)?;

    let mut unmapped_count = 0;
    let codes: Vec<Option<&Code>> = values
        .iter()
        .map(|cell| {
            let answer = cell.as_deref()?.trim();
            let code = encoding.get(answer);
            if code.is_none() {
                trace!(question, value = answer, "no code for answer");
                unmapped.record(question, answer);
                unmapped_count += 1;
            }
            code
        })
        .collect();

    let column = match encoding.output_kind() {
        CodeKind::Int => Column::new(
            question.into(),
            codes
                .iter()
                .map(|code| code.and_then(Code::as_i64))
                .collect::<Vec<Option<i64>>>(),
        ),
        CodeKind::Float => Column::new(
            question.into(),
            codes
                .iter()
                .map(|code| code.and_then(Code::as_f64))
                .collect::<Vec<Option<f64>>>(),
        ),
        CodeKind::Text => Column::new(
            question.into(),
            codes
                .iter()
                .map(|code| code.map(ToString::to_string))
                .collect::<Vec<Option<String>>>(),
        ),
    };
    df.with_column(column)?;

    Ok(unmapped_count)
}

/// Split a multiselect cell into trimmed option labels.
///
/// Null and blank cells select nothing.
pub fn split_selections(cell: Option<&str>) -> Vec<&str> {
    match cell {
        Some(text) if !text.trim().is_empty() => text
            .split(MULTISELECT_DELIMITER)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// Expand a multiselect question into one 0/1 indicator column per option.
///
/// Options are visited in declaration order; the indicator for option
/// `(label, code)` is named `<question>__<code>` and holds 1 where `label`
/// is among the cell's selections. Options sharing a code share one
/// indicator. Selections matching no option are ignored. The question
/// column itself is dropped afterwards.
///
/// # Returns
///
/// Names of the indicator columns, in creation order.
pub fn expand_multiselect(
    df: &mut DataFrame,
    question: &str,
    options: &Encoding,
) -> PolarsResult<Vec<String>> {
    let values = column_text_values(df.column(question)?)?;
    let selections: Vec<Vec<&str>> = values
        .iter()
        .map(|cell| split_selections(cell.as_deref()))
        .collect();

    let mut indicators: Vec<(String, Vec<i64>)> = Vec::with_capacity(options.len());
    for (label, code) in options.iter() {
        let name = indicator_column(question, &code.to_string());
        let flags: Vec<i64> = selections
            .iter()
            .map(|selected| i64::from(selected.contains(&label)))
            .collect();

        match indicators.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => {
                for (slot, flag) in existing.iter_mut().zip(flags) {
                    *slot = (*slot).max(flag);
                }
            }
            None => indicators.push((name, flags)),
        }
    }

    let mut names = Vec::with_capacity(indicators.len());
    for (name, flags) in indicators {
        df.with_column(Column::new(name.as_str().into(), flags))?;
        names.push(name);
    }
    df.drop_in_place(question)?;

    Ok(names)
}
