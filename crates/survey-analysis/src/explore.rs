//! Branch selection for question-versus-target comparisons.

use polars::prelude::*;
use survey_common::{column_display_values, column_f64_values, is_numeric_dtype};
use survey_model::INDICATOR_SEPARATOR;
use survey_stats::{
    ContingencyTable, DescriptiveStats, chi_squared, fisher_exact, g_test, mann_whitney_u,
};
use tracing::{debug, info, warn};

use crate::comparison::{
    CategoricalComparison, Comparison, GroupSummary, MultiselectComparison, NumericComparison,
    OptionRates,
};
use crate::groups::{TargetGroups, values_at};
use crate::plot::{PlotRequest, PlotSeries};

/// Most distinct integral values a numeric question may have to be charted
/// as an ordinal scale.
pub const MAX_ORDINAL_LEVELS: usize = 10;

/// Target values compared by the rank-sum test.
const TEST_GROUPS: (&str, &str) = ("0", "1");

/// Indicator columns created for a multiselect `question`, in table order.
pub fn multiselect_columns(df: &DataFrame, question: &str) -> Vec<String> {
    let prefix = format!("{question}{INDICATOR_SEPARATOR}");
    df.get_column_names()
        .iter()
        .filter(|name| name.starts_with(&prefix))
        .map(|name| name.to_string())
        .collect()
}

/// Compare `question` against the binary `target` column.
///
/// The analysis is chosen from the data:
///
/// - columns named `<question>__*` give per-group selection rates
/// - a numeric column gives group summaries and a Mann–Whitney U test
/// - anything else gives a contingency table with χ², or Fisher exact (2×2)
///   and G-test (larger) when some expected count is below 5
///
/// The table is not modified. Missing columns produce
/// [`Comparison::MissingColumn`] and a warning.
pub fn explore_relationship(df: &DataFrame, question: &str, target: &str) -> Comparison {
    let Ok(target_column) = df.column(target) else {
        warn!(target, "target column not found");
        return Comparison::MissingColumn {
            column: target.to_string(),
        };
    };
    let groups = match TargetGroups::from_column(target_column) {
        Ok(groups) => groups,
        Err(e) => return unreadable(target, &e),
    };

    let indicators = multiselect_columns(df, question);
    if !indicators.is_empty() {
        info!(question, options = indicators.len(), "multiselect question");
        return compare_multiselect(df, question, target, &groups, indicators);
    }

    let Ok(column) = df.column(question) else {
        warn!(question, "question column not found");
        return Comparison::MissingColumn {
            column: question.to_string(),
        };
    };

    if is_numeric_dtype(column.dtype()) {
        info!(question, "numeric comparison");
        compare_numeric(column, question, target, &groups)
    } else {
        info!(question, "categorical comparison");
        compare_categorical(column, question, target, &groups)
    }
}

fn unreadable(column: &str, error: &PolarsError) -> Comparison {
    warn!(column, error = %error, "column could not be read");
    Comparison::Unreadable {
        column: column.to_string(),
        message: error.to_string(),
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

fn compare_multiselect(
    df: &DataFrame,
    question: &str,
    target: &str,
    groups: &TargetGroups,
    indicators: Vec<String>,
) -> Comparison {
    let prefix_len = question.len() + INDICATOR_SEPARATOR.len();
    let mut options = Vec::with_capacity(indicators.len());
    for column_name in indicators {
        let values = match df.column(&column_name).and_then(column_f64_values) {
            Ok(values) => values,
            Err(e) => return unreadable(&column_name, &e),
        };
        let rates = groups
            .iter()
            .map(|(_, rows)| mean(&values_at(&values, rows)))
            .collect();
        options.push(OptionRates {
            option: column_name[prefix_len..].to_string(),
            column: column_name,
            rates,
        });
    }

    let group_labels = groups.labels();
    let series = group_labels
        .iter()
        .enumerate()
        .map(|(g, label)| PlotSeries {
            label: format!("{target} = {label}"),
            values: options
                .iter()
                .map(|option| option.rates[g].unwrap_or(0.0))
                .collect(),
        })
        .collect();
    let plot = PlotRequest::HorizontalBars {
        title: format!("Selection rate by target group: {question}"),
        value_label: "Proportion".to_string(),
        categories: options.iter().map(|option| option.option.clone()).collect(),
        series,
    };

    Comparison::Multiselect(MultiselectComparison {
        question: question.to_string(),
        target: target.to_string(),
        groups: group_labels,
        options,
        plots: vec![plot],
    })
}

/// Whether distinct values are all integral and at most [`MAX_ORDINAL_LEVELS`].
fn is_discrete_ordinal(values: &[Option<f64>]) -> bool {
    let mut distinct: Vec<f64> = values.iter().flatten().copied().collect();
    distinct.sort_by(f64::total_cmp);
    distinct.dedup();
    distinct.len() <= MAX_ORDINAL_LEVELS && distinct.iter().all(|v| v.fract() == 0.0)
}

/// Row-percentage bars of a question × target table, one series per target value.
fn stacked_percent_plot(
    table: &ContingencyTable,
    title: String,
    target: &str,
    horizontal: bool,
) -> PlotRequest {
    let percentages = table.row_percentages();
    let series = table
        .column_labels()
        .iter()
        .enumerate()
        .map(|(j, label)| PlotSeries {
            label: format!("{target} = {label}"),
            values: percentages.iter().map(|row| row[j]).collect(),
        })
        .collect();
    PlotRequest::StackedPercentBars {
        title,
        horizontal,
        categories: table.row_labels().to_vec(),
        series,
    }
}

/// Question × target pairs for rows where both are present.
fn label_pairs(
    labels: Vec<Option<String>>,
    groups: &TargetGroups,
) -> impl Iterator<Item = (String, String)> + '_ {
    labels
        .into_iter()
        .zip(&groups.row_labels)
        .filter_map(|(answer, group)| Some((answer?, group.clone()?)))
}

fn compare_numeric(
    column: &Column,
    question: &str,
    target: &str,
    groups: &TargetGroups,
) -> Comparison {
    let values = match column_f64_values(column) {
        Ok(values) => values,
        Err(e) => return unreadable(question, &e),
    };

    let mut summaries = Vec::new();
    let mut box_groups = Vec::new();
    for (label, rows) in groups.iter() {
        let group_values = values_at(&values, rows);
        summaries.push(GroupSummary {
            group: label.to_string(),
            stats: DescriptiveStats::new(group_values.iter().copied()),
        });
        box_groups.push((label.to_string(), group_values));
    }

    let mut plots = Vec::new();
    let discrete = is_discrete_ordinal(&values);
    if discrete {
        let labels = match column_display_values(column) {
            Ok(labels) => labels,
            Err(e) => return unreadable(question, &e),
        };
        let table = ContingencyTable::from_pairs(label_pairs(labels, groups));
        plots.push(stacked_percent_plot(
            &table,
            format!("Answer distribution by target group: {question}"),
            target,
            false,
        ));
    }
    plots.push(PlotRequest::BoxPlot {
        title: format!("Distribution of '{question}' by target"),
        groups: box_groups,
    });

    let (negative, positive) = TEST_GROUPS;
    let test = mann_whitney_u(
        &values_at(&values, groups.rows(negative)),
        &values_at(&values, groups.rows(positive)),
    );
    match &test {
        Some(result) => debug!(
            question,
            u = result.statistic,
            p = result.p_value,
            "Mann-Whitney U"
        ),
        None => warn!(
            question,
            target, "a target group is empty, Mann-Whitney U skipped"
        ),
    }

    Comparison::Numeric(NumericComparison {
        question: question.to_string(),
        target: target.to_string(),
        groups: summaries,
        discrete,
        test,
        plots,
    })
}

fn compare_categorical(
    column: &Column,
    question: &str,
    target: &str,
    groups: &TargetGroups,
) -> Comparison {
    let labels = match column_display_values(column) {
        Ok(labels) => labels,
        Err(e) => return unreadable(question, &e),
    };
    let table = ContingencyTable::from_pairs(label_pairs(labels, groups));

    let plot = stacked_percent_plot(
        &table,
        format!("Answers to '{question}' by target"),
        target,
        true,
    );

    let chi = chi_squared(&table);
    let low_expected = table.has_low_expected();
    let test = if low_expected {
        warn!(
            question,
            "some expected counts are below 5, chi-squared may be unreliable"
        );
        match table.as_2x2() {
            Some(counts) => fisher_exact(&counts),
            None => g_test(&table),
        }
    } else {
        chi
    };
    debug!(question, test = %test.kind, p = test.p_value, "independence test");

    Comparison::Categorical(CategoricalComparison {
        question: question.to_string(),
        target: target.to_string(),
        table,
        chi_squared: chi,
        low_expected,
        test,
        plots: vec![plot],
    })
}
