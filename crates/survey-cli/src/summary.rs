use std::fmt::Display;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use survey_analysis::{
    CategoricalComparison, Comparison, MultiselectComparison, NumericComparison, PlotRequest,
};
use survey_cli::pipeline::EncodeResult;
use survey_model::RuleStatus;
use survey_stats::{McarReport, McarVerdict, TestResult};

/// Significance level used to highlight comparison p-values.
const ALPHA: f64 = 0.05;

pub fn print_encode_summary(result: &EncodeResult) {
    let outcome = &result.outcome;
    println!("Output: {}", result.output.display());
    if let Some(path) = &result.unmapped_report {
        println!("Unmapped report: {}", path.display());
    }
    if let Some(rows) = result.derived_ages {
        println!("Derived ages: {rows} rows");
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Question"),
        header_cell("Type"),
        header_cell("Status"),
        header_cell("Columns"),
        header_cell("Unmapped"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for rule in &outcome.rules {
        match &rule.status {
            RuleStatus::Applied(applied) => {
                table.add_row(vec![
                    Cell::new(&rule.question),
                    Cell::new(applied.kind.as_str()),
                    Cell::new("applied").fg(Color::Green),
                    Cell::new(applied.columns.len()),
                    count_cell(Some(applied.unmapped), Color::Yellow),
                ]);
            }
            RuleStatus::Skipped { reason } => {
                table.add_row(vec![
                    Cell::new(&rule.question),
                    dim_cell("-"),
                    Cell::new(format!("skipped: {reason}")).fg(Color::Yellow),
                    dim_cell("-"),
                    dim_cell("-"),
                ]);
            }
        }
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(format!(
            "{} applied, {} skipped",
            outcome.applied_count(),
            outcome.rules.len() - outcome.applied_count()
        ))
        .add_attribute(Attribute::Bold),
        dim_cell("-"),
        count_cell(Some(outcome.unmapped.total()), Color::Yellow),
    ]);
    println!("{table}");

    if !outcome.unmapped.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![header_cell("Question"), header_cell("Unmapped values")]);
        apply_table_style(&mut table);
        for question in outcome.unmapped.questions() {
            let values: Vec<&str> = outcome.unmapped.unique_values(question).into_iter().collect();
            table.add_row(vec![Cell::new(question), Cell::new(values.join(", "))]);
        }
        println!();
        println!("Unmapped answers:");
        println!("{table}");
    }
}

pub fn print_comparisons(comparisons: &[Comparison]) {
    for (index, comparison) in comparisons.iter().enumerate() {
        if index > 0 {
            println!();
        }
        match comparison {
            Comparison::MissingColumn { column } => {
                println!("Column not found: {column}");
            }
            Comparison::Unreadable { column, message } => {
                println!("Column could not be read: {column} ({message})");
            }
            Comparison::Multiselect(result) => print_multiselect(result),
            Comparison::Numeric(result) => print_numeric(result),
            Comparison::Categorical(result) => print_categorical(result),
        }
        print_plots(comparison.plots());
    }
}

fn print_multiselect(result: &MultiselectComparison) {
    println!("{} (multiselect) by {}", result.question, result.target);
    let mut header = vec![header_cell("Option")];
    header.extend(
        result
            .groups
            .iter()
            .map(|group| header_cell(&format!("{} = {group}", result.target))),
    );
    let mut table = Table::new();
    table.set_header(header);
    apply_table_style(&mut table);
    for column in 1..=result.groups.len() {
        align_column(&mut table, column, CellAlignment::Right);
    }
    for option in &result.options {
        let mut row = vec![Cell::new(&option.option)];
        row.extend(option.rates.iter().map(|rate| match rate {
            Some(rate) => Cell::new(format!("{:.1}%", rate * 100.0)),
            None => dim_cell("-"),
        }));
        table.add_row(row);
    }
    println!("{table}");
}

fn print_numeric(result: &NumericComparison) {
    let scale = if result.discrete { "ordinal" } else { "numeric" };
    println!("{} ({scale}) by {}", result.question, result.target);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Group"),
        header_cell("Count"),
        header_cell("Mean"),
        header_cell("Std"),
        header_cell("Min"),
        header_cell("Q1"),
        header_cell("Median"),
        header_cell("Q3"),
        header_cell("Max"),
    ]);
    apply_table_style(&mut table);
    for column in 1..9 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    for summary in &result.groups {
        let group = Cell::new(format!("{} = {}", result.target, summary.group));
        let Some(stats) = &summary.stats else {
            let mut row = vec![group, Cell::new(0)];
            row.extend((0..7).map(|_| dim_cell("-")));
            table.add_row(row);
            continue;
        };
        table.add_row(vec![
            group,
            Cell::new(stats.count),
            number_cell(stats.mean),
            stats.std_dev.map_or_else(|| dim_cell("-"), number_cell),
            number_cell(stats.min),
            number_cell(stats.q25),
            number_cell(stats.median),
            number_cell(stats.q75),
            number_cell(stats.max),
        ]);
    }
    println!("{table}");
    match &result.test {
        Some(test) => print_test(test),
        None => println!("Mann-Whitney U: not computed (a target group is empty)"),
    }
}

fn print_categorical(result: &CategoricalComparison) {
    println!("{} (categorical) by {}", result.question, result.target);
    let table_data = &result.table;
    let mut header = vec![header_cell("Answer")];
    header.extend(
        table_data
            .column_labels()
            .iter()
            .map(|label| header_cell(&format!("{} = {label}", result.target))),
    );
    header.push(header_cell("Total"));
    let mut table = Table::new();
    table.set_header(header);
    apply_table_style(&mut table);
    for column in 1..=table_data.column_labels().len() + 1 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    let percentages = table_data.row_percentages();
    for ((label, counts), (shares, total)) in table_data
        .row_labels()
        .iter()
        .zip(table_data.counts())
        .zip(percentages.iter().zip(table_data.row_totals()))
    {
        let mut row = vec![Cell::new(label)];
        row.extend(
            counts
                .iter()
                .zip(shares)
                .map(|(count, share)| Cell::new(format!("{count} ({share:.1}%)"))),
        );
        row.push(Cell::new(total).add_attribute(Attribute::Bold));
        table.add_row(row);
    }
    println!("{table}");
    if result.low_expected {
        println!(
            "Some expected counts are below 5; chi-squared p = {:.4}",
            result.chi_squared.p_value
        );
    }
    print_test(&result.test);
}

fn print_test(test: &TestResult) {
    let dof = test
        .dof
        .map(|dof| format!(", dof = {dof}"))
        .unwrap_or_default();
    let verdict = if test.is_significant(ALPHA) {
        "significant"
    } else {
        "not significant"
    };
    println!(
        "{}: statistic = {:.4}{dof}, p = {:.4} ({verdict} at {ALPHA})",
        test.kind, test.statistic, test.p_value
    );
}

fn print_plots(plots: &[PlotRequest]) {
    for plot in plots {
        println!("Plot ({}): {}", plot.kind_name(), plot.title());
    }
}

pub fn print_distribution(plot: &PlotRequest) {
    println!("{}", plot.title());
    let PlotRequest::Distribution { counts, .. } = plot else {
        return;
    };
    let total: usize = counts.iter().map(|(_, count)| count).sum();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Value"),
        header_cell("Count"),
        header_cell("Share"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for (value, count) in counts {
        let share = if total == 0 {
            0.0
        } else {
            *count as f64 * 100.0 / total as f64
        };
        table.add_row(vec![
            Cell::new(value),
            Cell::new(count),
            Cell::new(format!("{share:.1}%")),
        ]);
    }
    println!("{table}");
}

pub fn print_mcar(report: Option<&McarReport>) {
    let Some(report) = report else {
        println!("Fewer than two missingness patterns; MCAR test not applicable.");
        return;
    };
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Pattern"),
        header_cell("Rows"),
        header_cell("Expected"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for pattern in &report.patterns {
        table.add_row(vec![
            Cell::new(&pattern.mask),
            Cell::new(pattern.rows),
            number_cell(report.expected),
        ]);
    }
    println!("{table}");
    println!(
        "Chi-squared = {:.4}, dof = {}, p = {:.4}",
        report.statistic, report.dof, report.p_value
    );
    match report.verdict {
        McarVerdict::Mcar => println!("Data is MCAR (p >= {})", report.alpha),
        McarVerdict::NotMcar => println!("Data is not MCAR (p < {})", report.alpha),
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(165);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: Option<usize>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

fn number_cell(value: f64) -> Cell {
    Cell::new(format!("{value:.2}"))
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: Display>(value: T) -> Cell {
    Cell::new(value.to_string()).add_attribute(Attribute::Dim)
}
