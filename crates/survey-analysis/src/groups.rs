use polars::prelude::*;
use survey_common::column_display_values;
use survey_stats::compare_labels;

/// Row indices of each distinct target value. Null targets belong to no group.
pub(crate) struct TargetGroups {
    /// Per-row target label.
    pub row_labels: Vec<Option<String>>,
    groups: Vec<(String, Vec<usize>)>,
}

impl TargetGroups {
    pub fn from_column(column: &Column) -> PolarsResult<Self> {
        let row_labels = column_display_values(column)?;
        let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
        for (idx, label) in row_labels.iter().enumerate() {
            let Some(label) = label else { continue };
            match groups.iter_mut().find(|(existing, _)| existing == label) {
                Some((_, rows)) => rows.push(idx),
                None => groups.push((label.clone(), vec![idx])),
            }
        }
        groups.sort_by(|(a, _), (b, _)| compare_labels(a, b));
        Ok(Self { row_labels, groups })
    }

    pub fn labels(&self) -> Vec<String> {
        self.groups.iter().map(|(label, _)| label.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.groups
            .iter()
            .map(|(label, rows)| (label.as_str(), rows.as_slice()))
    }

    pub fn rows(&self, label: &str) -> &[usize] {
        self.groups
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, rows)| rows.as_slice())
            .unwrap_or_default()
    }
}

/// Non-null values at `rows`.
pub(crate) fn values_at(values: &[Option<f64>], rows: &[usize]) -> Vec<f64> {
    rows.iter().filter_map(|&idx| values[idx]).collect()
}
