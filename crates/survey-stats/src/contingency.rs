//! Contingency tables and tests of independence.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::special::{chi_squared_sf, ln_factorial};
use crate::test_result::{TestKind, TestResult};

/// Relative tolerance used when comparing hypergeometric probabilities.
const FISHER_RELATIVE_TOLERANCE: f64 = 1e-7;

/// Expected count below which the χ² approximation is considered unreliable.
pub const MIN_EXPECTED_COUNT: f64 = 5.0;

/// Orders category labels: numeric labels first by value, then text labels.
///
/// ```
/// use std::cmp::Ordering;
/// use survey_stats::contingency::compare_labels;
///
/// assert_eq!(compare_labels("2", "10"), Ordering::Less);
/// assert_eq!(compare_labels("10", "Casa"), Ordering::Less);
/// assert_eq!(compare_labels("Biblioteca", "Casa"), Ordering::Less);
/// ```
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Cross-tabulated counts of two categorical variables.
///
/// Rows and columns are labelled; see [`compare_labels`] for their order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContingencyTable {
    row_labels: Vec<String>,
    column_labels: Vec<String>,
    counts: Vec<Vec<u64>>,
}

impl ContingencyTable {
    /// Builds a table from observation pairs `(row, column)`.
    ///
    /// Labels are ordered by [`compare_labels`].
    pub fn from_pairs<I, R, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (R, C)>,
        R: Into<String>,
        C: Into<String>,
    {
        let mut cells: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();
        let mut columns = BTreeSet::new();
        for (row, column) in pairs {
            let column = column.into();
            *cells
                .entry(row.into())
                .or_default()
                .entry(column.clone())
                .or_default() += 1;
            columns.insert(column);
        }

        let mut column_labels: Vec<String> = columns.into_iter().collect();
        column_labels.sort_by(|a, b| compare_labels(a, b));
        let mut row_labels: Vec<String> = cells.keys().cloned().collect();
        row_labels.sort_by(|a, b| compare_labels(a, b));

        let counts = row_labels
            .iter()
            .map(|row| {
                column_labels
                    .iter()
                    .map(|column| {
                        cells
                            .get(row)
                            .and_then(|row_cells| row_cells.get(column))
                            .copied()
                            .unwrap_or(0)
                    })
                    .collect()
            })
            .collect();

        Self {
            row_labels,
            column_labels,
            counts,
        }
    }

    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    pub fn column_labels(&self) -> &[String] {
        &self.column_labels
    }

    pub fn counts(&self) -> &[Vec<u64>] {
        &self.counts
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.row_labels.len(), self.column_labels.len())
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    pub fn row_totals(&self) -> Vec<u64> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn column_totals(&self) -> Vec<u64> {
        (0..self.column_labels.len())
            .map(|j| self.counts.iter().map(|row| row[j]).sum())
            .collect()
    }

    /// Expected counts under independence.
    pub fn expected(&self) -> Vec<Vec<f64>> {
        let total = self.total() as f64;
        let column_totals = self.column_totals();
        self.row_totals()
            .into_iter()
            .map(|row_total| {
                column_totals
                    .iter()
                    .map(|&column_total| {
                        if total == 0.0 {
                            0.0
                        } else {
                            row_total as f64 * column_total as f64 / total
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// Whether any expected count falls below [`MIN_EXPECTED_COUNT`].
    pub fn has_low_expected(&self) -> bool {
        self.expected()
            .iter()
            .flatten()
            .any(|&e| e < MIN_EXPECTED_COUNT)
    }

    /// Each row as percentages of its total.
    pub fn row_percentages(&self) -> Vec<Vec<f64>> {
        self.counts
            .iter()
            .map(|row| {
                let total: u64 = row.iter().sum();
                row.iter()
                    .map(|&count| {
                        if total == 0 {
                            0.0
                        } else {
                            count as f64 * 100.0 / total as f64
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// Degrees of freedom for a test of independence.
    pub fn dof(&self) -> usize {
        let (rows, columns) = self.shape();
        rows.saturating_sub(1) * columns.saturating_sub(1)
    }

    /// The four counts of a 2×2 table, row-major.
    pub fn as_2x2(&self) -> Option<[[u64; 2]; 2]> {
        match self.counts.as_slice() {
            [top, bottom] if top.len() == 2 && bottom.len() == 2 => {
                Some([[top[0], top[1]], [bottom[0], bottom[1]]])
            }
            _ => None,
        }
    }
}

/// Pearson χ² test of independence.
///
/// Yates' continuity correction is applied when there is one degree of
/// freedom. With zero degrees of freedom the statistic is 0 and p is 1.
pub fn chi_squared(table: &ContingencyTable) -> TestResult {
    let dof = table.dof();
    if dof == 0 {
        return TestResult {
            kind: TestKind::ChiSquared,
            statistic: 0.0,
            p_value: 1.0,
            dof: Some(0),
        };
    }

    let yates = dof == 1;
    let mut statistic = 0.0;
    for (observed_row, expected_row) in table.counts.iter().zip(table.expected()) {
        for (&observed, expected) in observed_row.iter().zip(expected_row) {
            if expected == 0.0 {
                continue;
            }
            let mut observed = observed as f64;
            if yates {
                let difference = expected - observed;
                observed += difference.signum() * difference.abs().min(0.5);
            }
            statistic += (observed - expected).powi(2) / expected;
        }
    }

    TestResult {
        kind: if yates {
            TestKind::ChiSquaredYates
        } else {
            TestKind::ChiSquared
        },
        statistic,
        p_value: chi_squared_sf(statistic, dof),
        dof: Some(dof),
    }
}

/// Log-likelihood ratio (G) test of independence.
pub fn g_test(table: &ContingencyTable) -> TestResult {
    let dof = table.dof();
    let mut statistic = 0.0;
    if dof > 0 {
        for (observed_row, expected_row) in table.counts.iter().zip(table.expected()) {
            for (&observed, expected) in observed_row.iter().zip(expected_row) {
                if observed > 0 && expected > 0.0 {
                    let observed = observed as f64;
                    statistic += observed * (observed / expected).ln();
                }
            }
        }
        statistic *= 2.0;
    }

    TestResult {
        kind: TestKind::GTest,
        statistic,
        p_value: chi_squared_sf(statistic, dof),
        dof: Some(dof),
    }
}

fn ln_choose(n: u64, k: u64) -> f64 {
    ln_factorial(n) - ln_factorial(k) - ln_factorial(n - k)
}

/// Two-sided Fisher exact test on a 2×2 table.
///
/// The p-value sums the probabilities of every table with the same margins
/// that is no more likely than the observed one. The statistic is the
/// sample odds ratio `(a·d)/(b·c)`.
pub fn fisher_exact(table: &[[u64; 2]; 2]) -> TestResult {
    let [[a, b], [c, d]] = *table;
    let odds_ratio = if b * c == 0 {
        if a * d == 0 { f64::NAN } else { f64::INFINITY }
    } else {
        (a * d) as f64 / (b * c) as f64
    };

    let row1 = a + b;
    let col1 = a + c;
    let total = a + b + c + d;
    if row1 == 0 || col1 == 0 || row1 == total || col1 == total {
        return TestResult {
            kind: TestKind::FisherExact,
            statistic: odds_ratio,
            p_value: 1.0,
            dof: None,
        };
    }

    let ln_denominator = ln_choose(total, row1);
    let probability =
        |x: u64| (ln_choose(col1, x) + ln_choose(total - col1, row1 - x) - ln_denominator).exp();

    let observed = probability(a);
    let threshold = observed * (1.0 + FISHER_RELATIVE_TOLERANCE);
    let low = (row1 + col1).saturating_sub(total);
    let high = row1.min(col1);
    let p_value: f64 = (low..=high)
        .map(probability)
        .filter(|&p| p <= threshold)
        .sum();

    TestResult {
        kind: TestKind::FisherExact,
        statistic: odds_ratio,
        p_value: p_value.min(1.0),
        dof: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-9
    }

    fn table(counts: &[(&str, &str, usize)]) -> ContingencyTable {
        ContingencyTable::from_pairs(
            counts
                .iter()
                .flat_map(|&(row, column, n)| std::iter::repeat_n((row, column), n)),
        )
    }

    #[test]
    fn test_from_pairs_sorts_labels() {
        let t = ContingencyTable::from_pairs([("b", "1"), ("a", "0"), ("a", "1")]);
        assert_eq!(t.row_labels(), ["a", "b"]);
        assert_eq!(t.column_labels(), ["0", "1"]);
        assert_eq!(t.counts(), [vec![1, 1], vec![0, 1]]);
        assert_eq!(t.total(), 3);
    }

    #[test]
    fn test_numeric_labels_sort_by_value() {
        let t = ContingencyTable::from_pairs([("10", "0"), ("2", "0"), ("1", "1")]);
        assert_eq!(t.row_labels(), ["1", "2", "10"]);
    }

    #[test]
    fn test_expected_and_percentages() {
        let t = table(&[("x", "0", 10), ("x", "1", 20), ("y", "0", 30), ("y", "1", 40)]);
        assert_eq!(t.expected(), vec![vec![12.0, 18.0], vec![28.0, 42.0]]);
        assert!(!t.has_low_expected());
        let pct = t.row_percentages();
        assert!(close(pct[0][1], 200.0 / 3.0));
    }

    #[test]
    fn test_chi_squared_with_yates() {
        let t = table(&[("x", "0", 10), ("x", "1", 20), ("y", "0", 30), ("y", "1", 40)]);
        let result = chi_squared(&t);
        assert_eq!(result.kind, TestKind::ChiSquaredYates);
        assert_eq!(result.dof, Some(1));
        assert!(close(result.statistic, 0.446_428_571_428_571_4));
        assert!(close(result.p_value, 0.504_035_866_452_504_8));
    }

    #[test]
    fn test_chi_squared_without_yates() {
        let t = table(&[
            ("a", "0", 10),
            ("a", "1", 20),
            ("b", "0", 20),
            ("b", "1", 20),
            ("c", "0", 30),
            ("c", "1", 10),
        ]);
        let result = chi_squared(&t);
        assert_eq!(result.kind, TestKind::ChiSquared);
        assert_eq!(result.dof, Some(2));
        assert!(close(result.statistic, 12.527_777_777_777_78));
        assert!(close(result.p_value, 0.001_903_827_607_695_494));
    }

    #[test]
    fn test_chi_squared_single_column() {
        let t = table(&[("a", "1", 3), ("b", "1", 4)]);
        let result = chi_squared(&t);
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);
        assert_eq!(result.dof, Some(0));
    }

    #[test]
    fn test_g_test() {
        let t = table(&[
            ("a", "0", 10),
            ("a", "1", 20),
            ("b", "0", 20),
            ("b", "1", 20),
            ("c", "0", 30),
            ("c", "1", 10),
        ]);
        let result = g_test(&t);
        assert_eq!(result.kind, TestKind::GTest);
        assert!(close(result.statistic, 12.952_596_352_875_817));
        assert!(close(result.p_value, 0.001_539_499_098_102_371_2));
    }

    #[test]
    fn test_fisher_exact_reference() {
        let result = fisher_exact(&[[8, 2], [1, 5]]);
        assert_eq!(result.statistic, 20.0);
        assert!(close(result.p_value, 0.034_965_034_965_034_96));

        let symmetric = fisher_exact(&[[3, 1], [1, 3]]);
        assert!(close(symmetric.p_value, 0.485_714_285_714_285_7));
    }

    #[test]
    fn test_fisher_exact_degenerate_margins() {
        let result = fisher_exact(&[[0, 0], [3, 4]]);
        assert_eq!(result.p_value, 1.0);
        assert!(result.statistic.is_nan());
    }

    #[test]
    fn test_as_2x2() {
        let t = table(&[("x", "0", 1), ("x", "1", 2), ("y", "0", 3), ("y", "1", 4)]);
        assert_eq!(t.as_2x2(), Some([[1, 2], [3, 4]]));
        let wide = table(&[("x", "0", 1), ("y", "1", 1), ("z", "1", 1)]);
        assert_eq!(wide.as_2x2(), None);
    }
}
