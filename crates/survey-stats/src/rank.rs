//! Mann–Whitney U rank-sum test.

use crate::special::normal_sf;
use crate::test_result::{TestKind, TestResult};

/// Largest sample size for which the exact U distribution is used.
const EXACT_MAX_SIZE: usize = 8;

/// Ranks of `values` (1-based), ties sharing the mean of their positions.
///
/// Also returns `Σ(t³ − t)` over tie groups of size `t`.
fn midranks(values: &[f64]) -> (Vec<f64>, f64) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut tie_term = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // Positions start+1..=end share their mean rank.
        let rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        let t = (end - start) as f64;
        tie_term += t * t * t - t;
        start = end;
    }
    (ranks, tie_term)
}

/// Number of orderings giving each value of U, for samples of `m` and `n`.
///
/// Coefficients of the Gaussian binomial `∏ (1 − q^{n+i}) / (1 − q^i)`,
/// kept as floats so large samples do not overflow.
fn u_frequencies(m: usize, n: usize) -> Vec<f64> {
    let mut coefficients = vec![0.0; m * n + 1];
    coefficients[0] = 1.0;
    for i in 1..=m {
        let shift = n + i;
        for u in (shift..coefficients.len()).rev() {
            coefficients[u] -= coefficients[u - shift];
        }
        for u in i..coefficients.len() {
            coefficients[u] += coefficients[u - i];
        }
    }
    coefficients
}

fn exact_p_value(u_max: f64, m: usize, n: usize) -> f64 {
    let frequencies = u_frequencies(m, n);
    let total: f64 = frequencies.iter().sum();
    let start = u_max.ceil() as usize;
    let upper_tail: f64 = frequencies.iter().skip(start).sum();
    (2.0 * upper_tail / total).min(1.0)
}

fn asymptotic_p_value(u_max: f64, m: f64, n: f64, tie_term: f64) -> f64 {
    let total = m + n;
    let variance = m * n / 12.0 * ((total + 1.0) - tie_term / (total * (total - 1.0)));
    if variance <= 0.0 {
        // Every observation tied.
        return 1.0;
    }
    let z = (u_max - m * n / 2.0 - 0.5) / variance.sqrt();
    (2.0 * normal_sf(z)).clamp(0.0, 1.0)
}

/// Two-sided Mann–Whitney U test between samples `x` and `y`.
///
/// NaNs are dropped. The exact distribution is used when either sample has
/// at most 8 values and there are no ties; otherwise the normal
/// approximation with tie and continuity correction. The reported statistic
/// is the U of `x`.
///
/// Returns `None` when either sample is empty.
pub fn mann_whitney_u(x: &[f64], y: &[f64]) -> Option<TestResult> {
    let x: Vec<f64> = x.iter().copied().filter(|v| !v.is_nan()).collect();
    let y: Vec<f64> = y.iter().copied().filter(|v| !v.is_nan()).collect();
    if x.is_empty() || y.is_empty() {
        return None;
    }

    let (m, n) = (x.len(), y.len());
    let combined: Vec<f64> = x.iter().chain(&y).copied().collect();
    let (ranks, tie_term) = midranks(&combined);

    let rank_sum_x: f64 = ranks[..m].iter().sum();
    let (mf, nf) = (m as f64, n as f64);
    let u_x = rank_sum_x - mf * (mf + 1.0) / 2.0;
    let u_max = u_x.max(mf * nf - u_x);

    let p_value = if (m <= EXACT_MAX_SIZE || n <= EXACT_MAX_SIZE) && tie_term == 0.0 {
        exact_p_value(u_max, m, n)
    } else {
        asymptotic_p_value(u_max, mf, nf, tie_term)
    };

    Some(TestResult {
        kind: TestKind::MannWhitneyU,
        statistic: u_x,
        p_value,
        dof: None,
    })
}
