/// Summary of one group of numeric answers.
///
/// Matches the columns of a pandas `describe()`: quartiles use linear
/// interpolation and the standard deviation is the sample estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1). `None` for a single value.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl DescriptiveStats {
    /// Computes statistics from unsorted values. NaNs are ignored.
    ///
    /// Returns `None` when no finite values remain.
    ///
    /// # Examples
    ///
    /// ```
    /// # use survey_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([4.0, 1.0, 3.0, 2.0]).unwrap();
    /// assert_eq!(stats.count, 4);
    /// assert_eq!(stats.q25, 1.75);
    /// assert_eq!(stats.max, 4.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes statistics from values already sorted ascending.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        debug_assert!(sorted_values.is_sorted_by(|a, b| a <= b));

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let n = count as f64;
        let mean = sorted_values.iter().sum::<f64>() / n;
        let std_dev = (count > 1).then(|| {
            let squares = sorted_values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
            (squares / (n - 1.0)).sqrt()
        });

        Some(Self {
            count,
            mean,
            std_dev,
            min,
            q25: percentile(sorted_values, 25.0)?,
            median: percentile(sorted_values, 50.0)?,
            q75: percentile(sorted_values, 75.0)?,
            max,
        })
    }
}

/// Percentile `p` (0–100) of sorted values, interpolating linearly between ranks.
///
/// # Examples
///
/// ```
/// use survey_stats::percentile;
///
/// assert_eq!(percentile(&[1.0, 2.0, 3.0, 4.0], 50.0), Some(2.5));
/// assert_eq!(percentile(&[], 50.0), None);
/// ```
pub fn percentile(sorted_values: &[f64], p: f64) -> Option<f64> {
    let last = sorted_values.len().checked_sub(1)?;
    let position = (p.clamp(0.0, 100.0) / 100.0) * last as f64;
    let lower = position.floor();
    let fraction = position - lower;
    let lower = lower as usize;
    let upper = (lower + 1).min(last);
    Some(sorted_values[lower] + (sorted_values[upper] - sorted_values[lower]) * fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_matches_pandas() {
        let stats = DescriptiveStats::new([1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, 2.5);
        assert!((stats.std_dev.unwrap() - 1.290_994_448_735_805_6).abs() < 1e-12);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.q25, 1.75);
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.q75, 3.25);
        assert_eq!(stats.max, 4.0);
    }

    #[test]
    fn test_single_value_has_no_std() {
        let stats = DescriptiveStats::new([7.0]).unwrap();
        assert_eq!(stats.std_dev, None);
        assert_eq!(stats.median, 7.0);
    }

    #[test]
    fn test_empty_and_nan_only() {
        assert!(DescriptiveStats::new(Vec::<f64>::new()).is_none());
        assert!(DescriptiveStats::new([f64::NAN]).is_none());
    }

    #[test]
    fn test_percentile_bounds() {
        let values = [10.0, 20.0, 30.0];
        assert_eq!(percentile(&values, 0.0), Some(10.0));
        assert_eq!(percentile(&values, 100.0), Some(30.0));
        assert_eq!(percentile(&values, 150.0), Some(30.0));
        assert_eq!(percentile(&values, 25.0), Some(15.0));
    }
}
