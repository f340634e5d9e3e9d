use std::fmt;

/// Which hypothesis test produced a [`TestResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestKind {
    MannWhitneyU,
    /// Pearson χ² of independence, without continuity correction.
    ChiSquared,
    /// Pearson χ² with Yates' continuity correction (1 degree of freedom).
    ChiSquaredYates,
    FisherExact,
    /// Log-likelihood ratio test of independence.
    GTest,
}

impl TestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestKind::MannWhitneyU => "Mann-Whitney U",
            TestKind::ChiSquared => "Chi-squared",
            TestKind::ChiSquaredYates => "Chi-squared (Yates)",
            TestKind::FisherExact => "Fisher exact",
            TestKind::GTest => "G-test",
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a two-sided hypothesis test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestResult {
    pub kind: TestKind,
    /// U for Mann–Whitney, χ² or G for table tests, the odds ratio for Fisher.
    pub statistic: f64,
    pub p_value: f64,
    /// Degrees of freedom, for tests with a χ² reference distribution.
    pub dof: Option<usize>,
}

impl TestResult {
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}
