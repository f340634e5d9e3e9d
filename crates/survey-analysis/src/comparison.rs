use survey_stats::{ContingencyTable, DescriptiveStats, TestResult};

use crate::plot::PlotRequest;

/// Result of comparing one question against the target.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    /// The target or the question is not in the table.
    MissingColumn { column: String },
    /// A column exists but its values could not be read.
    Unreadable { column: String, message: String },
    Multiselect(MultiselectComparison),
    Numeric(NumericComparison),
    Categorical(CategoricalComparison),
}

impl Comparison {
    pub fn plots(&self) -> &[PlotRequest] {
        match self {
            Comparison::MissingColumn { .. } | Comparison::Unreadable { .. } => &[],
            Comparison::Multiselect(c) => &c.plots,
            Comparison::Numeric(c) => &c.plots,
            Comparison::Categorical(c) => &c.plots,
        }
    }

    /// The hypothesis test reported for this comparison, if any.
    pub fn test(&self) -> Option<&TestResult> {
        match self {
            Comparison::Numeric(c) => c.test.as_ref(),
            Comparison::Categorical(c) => Some(&c.test),
            _ => None,
        }
    }
}

/// Selection rate of one multiselect option in each target group.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionRates {
    /// Indicator column name.
    pub column: String,
    /// Option code, the part after the `__` separator.
    pub option: String,
    /// Mean of the indicator per group, aligned with
    /// [`MultiselectComparison::groups`]. `None` when the group has no values.
    pub rates: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiselectComparison {
    pub question: String,
    pub target: String,
    /// Target values, sorted.
    pub groups: Vec<String>,
    pub options: Vec<OptionRates>,
    pub plots: Vec<PlotRequest>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub group: String,
    /// `None` when the group has no non-null values.
    pub stats: Option<DescriptiveStats>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumericComparison {
    pub question: String,
    pub target: String,
    pub groups: Vec<GroupSummary>,
    /// Integral values with few enough levels to chart as an ordinal scale.
    pub discrete: bool,
    /// Mann–Whitney U between target 0 and 1. `None` when a group is empty.
    pub test: Option<TestResult>,
    pub plots: Vec<PlotRequest>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalComparison {
    pub question: String,
    pub target: String,
    /// Answer × target counts.
    pub table: ContingencyTable,
    pub chi_squared: TestResult,
    /// Some expected count is below 5.
    pub low_expected: bool,
    /// The test reported: χ², or Fisher / G when expected counts are low.
    pub test: TestResult,
    pub plots: Vec<PlotRequest>,
}
