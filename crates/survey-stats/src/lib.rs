//! Statistics for exploring encoded survey data.
//!
//! - [`descriptive`]: per-group summaries with pandas-style quartiles
//! - [`special`]: gamma-family special functions and distribution tails
//! - [`rank`]: Mann–Whitney U rank-sum test
//! - [`contingency`]: contingency tables with χ², G and Fisher exact tests
//! - [`missing`]: missingness-pattern test for MCAR
//!
//! # Examples
//!
//! ```
//! use survey_stats::descriptive::DescriptiveStats;
//!
//! let stats = DescriptiveStats::new([1.0, 2.0, 3.0, 4.0]).unwrap();
//! assert_eq!(stats.median, 2.5);
//! ```
//!
//! ```
//! use survey_stats::rank::mann_whitney_u;
//!
//! let result = mann_whitney_u(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
//! assert_eq!(result.statistic, 0.0);
//! assert!((result.p_value - 0.1).abs() < 1e-12);
//! ```

pub mod contingency;
pub mod descriptive;
pub mod missing;
pub mod rank;
pub mod special;
mod test_result;

pub use contingency::{ContingencyTable, chi_squared, compare_labels, fisher_exact, g_test};
pub use descriptive::{DescriptiveStats, percentile};
pub use missing::{McarReport, McarVerdict, MissingPattern, test_missing_mcar};
pub use rank::mann_whitney_u;
pub use test_result::{TestKind, TestResult};
