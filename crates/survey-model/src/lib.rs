//! Data model for survey encoding.
//!
//! - [`QuestionRule`]: one rule exactly as written in the schema document
//! - [`EncodingRule`]: a validated rule, one variant per question kind
//! - [`Schema`]: the ordered rule list
//! - [`RuleOutcome`]: what happened when a rule was applied
//! - [`UnmappedReport`] / [`IndicatorRegistry`]: per-call accumulators

pub mod code;
pub mod enums;
pub mod error;
pub mod outcome;
pub mod report;
pub mod rule;
pub mod schema;

pub use code::{Code, CodeKind, Encoding};
pub use enums::RuleKind;
pub use error::RuleError;
pub use outcome::{AppliedRule, RuleOutcome, RuleStatus, SkipReason};
pub use report::{IndicatorRegistry, UnmappedReport};
pub use rule::{EncodingRule, QuestionRule};
pub use schema::Schema;

/// Separator placed between a question and an option code in indicator column names.
pub const INDICATOR_SEPARATOR: &str = "__";

/// Separator between selected options inside a multiselect cell.
pub const MULTISELECT_DELIMITER: &str = ", ";

/// Builds the indicator column name for a multiselect option.
///
/// ```
/// assert_eq!(survey_model::indicator_column("Lugar", "A"), "Lugar__A");
/// ```
pub fn indicator_column(question: &str, code: &str) -> String {
    format!("{question}{INDICATOR_SEPARATOR}{code}")
}
