//! Exploratory comparison of survey questions against a binary target.
//!
//! [`explore_relationship`] picks an analysis from the shape of the encoded
//! data: indicator columns, a numeric column, or a categorical one. It never
//! mutates the table and never fails on data conditions; missing columns are
//! reported as [`Comparison::MissingColumn`].
//!
//! Charts are not drawn here. Each comparison carries [`PlotRequest`]s
//! describing what to render.

mod comparison;
mod distribution;
mod explore;
mod groups;
mod plot;

pub use comparison::{
    CategoricalComparison, Comparison, GroupSummary, MultiselectComparison, NumericComparison,
    OptionRates,
};
pub use distribution::{distribution_plot, value_counts};
pub use explore::{MAX_ORDINAL_LEVELS, explore_relationship, multiselect_columns};
pub use plot::{PlotRequest, PlotSeries};
