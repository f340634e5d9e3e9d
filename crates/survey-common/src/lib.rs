//! Shared utilities for the survey crates.
//!
//! This crate provides the Polars cell helpers used by the encoding engine,
//! the comparator and the CLI: rendering cells as text, reading columns as
//! numbers, and classifying column dtypes.

pub mod cells;

pub use cells::{
    any_to_f64, any_to_text, column_display_values, column_f64_values, column_text_values,
    format_numeric, is_numeric_dtype, parse_f64,
};
