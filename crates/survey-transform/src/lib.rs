//! Survey encoding engine.
//!
//! This crate applies an encoding [`Schema`](survey_model::Schema) to a raw
//! survey table:
//!
//! - **engine**: rule dispatch and the per-call [`EncodingOutcome`]
//! - **executors**: column-level lookup encoding and multiselect expansion
//! - **reporting**: rule diagnostics and the unmapped-value audit
//! - **age**: age derivation from `dd/mm/yyyy` birth dates

pub mod age;
pub mod engine;
pub mod error;
pub mod executors;
pub mod options;
pub mod reporting;

pub use age::{BIRTH_DATE_FORMAT, calculate_age, derive_age_column};
pub use engine::{EncodingOutcome, process_survey_data};
pub use error::{Result, TransformError};
pub use options::{DEFAULT_UNMAPPED_REPORT, EncodingOptions};
