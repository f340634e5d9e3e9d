//! Survey data ingestion and export.
//!
//! - **Raw tables**: the untouched questionnaire export, read with every
//!   column as text so answers such as `"1"` are looked up verbatim
//! - **Processed tables**: encoded output, read with dtype inference so that
//!   numeric codes come back as numbers
//! - **Artifacts**: pretty-printed JSON side files such as the unmapped-value audit
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use survey_ingest::{read_raw_survey, write_csv};
//!
//! let mut df = read_raw_survey(Path::new("data/raw/encuesta.csv"))?;
//! write_csv(&mut df, Path::new("data/processed/encuesta_codificada.csv"))?;
//! ```

mod csv;
mod error;
mod json;

pub use csv::{
    TableKind, read_processed_survey, read_raw_survey, read_survey_table,
    validate_dataframe_shape, validate_encoding, write_csv,
};
pub use error::{IngestError, Result};
pub use json::write_json_pretty;
