use polars::prelude::PolarsError;
use survey_ingest::IngestError;
use thiserror::Error;

/// Unrecoverable failures of an encoding run.
///
/// Schema gaps and unmapped answers are not errors; they are reported
/// through rule outcomes and the unmapped-value report.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("column '{column}' not found")]
    ColumnNotFound { column: String },

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error("failed to persist unmapped values: {0}")]
    Artifact(#[from] IngestError),
}

pub type Result<T> = std::result::Result<T, TransformError>;
