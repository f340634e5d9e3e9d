//! CSV reading and writing for survey tables.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use polars::prelude::*;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

const BOM: char = '\u{feff}';

/// How column types are determined when reading a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Every column is read as text.
    Raw,
    /// Column types are inferred from the whole file.
    Processed,
}

fn open_error(path: &Path, e: std::io::Error) -> IngestError {
    if e.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        }
    }
}

/// Rejects UTF-16 files; a UTF-8 BOM is accepted.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| open_error(path, e))?;
    let mut buffer = [0u8; 2];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes_read == 0 {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    if bytes_read == 2 {
        if buffer == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if buffer == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }
    Ok(())
}

/// Checks that a loaded table has rows and named columns.
pub fn validate_dataframe_shape(df: &DataFrame, path: &Path) -> Result<()> {
    if df.height() == 0 {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    if df.width() > 500 {
        warn!(
            path = %path.display(),
            columns = df.width(),
            "survey has more than 500 columns"
        );
    }

    for name in df.get_column_names() {
        if name.trim().is_empty() {
            return Err(IngestError::EmptyColumnName {
                path: path.to_path_buf(),
            });
        }
    }

    Ok(())
}

/// Reads a survey table from CSV.
pub fn read_survey_table(path: &Path, kind: TableKind) -> Result<DataFrame> {
    validate_encoding(path)?;

    let infer_schema_length = match kind {
        TableKind::Raw => Some(0),
        TableKind::Processed => None,
    };
    let parse_error = |e: PolarsError| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(infer_schema_length)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(parse_error)?
        .finish()
        .map_err(parse_error)?;

    strip_header_bom(&mut df)?;
    validate_dataframe_shape(&df, path)?;

    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        ?kind,
        "read survey table"
    );
    Ok(df)
}

/// Reads the raw questionnaire export; every column is text.
pub fn read_raw_survey(path: &Path) -> Result<DataFrame> {
    read_survey_table(path, TableKind::Raw)
}

/// Reads an encoded survey with inferred column types.
pub fn read_processed_survey(path: &Path) -> Result<DataFrame> {
    read_survey_table(path, TableKind::Processed)
}

fn strip_header_bom(df: &mut DataFrame) -> Result<()> {
    let Some(first) = df.get_column_names().first().map(|name| name.to_string()) else {
        return Ok(());
    };
    if let Some(stripped) = first.strip_prefix(BOM) {
        df.rename(&first, stripped.into())?;
    }
    Ok(())
}

/// Writes a DataFrame as CSV with a header row, creating parent directories.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| IngestError::FileWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let mut file = File::create(path).map_err(|e| IngestError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .map_err(|e| IngestError::CsvWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "wrote survey table"
    );
    Ok(())
}
