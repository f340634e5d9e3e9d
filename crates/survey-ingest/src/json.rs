//! JSON side artifacts.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Writes `value` as pretty-printed UTF-8 JSON, creating parent directories.
///
/// Non-ASCII text is written as-is, not escaped.
pub fn write_json_pretty<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let write_error = |e: std::io::Error| IngestError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    let file = File::create(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| IngestError::JsonWrite {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(write_error)?;
    debug!(path = %path.display(), "wrote JSON artifact");
    Ok(())
}
