use std::path::PathBuf;

/// Structural failures while loading a schema document.
///
/// Problems inside individual rules are not errors here; they surface as
/// skipped rules when the schema is applied.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("schema file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read schema file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse schema {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },
}

impl SchemaError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;
