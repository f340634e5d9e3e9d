use thiserror::Error;

/// Reasons a schema rule cannot be turned into an [`EncodingRule`](crate::EncodingRule).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("rule has no question")]
    MissingQuestion,
    #[error("rule has no type")]
    MissingKind,
    #[error("unknown question type '{0}'")]
    UnknownKind(String),
    #[error("encoding is not a mapping of scalar answers to codes")]
    MalformedEncoding,
    #[error("encoding entry '{key}' has no code")]
    MissingCode { key: String },
    #[error("no encoding defined")]
    MissingEncoding,
}
