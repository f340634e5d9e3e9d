//! Options for an encoding run.

use std::path::PathBuf;

/// Default location of the unmapped-value audit file.
pub const DEFAULT_UNMAPPED_REPORT: &str = "unmapped_values.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingOptions {
    /// Log a per-question summary of unmapped answers and write the audit file.
    ///
    /// The report is returned in the outcome whether or not this is set.
    pub log_unmapped: bool,

    /// Where the audit file goes. Written only when something was unmapped.
    pub unmapped_path: PathBuf,
}

impl Default for EncodingOptions {
    fn default() -> Self {
        Self {
            log_unmapped: true,
            unmapped_path: PathBuf::from(DEFAULT_UNMAPPED_REPORT),
        }
    }
}

impl EncodingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_log_unmapped(mut self, enable: bool) -> Self {
        self.log_unmapped = enable;
        self
    }

    #[must_use]
    pub fn with_unmapped_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.unmapped_path = path.into();
        self
    }
}
