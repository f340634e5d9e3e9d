//! Question kinds recognized by the encoding engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of a survey question, as declared by the `type` field of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Two-valued answer (e.g. "Sí"/"No") mapped to an integer code.
    Binary,
    /// Ordered scale mapped to integer levels.
    Ordinal,
    /// Single-select free label mapped to a code, or left as-is.
    Categorical,
    /// Comma-separated selections expanded to one indicator column per option.
    Multiselect,
}

impl RuleKind {
    /// Returns the name used in schema documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Binary => "binary",
            RuleKind::Ordinal => "ordinal",
            RuleKind::Categorical => "categorical",
            RuleKind::Multiselect => "multiselect",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = String;

    /// Parses a kind name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "binary" => Ok(RuleKind::Binary),
            "ordinal" => Ok(RuleKind::Ordinal),
            "categorical" => Ok(RuleKind::Categorical),
            "multiselect" => Ok(RuleKind::Multiselect),
            _ => Err(format!("Unknown question type: {s}")),
        }
    }
}
