//! Per-rule outcomes produced by the encoding engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::RuleKind;
use crate::error::RuleError;

/// Why a rule was not applied. None of these stop the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// The question column is not in the dataset.
    QuestionNotFound,
    /// The rule has no usable encoding yet.
    MissingEncoding,
    /// The `type` field names no known kind.
    UnknownKind(String),
    /// The rule itself is malformed.
    InvalidRule(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::QuestionNotFound => write!(f, "question not found in dataset"),
            SkipReason::MissingEncoding => write!(f, "no encoding defined"),
            SkipReason::UnknownKind(kind) => write!(f, "unknown question type '{kind}'"),
            SkipReason::InvalidRule(message) => write!(f, "invalid rule: {message}"),
        }
    }
}

impl From<RuleError> for SkipReason {
    fn from(error: RuleError) -> Self {
        match error {
            RuleError::MissingEncoding => SkipReason::MissingEncoding,
            RuleError::UnknownKind(kind) => SkipReason::UnknownKind(kind),
            other => SkipReason::InvalidRule(other.to_string()),
        }
    }
}

/// Summary of a rule that transformed the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedRule {
    pub kind: RuleKind,
    /// Cells that had no entry in the encoding.
    pub unmapped: usize,
    /// Columns written by the rule (the question itself, or its indicators).
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RuleStatus {
    Applied(AppliedRule),
    Skipped { reason: SkipReason },
}

/// What happened to one schema rule during an engine call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    /// Question identifier, or a placeholder when the rule has none.
    pub question: String,
    #[serde(flatten)]
    pub status: RuleStatus,
}

impl RuleOutcome {
    pub fn applied(question: impl Into<String>, applied: AppliedRule) -> Self {
        Self {
            question: question.into(),
            status: RuleStatus::Applied(applied),
        }
    }

    pub fn skipped(question: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            question: question.into(),
            status: RuleStatus::Skipped { reason },
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self.status, RuleStatus::Applied(_))
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match &self.status {
            RuleStatus::Skipped { reason } => Some(reason),
            RuleStatus::Applied(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_reason_from_rule_error() {
        assert_eq!(
            SkipReason::from(RuleError::MissingEncoding),
            SkipReason::MissingEncoding
        );
        assert_eq!(
            SkipReason::from(RuleError::UnknownKind("likert".into())),
            SkipReason::UnknownKind("likert".into())
        );
        assert_eq!(
            SkipReason::from(RuleError::MissingQuestion),
            SkipReason::InvalidRule("rule has no question".into())
        );
    }

    #[test]
    fn outcome_serializes_flat() {
        let outcome = RuleOutcome::skipped("Q1", SkipReason::QuestionNotFound);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["question"], "Q1");
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["reason"]["reason"], "question_not_found");
    }
}
