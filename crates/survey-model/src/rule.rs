//! Schema rules: raw as written, and validated per kind.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::code::Encoding;
use crate::enums::RuleKind;
use crate::error::RuleError;

/// One encoding instruction exactly as it appears in the schema document.
///
/// Every field is optional and kept as raw YAML so a single malformed rule
/// never prevents the rest of the schema from loading. Validation happens
/// when the rule is applied, through [`EncodingRule::try_from`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionRule {
    /// Exact column header of the question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<Value>,
    /// One of `binary`, `ordinal`, `categorical`, `multiselect`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<Value>,
    /// Mapping from raw answer to code. May be null while a schema is being filled in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Value>,
    /// Legacy flag marking a categorical question that accepts several answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple: Option<Value>,
}

impl QuestionRule {
    pub fn new(question: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            question: Some(Value::String(question.into())),
            kind: Some(Value::String(kind.into())),
            encoding: None,
            multiple: None,
        }
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: &Encoding) -> Self {
        self.encoding = Some(encoding.to_yaml());
        self
    }

    #[must_use]
    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = Some(Value::Bool(multiple));
        self
    }

    /// The question identifier, when it is a scalar.
    pub fn question_name(&self) -> Option<String> {
        scalar_text(self.question.as_ref()?)
    }

    /// The declared type name, when it is a scalar.
    pub fn kind_name(&self) -> Option<String> {
        scalar_text(self.kind.as_ref()?)
    }

    fn is_multiple(&self) -> bool {
        matches!(self.multiple, Some(Value::Bool(true)))
    }

    fn encoding(&self) -> Result<Encoding, RuleError> {
        match &self.encoding {
            Some(value) => Encoding::from_yaml(value),
            None => Ok(Encoding::new()),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A validated rule. Each variant carries only what its algorithm needs.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodingRule {
    Binary {
        question: String,
        encoding: Encoding,
    },
    Ordinal {
        question: String,
        encoding: Encoding,
    },
    /// `None` means the encoding has not been written yet; the column is left untouched.
    Categorical {
        question: String,
        encoding: Option<Encoding>,
    },
    /// Always holds at least one option.
    Multiselect { question: String, options: Encoding },
}

impl EncodingRule {
    pub fn question(&self) -> &str {
        match self {
            EncodingRule::Binary { question, .. }
            | EncodingRule::Ordinal { question, .. }
            | EncodingRule::Categorical { question, .. }
            | EncodingRule::Multiselect { question, .. } => question,
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            EncodingRule::Binary { .. } => RuleKind::Binary,
            EncodingRule::Ordinal { .. } => RuleKind::Ordinal,
            EncodingRule::Categorical { .. } => RuleKind::Categorical,
            EncodingRule::Multiselect { .. } => RuleKind::Multiselect,
        }
    }
}

impl TryFrom<&QuestionRule> for EncodingRule {
    type Error = RuleError;

    fn try_from(rule: &QuestionRule) -> Result<Self, Self::Error> {
        let question = rule.question_name().ok_or(RuleError::MissingQuestion)?;
        let kind_name = rule.kind_name().ok_or(RuleError::MissingKind)?;
        let kind: RuleKind = kind_name
            .parse()
            .map_err(|_| RuleError::UnknownKind(kind_name.clone()))?;
        let encoding = rule.encoding()?;

        let validated = match kind {
            RuleKind::Binary => EncodingRule::Binary { question, encoding },
            RuleKind::Ordinal => EncodingRule::Ordinal { question, encoding },
            RuleKind::Categorical if rule.is_multiple() => multiselect(question, encoding)?,
            RuleKind::Categorical => EncodingRule::Categorical {
                question,
                encoding: (!encoding.is_empty()).then_some(encoding),
            },
            RuleKind::Multiselect => multiselect(question, encoding)?,
        };
        Ok(validated)
    }
}

fn multiselect(question: String, options: Encoding) -> Result<EncodingRule, RuleError> {
    if options.is_empty() {
        return Err(RuleError::MissingEncoding);
    }
    Ok(EncodingRule::Multiselect { question, options })
}
