//! Target codes and ordered encoding tables.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::RuleError;

/// The value a raw answer is encoded to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Code {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Output column type implied by a set of codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    Int,
    Float,
    Text,
}

impl Code {
    pub fn kind(&self) -> CodeKind {
        match self {
            Code::Int(_) => CodeKind::Int,
            Code::Float(_) => CodeKind::Float,
            Code::Text(_) => CodeKind::Text,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Code::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Code::Int(v) => Some(*v as f64),
            Code::Float(v) => Some(*v),
            Code::Text(_) => None,
        }
    }

    /// Converts a YAML scalar into a code.
    ///
    /// Booleans become `1`/`0`; nulls, sequences and mappings are rejected.
    pub fn from_yaml(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => {
                if let Some(v) = number.as_i64() {
                    Some(Code::Int(v))
                } else {
                    number.as_f64().map(Code::Float)
                }
            }
            Value::String(s) => Some(Code::Text(s.clone())),
            Value::Bool(b) => Some(Code::Int(i64::from(*b))),
            Value::Tagged(tagged) => Code::from_yaml(&tagged.value),
            Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
        }
    }

    pub fn to_yaml(&self) -> Value {
        match self {
            Code::Int(v) => Value::Number((*v).into()),
            Code::Float(v) => Value::Number((*v).into()),
            Code::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Code::Int(v) => write!(f, "{v}"),
            Code::Float(v) => write!(f, "{v}"),
            Code::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for Code {
    fn from(value: i64) -> Self {
        Code::Int(value)
    }
}

impl From<i32> for Code {
    fn from(value: i32) -> Self {
        Code::Int(i64::from(value))
    }
}

impl From<f64> for Code {
    fn from(value: f64) -> Self {
        Code::Float(value)
    }
}

impl From<&str> for Code {
    fn from(value: &str) -> Self {
        Code::Text(value.to_string())
    }
}

impl From<String> for Code {
    fn from(value: String) -> Self {
        Code::Text(value)
    }
}

/// Ordered mapping from raw answer to code.
///
/// Iteration follows document order, which fixes the order of indicator
/// columns created for multiselect questions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Encoding {
    entries: Vec<(String, Code)>,
}

impl Encoding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry. A repeated key replaces the earlier code in place.
    pub fn insert(&mut self, key: impl Into<String>, code: impl Into<Code>) {
        let key = key.into();
        let code = code.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = code;
        } else {
            self.entries.push((key, code));
        }
    }

    /// Looks up the code for an already-trimmed raw answer.
    pub fn get(&self, key: &str) -> Option<&Code> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, code)| code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Code)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Column type able to hold every code: any text wins, then any float.
    pub fn output_kind(&self) -> CodeKind {
        let mut kind = CodeKind::Int;
        for (_, code) in &self.entries {
            match code.kind() {
                CodeKind::Text => return CodeKind::Text,
                CodeKind::Float => kind = CodeKind::Float,
                CodeKind::Int => {}
            }
        }
        kind
    }

    /// Reads an encoding from the YAML `encoding` field.
    ///
    /// `null` yields an empty encoding. Scalar keys are rendered as text, so
    /// `1: 1` in an ordinal scale matches the answer `"1"`.
    pub fn from_yaml(value: &Value) -> Result<Self, RuleError> {
        let mapping = match value {
            Value::Null => return Ok(Self::new()),
            Value::Mapping(mapping) => mapping,
            Value::Tagged(tagged) => return Self::from_yaml(&tagged.value),
            _ => return Err(RuleError::MalformedEncoding),
        };
        let mut encoding = Self::new();
        for (key, code) in mapping {
            let key = yaml_key(key).ok_or(RuleError::MalformedEncoding)?;
            let code = Code::from_yaml(code).ok_or_else(|| RuleError::MissingCode {
                key: key.clone(),
            })?;
            encoding.insert(key, code);
        }
        Ok(encoding)
    }

    pub fn to_yaml(&self) -> Value {
        let mut mapping = serde_yaml::Mapping::new();
        for (key, code) in &self.entries {
            mapping.insert(Value::String(key.clone()), code.to_yaml());
        }
        Value::Mapping(mapping)
    }
}

impl<K, C> FromIterator<(K, C)> for Encoding
where
    K: Into<String>,
    C: Into<Code>,
{
    fn from_iter<T: IntoIterator<Item = (K, C)>>(iter: T) -> Self {
        let mut encoding = Self::new();
        for (key, code) in iter {
            encoding.insert(key, code);
        }
        encoding
    }
}

fn yaml_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
