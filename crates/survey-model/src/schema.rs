use serde::{Deserialize, Serialize};

use crate::rule::QuestionRule;

/// Ordered list of rules; order is application order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    rules: Vec<QuestionRule>,
}

impl Schema {
    pub fn new(rules: Vec<QuestionRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[QuestionRule] {
        &self.rules
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QuestionRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn push(&mut self, rule: QuestionRule) {
        self.rules.push(rule);
    }
}

impl FromIterator<QuestionRule> for Schema {
    fn from_iter<T: IntoIterator<Item = QuestionRule>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a QuestionRule;
    type IntoIter = std::slice::Iter<'a, QuestionRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
