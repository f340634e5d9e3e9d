//! Accumulators returned by each engine call.
//!
//! Both reports are ordered by first appearance of the question and are
//! append-only: callers combine results from several calls with `merge`.

use std::collections::BTreeSet;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Question-keyed lists preserving insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct OrderedLists {
    entries: Vec<(String, Vec<String>)>,
}

impl OrderedLists {
    fn list_mut(&mut self, question: &str) -> &mut Vec<String> {
        let idx = match self.entries.iter().position(|(q, _)| q == question) {
            Some(idx) => idx,
            None => {
                self.entries.push((question.to_string(), Vec::new()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    fn get(&self, question: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(q, _)| q == question)
            .map(|(_, values)| values.as_slice())
    }

    fn extend(&mut self, other: OrderedLists) {
        for (question, values) in other.entries {
            self.list_mut(&question).extend(values);
        }
    }

    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (question, values) in &self.entries {
            map.serialize_entry(question, values)?;
        }
        map.end()
    }
}

/// Raw answers that had no entry in their question's encoding.
///
/// Every occurrence is kept in row order; [`unique_values`](Self::unique_values)
/// gives the distinct set shown in console summaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnmappedReport {
    lists: OrderedLists,
}

impl UnmappedReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, question: &str, value: impl Into<String>) {
        self.lists.list_mut(question).push(value.into());
    }

    /// All recorded values for a question, duplicates included.
    pub fn values(&self, question: &str) -> Option<&[String]> {
        self.lists.get(question)
    }

    /// Distinct values for a question, sorted.
    pub fn unique_values(&self, question: &str) -> BTreeSet<&str> {
        self.values(question)
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.lists
            .entries
            .iter()
            .map(|(q, values)| (q.as_str(), values.as_slice()))
    }

    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(q, _)| q)
    }

    /// Total number of unmapped cells across questions.
    pub fn total(&self) -> usize {
        self.lists.entries.iter().map(|(_, v)| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Appends another report's values after this one's.
    pub fn merge(&mut self, other: UnmappedReport) {
        self.lists.extend(other.lists);
    }
}

impl Serialize for UnmappedReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.lists.serialize(serializer)
    }
}

/// Indicator columns created for each multiselect question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndicatorRegistry {
    lists: OrderedLists,
}

impl IndicatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, question: &str, column: impl Into<String>) {
        self.lists.list_mut(question).push(column.into());
    }

    pub fn columns(&self, question: &str) -> Option<&[String]> {
        self.lists.get(question)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.lists
            .entries
            .iter()
            .map(|(q, columns)| (q.as_str(), columns.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.lists.entries.is_empty()
    }

    pub fn merge(&mut self, other: IndicatorRegistry) {
        self.lists.extend(other.lists);
    }
}

impl Serialize for IndicatorRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.lists.serialize(serializer)
    }
}
