//! Equality filtering over the product table.
//!
//! A [`FilterSet`] is built from the `clusters` array of a record request:
//!
//! ```text
//! {"clusters": [{"parameter": "category", "value": "電子部品"}, ...]}
//! ```
//!
//! All conditions must hold for a record to match. When no record matches,
//! the filter is dropped and the whole table is returned instead; callers can
//! tell the two apart through [`SelectionMode`].

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::records::ProductRecord;

/// Ordered field name → expected value conditions.
///
/// Re-inserting a field replaces its value but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    conditions: Vec<(String, Value)>,
}

impl FilterSet {
    /// Create an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the JSON text carried in the `data` form field.
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        let payload: Value = serde_json::from_str(data)?;
        Ok(Self::from_payload(&payload))
    }

    /// Extract conditions from a decoded payload.
    ///
    /// Entries whose `parameter` or `value` is null, false, zero or empty are
    /// skipped. Numeric and boolean parameters are used as their JSON text
    /// (`7` becomes the field `"7"`); object and array parameters are
    /// skipped. Anything that is not an object with a `clusters` array
    /// yields an empty set.
    pub fn from_payload(payload: &Value) -> Self {
        let mut filters = Self::new();

        let Some(clusters) = payload.get("clusters").and_then(Value::as_array) else {
            return filters;
        };

        for cluster in clusters {
            let parameter = cluster.get("parameter").and_then(parameter_key);
            let value = cluster.get("value").filter(|v| is_truthy(v));

            if let (Some(parameter), Some(value)) = (parameter, value) {
                filters.insert(parameter, value.clone());
            }
        }

        filters
    }

    /// Add or replace a condition.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let value = value.into();

        match self.conditions.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = value,
            None => self.conditions.push((field, value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.conditions
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Whether the record satisfies every condition.
    ///
    /// Only string values can match, since every column is a string.
    pub fn matches(&self, record: &ProductRecord) -> bool {
        self.conditions.iter().all(|(name, expected)| {
            match (record.field(name), expected.as_str()) {
                (Some(actual), Some(expected)) => !actual.is_empty() && actual == expected,
                _ => false,
            }
        })
    }

    /// Select the records matching this filter, falling back to all records
    /// when nothing matches.
    pub fn apply<'a>(&self, records: &'a [ProductRecord]) -> Selection<'a> {
        if self.is_empty() {
            return Selection {
                records: records.iter().collect(),
                mode: SelectionMode::Unfiltered,
            };
        }

        let matched: Vec<_> = records.iter().filter(|r| self.matches(r)).collect();
        if matched.is_empty() {
            Selection {
                records: records.iter().collect(),
                mode: SelectionMode::Fallback,
            }
        } else {
            Selection {
                records: matched,
                mode: SelectionMode::Filtered,
            }
        }
    }
}

/// Serializes as a JSON object. Integer-like field names come first in
/// ascending order, the rest keep insertion order.
impl Serialize for FilterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut indexed: Vec<_> = self
            .conditions
            .iter()
            .filter_map(|entry| array_index(&entry.0).map(|index| (index, entry)))
            .collect();
        indexed.sort_by_key(|(index, _)| *index);

        let named = self
            .conditions
            .iter()
            .filter(|(name, _)| array_index(name).is_none());

        let mut map = serializer.serialize_map(Some(self.conditions.len()))?;
        for (name, value) in indexed.into_iter().map(|(_, entry)| entry).chain(named) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// How a [`Selection`] was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// No conditions were given
    Unfiltered,
    /// At least one record matched all conditions
    Filtered,
    /// Conditions were given but matched nothing; all records returned
    Fallback,
}

/// Records chosen by [`FilterSet::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a> {
    pub records: Vec<&'a ProductRecord>,
    pub mode: SelectionMode,
}

/// Field name for a cluster `parameter`, if it names one.
fn parameter_key(parameter: &Value) -> Option<String> {
    if !is_truthy(parameter) {
        return None;
    }

    match parameter {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(number_key(n)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Text of a number used as an object key; whole floats drop the `.0`.
fn number_key(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }

    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Canonical array-index value of a key (`"0"`, `"7"`, not `"07"`).
fn array_index(key: &str) -> Option<u32> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }

    key.parse::<u32>().ok().filter(|index| *index != u32::MAX)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
