//! Storage record model.
//!
//! A storage record is a flat map from vendor field names (`first_name_c`,
//! `date_time_c`, ...) to scalar values. Reference fields may arrive either as
//! a bare integer or as an expanded `{Id, Name}` object, depending on the shape
//! of the query that produced them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field holding the backend-assigned identity of every record.
pub const ID_FIELD: &str = "Id";

/// Field holding the display name of every record.
pub const NAME_FIELD: &str = "Name";

/// Expanded form of a reference field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "Id")]
    pub id: i64,

    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A single scalar value in a storage record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Reference(Reference),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Returns the text content if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Renders the value as plain text.
    ///
    /// References render as their id. `Null` has no text form.
    pub fn to_plain_string(&self) -> Option<String> {
        match self {
            FieldValue::Null => None,
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::Integer(i) => Some(i.to_string()),
            FieldValue::Float(f) => Some(f.to_string()),
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Reference(r) => Some(r.id.to_string()),
        }
    }

    /// Interprets the value as a referenced record id.
    ///
    /// Both the bare integer and the expanded object yield the same id.
    pub fn reference_id(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            FieldValue::Reference(r) => Some(r.id),
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    /// Interprets the value as a number, parsing text if needed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            FieldValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<Reference> for FieldValue {
    fn from(value: Reference) -> Self {
        FieldValue::Reference(value)
    }
}

impl From<dental_types::RecordId> for FieldValue {
    fn from(value: dental_types::RecordId) -> Self {
        FieldValue::Integer(value.get())
    }
}

/// A flat record as persisted by the backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageRecord(BTreeMap<String, FieldValue>);

impl StorageRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record id, if one has been assigned.
    pub fn id(&self) -> Option<i64> {
        self.0.get(ID_FIELD).and_then(FieldValue::reference_id)
    }

    pub fn set_id(&mut self, id: i64) {
        self.0.insert(ID_FIELD.to_owned(), FieldValue::Integer(id));
    }

    /// Returns the display name (`Name` field), if present and textual.
    pub fn name(&self) -> Option<&str> {
        self.0.get(NAME_FIELD).and_then(FieldValue::as_text)
    }

    /// Returns the value stored under `key`, treating `Null` as absent.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Returns the raw entry under `key`, including explicit `Null`s.
    pub fn get_raw(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style variant of [`StorageRecord::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    /// Overwrites this record's fields with those present in `patch`.
    ///
    /// The id is never overwritten.
    pub fn merge(&mut self, patch: &StorageRecord) {
        for (key, value) in patch.iter() {
            if key == ID_FIELD {
                continue;
            }
            self.0.insert(key.clone(), value.clone());
        }
    }
}

impl FromIterator<(String, FieldValue)> for StorageRecord {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for StorageRecord {
    type Item = (String, FieldValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
