//! Record instances and field input
//!
//! A [`Record`] is the in-memory representation of one Airtable row, owned
//! exclusively by the caller. Two fetches of the same row yield two
//! independent instances; there is no identity map and no shared cache.

use crate::fields::FieldValue;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Named field values for create and update calls
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    values: BTreeMap<String, FieldValue>,
}

impl Fields {
    /// Create an empty set of fields
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, consuming and returning self for chaining
    #[must_use]
    pub fn set(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Insert a field in place
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Get a field value by name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Whether a field is present
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterate over (name, value) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.values.iter()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no fields are set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// One Airtable row in memory
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: String,
    fields: BTreeMap<String, FieldValue>,
    created_time: Option<DateTime<Utc>>,
}

impl Record {
    /// Build a record from its parts
    pub(crate) fn new(
        id: String,
        fields: BTreeMap<String, FieldValue>,
        created_time: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            fields,
            created_time,
        }
    }

    /// Server-assigned record id; empty before creation
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether this record exists on the server
    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }

    /// Get a field value by attribute name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Set a field value by attribute name
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// All field values
    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// Creation timestamp reported by the server
    pub fn created_time(&self) -> Option<DateTime<Utc>> {
        self.created_time
    }
}
