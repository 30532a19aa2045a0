//! Pure schema comparison
//!
//! Diffs a declared record schema against the live schema of a table.
//! No side effects; callers decide what to do with the result.

use super::types::TableSchema;
use crate::model::RecordSchema;

/// Result of comparing a declared schema against a live table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDiff {
    /// Declared columns absent from the live table
    pub missing: Vec<String>,
    /// Columns present on both sides but with different types
    pub type_mismatch: Vec<String>,
    /// Columns present on both sides with matching types
    pub matching: Vec<String>,
}

impl SchemaDiff {
    /// Whether the declared schema is fully present with matching types
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.type_mismatch.is_empty()
    }
}

/// Compare a declared schema against a live table schema
///
/// Columns are matched by Airtable column name; types by wire name.
/// Live columns without a declared counterpart are ignored, never flagged
/// for deletion.
pub fn validate_schema(declared: &RecordSchema, live: &TableSchema) -> SchemaDiff {
    let mut diff = SchemaDiff::default();

    for descriptor in declared.fields() {
        match live.field(&descriptor.column_name) {
            None => diff.missing.push(descriptor.column_name.clone()),
            Some(live_field) => {
                if live_field.field_type == descriptor.field_type.as_api_name() {
                    diff.matching.push(descriptor.column_name.clone());
                } else {
                    diff.type_mismatch.push(descriptor.column_name.clone());
                }
            }
        }
    }

    diff
}
