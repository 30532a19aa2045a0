//! Wire types for the Airtable metadata API

use crate::types::JsonValue;
use serde::{Deserialize, Serialize};

/// One base as listed by `GET /v0/meta/bases`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseInfo {
    /// Base id (prefixed `app`)
    pub id: String,
    /// Base name
    pub name: String,
    /// Permission level of the token on this base
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_level: Option<String>,
}

/// Response of a base creation call
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBase {
    /// Id of the new base
    pub id: String,
    /// Schemas of the tables it was created with
    #[serde(default)]
    pub tables: Vec<TableSchema>,
}

/// Live schema of one table
///
/// The field type stays the raw wire string so column types this library
/// does not model survive a round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    /// Table id (prefixed `tbl`)
    pub id: String,
    /// Table name
    pub name: String,
    /// Id of the primary field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_field_id: Option<String>,
    /// Table description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Column schemas
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

impl TableSchema {
    /// Find a column schema by name
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Live schema of one column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Field id (prefixed `fld`)
    pub id: String,
    /// Column name
    pub name: String,
    /// Raw wire name of the column type
    #[serde(rename = "type")]
    pub field_type: String,
    /// Type-specific options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<JsonValue>,
    /// Column description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Declared spec for creating a table
#[derive(Debug, Clone, Serialize)]
pub struct TableSpec {
    /// Table name
    pub name: String,
    /// Table description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Column specs
    pub fields: Vec<FieldSpec>,
}

/// Declared spec for creating one column
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    /// Column name
    pub name: String,
    /// Wire name of the column type
    #[serde(rename = "type")]
    pub field_type: String,
    /// Type-specific options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<JsonValue>,
}
