//! Column types, declared value shapes, and field descriptors

use crate::fields::value::FieldValue;
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Airtable column type
///
/// Serde names match the Airtable metadata API exactly
/// (`singleLineText`, `multilineText`, `phoneNumber`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    SingleLineText,
    MultilineText,
    Number,
    Currency,
    Percent,
    Date,
    DateTime,
    Checkbox,
    SingleSelect,
    MultipleSelects,
    Email,
    Url,
    PhoneNumber,
    Duration,
    MultipleAttachments,
    Formula,
    Rollup,
    Count,
    CreatedTime,
    LastModifiedTime,
    AutoNumber,
}

impl FieldType {
    /// The wire name used by the Airtable API for this column type
    pub fn as_api_name(self) -> &'static str {
        match self {
            FieldType::SingleLineText => "singleLineText",
            FieldType::MultilineText => "multilineText",
            FieldType::Number => "number",
            FieldType::Currency => "currency",
            FieldType::Percent => "percent",
            FieldType::Date => "date",
            FieldType::DateTime => "dateTime",
            FieldType::Checkbox => "checkbox",
            FieldType::SingleSelect => "singleSelect",
            FieldType::MultipleSelects => "multipleSelects",
            FieldType::Email => "email",
            FieldType::Url => "url",
            FieldType::PhoneNumber => "phoneNumber",
            FieldType::Duration => "duration",
            FieldType::MultipleAttachments => "multipleAttachments",
            FieldType::Formula => "formula",
            FieldType::Rollup => "rollup",
            FieldType::Count => "count",
            FieldType::CreatedTime => "createdTime",
            FieldType::LastModifiedTime => "lastModifiedTime",
            FieldType::AutoNumber => "autoNumber",
        }
    }

    /// Whether Airtable computes this column itself
    ///
    /// Computed columns are never written on create or update.
    pub fn is_computed(self) -> bool {
        matches!(
            self,
            FieldType::Formula
                | FieldType::Rollup
                | FieldType::Count
                | FieldType::CreatedTime
                | FieldType::LastModifiedTime
                | FieldType::AutoNumber
        )
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_api_name())
    }
}

/// Declared value shape of a field
///
/// The declaration-side counterpart of [`FieldType`]: what the caller says
/// a field holds. The resolver maps this (together with the field name) to
/// a column type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    /// A string value
    Text,
    /// An integer value
    Integer,
    /// A floating-point value
    Float,
    /// A boolean value
    Bool,
    /// A timezone-aware timestamp
    DateTime,
    /// A calendar date
    Date,
    /// A span of time, stored as whole seconds
    Duration,
    /// A list of strings
    TextList,
    /// One value out of a fixed choice set
    Enumeration,
    /// An optional value; unwraps to its base shape
    Optional(Box<DeclaredType>),
}

impl DeclaredType {
    /// Wrap a declared type as optional
    pub fn optional(inner: DeclaredType) -> Self {
        DeclaredType::Optional(Box::new(inner))
    }

    /// Unwrap through `Optional` to the base shape
    pub fn base(&self) -> &DeclaredType {
        match self {
            DeclaredType::Optional(inner) => inner.base(),
            other => other,
        }
    }

    /// Whether the base shape is numeric
    pub fn is_numeric(&self) -> bool {
        matches!(self.base(), DeclaredType::Integer | DeclaredType::Float)
    }
}

/// The declared shape of one column
///
/// Fixed at schema-declaration time; never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Attribute name used on the Rust side
    pub name: String,
    /// Column name in Airtable (defaults to the attribute name)
    pub column_name: String,
    /// Resolved Airtable column type
    pub field_type: FieldType,
    /// Declared value shape
    pub declared: DeclaredType,
    /// Excluded from create and update payloads
    pub read_only: bool,
    /// Choice set for select and multi-select columns
    pub choices: Vec<String>,
    /// Default value applied on create when the caller omits the field
    pub default: Option<FieldValue>,
}

impl FieldDescriptor {
    /// Whether this column is writable through the record API
    pub fn is_writable(&self) -> bool {
        !self.read_only && !self.field_type.is_computed()
    }

    /// Column options for the Airtable metadata API
    ///
    /// The metadata API rejects bare declarations for several types; this
    /// supplies the required option blocks.
    pub fn api_options(&self) -> Option<JsonValue> {
        match self.field_type {
            FieldType::Checkbox => Some(json!({
                "icon": "check",
                "color": "greenBright",
            })),
            FieldType::SingleSelect | FieldType::MultipleSelects => {
                let choices: Vec<JsonValue> =
                    self.choices.iter().map(|c| json!({ "name": c })).collect();
                Some(json!({ "choices": choices }))
            }
            FieldType::Currency => Some(json!({
                "precision": 2,
                "symbol": "$",
            })),
            FieldType::Percent => Some(json!({ "precision": 1 })),
            FieldType::Number => {
                let precision = if *self.declared.base() == DeclaredType::Integer {
                    0
                } else {
                    2
                };
                Some(json!({ "precision": precision }))
            }
            FieldType::DateTime => Some(json!({
                "dateFormat": { "name": "iso" },
                "timeFormat": { "name": "24hour" },
                "timeZone": "utc",
            })),
            FieldType::Date => Some(json!({
                "dateFormat": { "name": "iso" },
            })),
            FieldType::Duration => Some(json!({ "durationFormat": "h:mm:ss" })),
            _ => None,
        }
    }
}
