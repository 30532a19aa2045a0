//! Schema declaration
//!
//! A record schema is an immutable list of field descriptors plus a table
//! name. Schemas are declared through an explicit builder; the field type
//! resolver runs once per field at build time.

use crate::base::{FieldSpec, TableSpec};
use crate::error::{Error, Result};
use crate::fields::{resolve_field_type, DeclaredType, FieldDescriptor, FieldType, FieldValue};
use std::collections::HashSet;

/// Declared shape of one field, before resolution
///
/// ```rust,ignore
/// Field::new("email", DeclaredType::Text)            // resolves to an email column
/// Field::new("budget", DeclaredType::Float)          // resolves to a currency column
/// Field::new("status", DeclaredType::Enumeration)
///     .choices(["Open", "Closed"])
///     .default_value("Open")
/// ```
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    declared: DeclaredType,
    explicit: Option<FieldType>,
    column: Option<String>,
    read_only: bool,
    choices: Vec<String>,
    default: Option<FieldValue>,
}

impl Field {
    /// Declare a field with a name and value shape
    pub fn new(name: impl Into<String>, declared: DeclaredType) -> Self {
        Self {
            name: name.into(),
            declared,
            explicit: None,
            column: None,
            read_only: false,
            choices: Vec::new(),
            default: None,
        }
    }

    /// Pin the Airtable column type, overriding detection
    #[must_use]
    pub fn field_type(mut self, field_type: FieldType) -> Self {
        self.explicit = Some(field_type);
        self
    }

    /// Use a different Airtable column name than the attribute name
    #[must_use]
    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.column = Some(name.into());
        self
    }

    /// Exclude this field from create and update payloads
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Set the choice set for select and multi-select columns
    #[must_use]
    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Set a default applied on create when the caller omits the field
    #[must_use]
    pub fn default_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Resolve into an immutable descriptor
    fn into_descriptor(self) -> FieldDescriptor {
        let field_type = resolve_field_type(&self.name, &self.declared, self.explicit);
        let column_name = self.column.unwrap_or_else(|| self.name.clone());
        FieldDescriptor {
            name: self.name,
            column_name,
            field_type,
            declared: self.declared,
            read_only: self.read_only,
            choices: self.choices,
            default: self.default,
        }
    }
}

/// Immutable record schema: a table name plus field descriptors
#[derive(Debug, Clone)]
pub struct RecordSchema {
    table_name: String,
    fields: Vec<FieldDescriptor>,
}

impl RecordSchema {
    /// Start declaring a schema for a table
    pub fn builder(table_name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            table_name: table_name.into(),
            fields: Vec::new(),
        }
    }

    /// The table this schema binds to
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// All field descriptors, in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a descriptor by attribute name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up a descriptor by Airtable column name
    pub fn field_by_column(&self, column: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.column_name == column)
    }

    /// Derive the table spec for the metadata API
    pub fn to_table_spec(&self) -> TableSpec {
        TableSpec {
            name: self.table_name.clone(),
            description: None,
            fields: self
                .fields
                .iter()
                .map(|f| FieldSpec {
                    name: f.column_name.clone(),
                    field_type: f.field_type.as_api_name().to_string(),
                    options: f.api_options(),
                })
                .collect(),
        }
    }
}

/// Builder for [`RecordSchema`]
#[derive(Debug)]
pub struct SchemaBuilder {
    table_name: String,
    fields: Vec<Field>,
}

impl SchemaBuilder {
    /// Add a field declaration
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Resolve all declarations into an immutable schema
    pub fn build(self) -> Result<RecordSchema> {
        if self.table_name.is_empty() {
            return Err(Error::config("schema requires a table name"));
        }
        if self.fields.is_empty() {
            return Err(Error::config("schema requires at least one field"));
        }

        let mut names = HashSet::new();
        let mut columns = HashSet::new();
        for field in &self.fields {
            if !names.insert(field.name.clone()) {
                return Err(Error::validation(
                    field.name.clone(),
                    "duplicate field name",
                ));
            }
            let column = field.column.clone().unwrap_or_else(|| field.name.clone());
            if !columns.insert(column.clone()) {
                return Err(Error::validation(column, "duplicate column name"));
            }
        }

        Ok(RecordSchema {
            table_name: self.table_name,
            fields: self.fields.into_iter().map(Field::into_descriptor).collect(),
        })
    }
}
