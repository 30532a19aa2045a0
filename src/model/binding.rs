//! The table binding
//!
//! A [`Table`] is the bound accessor object for one declared schema:
//! schema plus client plus config. All validation of caller input happens
//! before any network call; API errors propagate unchanged.

use super::record::{Fields, Record};
use super::schema::RecordSchema;
use crate::base::{validate_schema, TableSchema};
use crate::config::{current_config, AirtableConfig};
use crate::error::{Error, Result};
use crate::fields::{from_api_value, to_api_value, FieldDescriptor, FieldType, FieldValue};
use crate::formula;
use crate::http::{AirtableClient, ApiRecord, ClientConfig, ListParams};
use crate::types::JsonObject;
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Airtable accepts at most ten records per create call
const CREATE_BATCH_SIZE: usize = 10;

/// Options for [`Table::sync_table_with`]
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    /// Create declared columns missing from the live table
    pub create_missing: bool,
    /// Rewrite live columns whose type differs from the declaration
    pub update_types: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            create_missing: true,
            update_types: false,
        }
    }
}

/// Result of a schema sync: which columns were added, flagged for update,
/// or left unchanged. Live columns are never deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Columns created on the live table
    pub added: Vec<String>,
    /// Columns whose live type differs from the declaration
    pub updated: Vec<String>,
    /// Columns already present with matching types
    pub skipped: Vec<String>,
}

/// Bound accessor for one declared record schema
#[derive(Debug)]
pub struct Table {
    schema: RecordSchema,
    client: AirtableClient,
}

impl Table {
    /// Bind a schema to a connection with the default client configuration
    pub fn bind(schema: RecordSchema, config: AirtableConfig) -> Result<Self> {
        Ok(Self {
            schema,
            client: AirtableClient::new(config)?,
        })
    }

    /// Bind a schema using the process-wide current configuration
    pub fn bind_current(schema: RecordSchema) -> Result<Self> {
        Self::bind(schema, current_config()?.clone())
    }

    /// Bind a schema to a connection with a custom client configuration
    pub fn bind_with_client_config(
        schema: RecordSchema,
        config: AirtableConfig,
        client_config: ClientConfig,
    ) -> Result<Self> {
        Ok(Self {
            schema,
            client: AirtableClient::with_config(config, client_config)?,
        })
    }

    /// The declared schema
    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// The table name this binding targets
    pub fn table_name(&self) -> &str {
        self.schema.table_name()
    }

    // ------------------------------------------------------------------------
    // CRUD
    // ------------------------------------------------------------------------

    /// Create a record
    ///
    /// Validates the input against the schema, applies declared defaults,
    /// and issues one create call. Returns the populated record including
    /// the server-assigned id.
    pub async fn create(&self, fields: Fields) -> Result<Record> {
        let payload = self.serialize_fields(&fields, true)?;
        let api = self
            .client
            .create_record(self.table_name(), &payload)
            .await?;
        Ok(self.record_from_api(api))
    }

    /// Fetch a record by id
    ///
    /// A missing record surfaces as [`Error::RecordNotFound`].
    pub async fn get(&self, id: &str) -> Result<Record> {
        let api = self.client.get_record(self.table_name(), id).await?;
        Ok(self.record_from_api(api))
    }

    /// Persist all writable fields of an existing record
    ///
    /// Whole-record overwrite of the writable fields; no per-field diffing.
    /// The instance is refreshed from the server response.
    pub async fn save(&self, record: &mut Record) -> Result<()> {
        if !record.is_persisted() {
            return Err(Error::validation(
                "id",
                "record has no id yet: use create for new records",
            ));
        }

        let mut fields = Fields::new();
        for descriptor in self.schema.fields() {
            if !descriptor.is_writable() {
                continue;
            }
            if let Some(value) = record.get(&descriptor.name) {
                fields.insert(descriptor.name.clone(), value.clone());
            }
        }

        let payload = self.serialize_fields(&fields, false)?;
        let api = self
            .client
            .update_record(self.table_name(), record.id(), &payload)
            .await?;
        *record = self.record_from_api(api);
        Ok(())
    }

    /// Delete a record by id
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete_record(self.table_name(), id).await
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Fetch every record of the table
    ///
    /// Follows the server's continuation token page by page; each page
    /// request completes before the next one starts.
    pub async fn all(&self) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut params = ListParams::new();
            if let Some(token) = offset.take() {
                params = params.offset(token);
            }
            let page = self.client.list_records(self.table_name(), &params).await?;
            records.extend(page.records.into_iter().map(|r| self.record_from_api(r)));
            match page.offset {
                Some(token) => offset = Some(token),
                None => break,
            }
        }

        Ok(records)
    }

    /// Fetch records matching all equality filters, in one list call
    pub async fn find_by(&self, filters: Fields) -> Result<Vec<Record>> {
        let params = ListParams::new().filter(self.build_filter(&filters)?);
        let page = self.client.list_records(self.table_name(), &params).await?;
        Ok(page
            .records
            .into_iter()
            .map(|r| self.record_from_api(r))
            .collect())
    }

    /// Fetch the first record matching all equality filters
    pub async fn first(&self, filters: Fields) -> Result<Option<Record>> {
        let params = ListParams::new()
            .filter(self.build_filter(&filters)?)
            .max_records(1);
        let page = self.client.list_records(self.table_name(), &params).await?;
        Ok(page
            .records
            .into_iter()
            .next()
            .map(|r| self.record_from_api(r)))
    }

    /// Create many records, batching into groups of ten
    ///
    /// Every row is validated before the first network call. Batches are
    /// issued sequentially; the returned records preserve input order.
    pub async fn bulk_create(&self, rows: Vec<Fields>) -> Result<Vec<Record>> {
        let payloads: Vec<JsonObject> = rows
            .iter()
            .map(|row| self.serialize_fields(row, true))
            .collect::<Result<_>>()?;

        let mut records = Vec::with_capacity(payloads.len());
        for batch in payloads.chunks(CREATE_BATCH_SIZE) {
            let created = self.client.create_records(self.table_name(), batch).await?;
            records.extend(created.into_iter().map(|r| self.record_from_api(r)));
        }
        Ok(records)
    }

    // ------------------------------------------------------------------------
    // Provisioning
    // ------------------------------------------------------------------------

    /// Create the table from the declared schema
    pub async fn create_table(&self) -> Result<TableSchema> {
        self.client.create_table(&self.schema.to_table_spec()).await
    }

    /// Reconcile the declared schema against the live table with defaults:
    /// create missing columns, never touch types
    pub async fn sync_table(&self) -> Result<SyncReport> {
        self.sync_table_with(SyncOptions::default()).await
    }

    /// Reconcile the declared schema against the live table
    ///
    /// Looks the table up in the base schema first; only creates it when
    /// the lookup shows it missing. Existing columns are never deleted.
    pub async fn sync_table_with(&self, options: SyncOptions) -> Result<SyncReport> {
        let base_id = self.client.config().base_id().to_string();
        let tables = self.client.get_base_schema(&base_id).await?;
        let live = tables.into_iter().find(|t| t.name == self.table_name());

        let Some(live) = live else {
            if !options.create_missing {
                warn!(
                    "table '{}' does not exist and create_missing is off",
                    self.table_name()
                );
                return Ok(SyncReport::default());
            }
            debug!("table '{}' missing, creating it", self.table_name());
            let created = self.create_table().await?;
            return Ok(SyncReport {
                added: created.fields.into_iter().map(|f| f.name).collect(),
                ..SyncReport::default()
            });
        };

        let diff = validate_schema(&self.schema, &live);
        let mut report = SyncReport {
            skipped: diff.matching,
            ..SyncReport::default()
        };

        for column in diff.missing {
            if !options.create_missing {
                report.skipped.push(column);
                continue;
            }
            let descriptor = self
                .schema
                .field_by_column(&column)
                .ok_or_else(|| Error::validation(column.clone(), "not part of the schema"))?;
            debug!("creating column '{}' on '{}'", column, self.table_name());
            self.client
                .create_field(&live.id, &field_spec_json(descriptor))
                .await?;
            report.added.push(column);
        }

        for column in diff.type_mismatch {
            if options.update_types {
                let descriptor = self
                    .schema
                    .field_by_column(&column)
                    .ok_or_else(|| Error::validation(column.clone(), "not part of the schema"))?;
                let live_field = live
                    .field(&column)
                    .ok_or_else(|| Error::validation(column.clone(), "missing from live table"))?;
                debug!(
                    "updating column '{}' from '{}' to '{}'",
                    column,
                    live_field.field_type,
                    descriptor.field_type.as_api_name()
                );
                let patch = json!({
                    "type": descriptor.field_type.as_api_name(),
                    "options": descriptor.api_options(),
                });
                self.client
                    .update_field(&live.id, &live_field.id, &patch)
                    .await?;
            }
            report.updated.push(column);
        }

        Ok(report)
    }

    // ------------------------------------------------------------------------
    // (De)serialization against the schema
    // ------------------------------------------------------------------------

    /// Validate caller input and serialize it to a column-keyed payload
    ///
    /// Runs entirely before any network call. With `apply_defaults`,
    /// declared defaults fill in omitted writable fields.
    fn serialize_fields(&self, fields: &Fields, apply_defaults: bool) -> Result<JsonObject> {
        let mut payload = JsonObject::new();

        for (name, value) in fields {
            let descriptor = self
                .schema
                .field(name)
                .ok_or_else(|| Error::validation(name.clone(), "unknown field"))?;
            if !descriptor.is_writable() {
                return Err(Error::validation(name.clone(), "field is read-only"));
            }
            validate_choices(descriptor, value)?;
            payload.insert(
                descriptor.column_name.clone(),
                to_api_value(value, descriptor.field_type),
            );
        }

        if apply_defaults {
            for descriptor in self.schema.fields() {
                if !descriptor.is_writable() || fields.contains(&descriptor.name) {
                    continue;
                }
                if let Some(ref default) = descriptor.default {
                    payload.insert(
                        descriptor.column_name.clone(),
                        to_api_value(default, descriptor.field_type),
                    );
                }
            }
        }

        Ok(payload)
    }

    /// Build the equality-AND filter for a set of named filters
    fn build_filter(&self, filters: &Fields) -> Result<String> {
        let mut pairs: Vec<(&str, &FieldValue)> = Vec::with_capacity(filters.len());
        for (name, value) in filters {
            let descriptor = self
                .schema
                .field(name)
                .ok_or_else(|| Error::validation(name.clone(), "unknown field"))?;
            pairs.push((descriptor.column_name.as_str(), value));
        }
        Ok(formula::equality_and(&pairs))
    }

    /// Deserialize an API record through the schema's conversion table
    fn record_from_api(&self, api: ApiRecord) -> Record {
        let mut fields = BTreeMap::new();
        for descriptor in self.schema.fields() {
            if let Some(raw) = api.fields.get(&descriptor.column_name) {
                fields.insert(
                    descriptor.name.clone(),
                    from_api_value(raw, descriptor.field_type),
                );
            }
        }
        Record::new(api.id, fields, api.created_time)
    }
}

/// Render the metadata payload for creating one column
fn field_spec_json(descriptor: &FieldDescriptor) -> serde_json::Value {
    let mut spec = json!({
        "name": descriptor.column_name,
        "type": descriptor.field_type.as_api_name(),
    });
    if let Some(options) = descriptor.api_options() {
        spec["options"] = options;
    }
    spec
}

/// Reject select values outside the declared choice set
fn validate_choices(descriptor: &FieldDescriptor, value: &FieldValue) -> Result<()> {
    if descriptor.choices.is_empty() || value.is_null() {
        return Ok(());
    }

    match (descriptor.field_type, value) {
        (FieldType::SingleSelect, FieldValue::Text(choice)) => {
            if !descriptor.choices.iter().any(|c| c == choice) {
                return Err(Error::validation(
                    descriptor.name.clone(),
                    format!("'{choice}' is not one of the declared choices"),
                ));
            }
        }
        (FieldType::MultipleSelects, FieldValue::List(items)) => {
            for item in items {
                if !descriptor.choices.iter().any(|c| c == item) {
                    return Err(Error::validation(
                        descriptor.name.clone(),
                        format!("'{item}' is not one of the declared choices"),
                    ));
                }
            }
        }
        _ => {}
    }

    Ok(())
}
