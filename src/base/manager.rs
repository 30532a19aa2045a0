//! Base manager
//!
//! Direct, single-call wrappers around the metadata endpoints, scoped to
//! one configured connection.

use super::types::{BaseInfo, CreatedBase, TableSchema, TableSpec};
use crate::config::AirtableConfig;
use crate::error::Result;
use crate::http::{AirtableClient, ClientConfig};

/// Manager for base-level operations
#[derive(Debug)]
pub struct BaseManager {
    client: AirtableClient,
}

impl BaseManager {
    /// Create a manager with the default client configuration
    pub fn new(config: AirtableConfig) -> Result<Self> {
        Ok(Self {
            client: AirtableClient::new(config)?,
        })
    }

    /// Create a manager with a custom client configuration
    pub fn with_client_config(config: AirtableConfig, client_config: ClientConfig) -> Result<Self> {
        Ok(Self {
            client: AirtableClient::with_config(config, client_config)?,
        })
    }

    /// Create a manager around an existing client
    pub fn from_client(client: AirtableClient) -> Self {
        Self { client }
    }

    /// List all bases accessible with the configured token
    pub async fn list_bases(&self) -> Result<Vec<BaseInfo>> {
        self.client.list_bases().await
    }

    /// Fetch the table schemas of a base
    pub async fn get_base_schema(&self, base_id: &str) -> Result<Vec<TableSchema>> {
        self.client.get_base_schema(base_id).await
    }

    /// List the tables of the configured base
    pub async fn list_tables(&self) -> Result<Vec<TableSchema>> {
        self.client
            .get_base_schema(self.client.config().base_id())
            .await
    }

    /// Create a new base with an initial set of tables
    pub async fn create_base(
        &self,
        name: &str,
        tables: &[TableSpec],
        workspace_id: Option<&str>,
    ) -> Result<CreatedBase> {
        self.client.create_base(name, tables, workspace_id).await
    }

    /// Create a table in the configured base from a declared spec
    pub async fn create_table_from_schema(&self, spec: &TableSpec) -> Result<TableSchema> {
        self.client.create_table(spec).await
    }
}
