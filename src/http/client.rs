//! Airtable REST client
//!
//! Issues exactly one authenticated HTTP request per operation and
//! translates failures into typed errors. The only built-in recovery is
//! a single fixed-wait retry on HTTP 429; everything else surfaces to
//! the caller unchanged.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::base::{BaseInfo, CreatedBase, FieldSchema, TableSchema, TableSpec};
use crate::config::AirtableConfig;
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Production endpoint of the Airtable REST API
pub const DEFAULT_API_URL: &str = "https://api.airtable.com/v0";

/// Fallback wait before the single 429 retry when the response carries
/// no Retry-After header
const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_secs(30);

// ============================================================================
// Client configuration
// ============================================================================

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL; overridable so tests can point at a mock server
    pub api_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Client-side pacing; `None` disables it
    pub rate_limit: Option<RateLimiterConfig>,
    /// Wait before the single retry after an HTTP 429 without Retry-After
    pub rate_limit_wait: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("airmodel/{}", env!("CARGO_PKG_VERSION")),
            rate_limit: Some(RateLimiterConfig::default()),
            rate_limit_wait: DEFAULT_RATE_LIMIT_WAIT,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`]
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the API base URL
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set the rate limiter config
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable client-side rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Set the wait before the single 429 retry
    pub fn rate_limit_wait(mut self, wait: Duration) -> Self {
        self.config.rate_limit_wait = wait;
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

// ============================================================================
// List parameters
// ============================================================================

/// Sort direction for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// The wire name used in sort query parameters
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Parameters for a record-list request
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    /// `filterByFormula` expression
    pub filter_by_formula: Option<String>,
    /// Cap on the total number of records returned
    pub max_records: Option<u32>,
    /// Records per page (Airtable caps this at 100)
    pub page_size: Option<u32>,
    /// Continuation token from a previous page
    pub offset: Option<String>,
    /// Sort specifications, applied in order
    pub sort: Vec<(String, SortDirection)>,
}

impl ListParams {
    /// Create empty list parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter formula
    #[must_use]
    pub fn filter(mut self, formula: impl Into<String>) -> Self {
        self.filter_by_formula = Some(formula.into());
        self
    }

    /// Set the total record cap
    #[must_use]
    pub fn max_records(mut self, max: u32) -> Self {
        self.max_records = Some(max);
        self
    }

    /// Set the page size
    #[must_use]
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Set the continuation offset
    #[must_use]
    pub fn offset(mut self, offset: impl Into<String>) -> Self {
        self.offset = Some(offset.into());
        self
    }

    /// Add a sort specification
    #[must_use]
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort.push((field.into(), direction));
        self
    }

    /// Render as query parameters
    fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(ref formula) = self.filter_by_formula {
            query.push(("filterByFormula".to_string(), formula.clone()));
        }
        if let Some(max) = self.max_records {
            query.push(("maxRecords".to_string(), max.to_string()));
        }
        if let Some(size) = self.page_size {
            query.push(("pageSize".to_string(), size.to_string()));
        }
        if let Some(ref offset) = self.offset {
            query.push(("offset".to_string(), offset.clone()));
        }
        for (i, (field, direction)) in self.sort.iter().enumerate() {
            query.push((format!("sort[{i}][field]"), field.clone()));
            query.push((format!("sort[{i}][direction]"), direction.as_str().to_string()));
        }
        query
    }
}

// ============================================================================
// Wire types (record endpoints)
// ============================================================================

/// One record as returned by the record endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRecord {
    /// Server-assigned record id
    pub id: String,
    /// Column name → raw JSON value
    #[serde(default)]
    pub fields: JsonObject,
    /// Creation timestamp
    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,
}

/// One page of a record-list response
#[derive(Debug, Clone, Deserialize)]
pub struct RecordPage {
    /// Records on this page
    #[serde(default)]
    pub records: Vec<ApiRecord>,
    /// Continuation token; absent on the last page
    #[serde(default)]
    pub offset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecordsEnvelope {
    #[serde(default)]
    records: Vec<ApiRecord>,
}

#[derive(Debug, Deserialize)]
struct BaseList {
    #[serde(default)]
    bases: Vec<BaseInfo>,
}

#[derive(Debug, Deserialize)]
struct TableList {
    #[serde(default)]
    tables: Vec<TableSchema>,
}

// ============================================================================
// Client
// ============================================================================

/// Authenticated client for the Airtable record and metadata endpoints
pub struct AirtableClient {
    http: Client,
    api_url: Url,
    config: AirtableConfig,
    limiter: Option<RateLimiter>,
    rate_limit_wait: Duration,
}

impl AirtableClient {
    /// Create a client with the default client configuration
    pub fn new(config: AirtableConfig) -> Result<Self> {
        Self::with_config(config, ClientConfig::default())
    }

    /// Create a client with a custom client configuration
    pub fn with_config(config: AirtableConfig, client_config: ClientConfig) -> Result<Self> {
        let api_url = Url::parse(&client_config.api_url)?;
        if api_url.cannot_be_a_base() {
            return Err(Error::config("API base URL cannot be path-extended"));
        }

        let http = Client::builder()
            .timeout(client_config.timeout)
            .user_agent(&client_config.user_agent)
            .build()?;

        let limiter = client_config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            http,
            api_url,
            config,
            limiter,
            rate_limit_wait: client_config.rate_limit_wait,
        })
    }

    /// The connection config this client was built from
    pub fn config(&self) -> &AirtableConfig {
        &self.config
    }

    // ------------------------------------------------------------------------
    // Record endpoints: /v0/{base}/{table}
    // ------------------------------------------------------------------------

    /// List records, one page per call
    pub async fn list_records(&self, table: &str, params: &ListParams) -> Result<RecordPage> {
        let url = self.endpoint(&[self.config.base_id(), table])?;
        let value = self
            .request(Method::GET, url, &params.to_query(), None)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Fetch a single record by id
    ///
    /// HTTP 404 maps to [`Error::RecordNotFound`].
    pub async fn get_record(&self, table: &str, id: &str) -> Result<ApiRecord> {
        let url = self.endpoint(&[self.config.base_id(), table, id])?;
        match self.request(Method::GET, url, &[], None).await {
            Ok(value) => Ok(serde_json::from_value(value)?),
            Err(Error::Api { status: 404, .. }) => Err(Error::record_not_found(id)),
            Err(e) => Err(e),
        }
    }

    /// Create a single record
    pub async fn create_record(&self, table: &str, fields: &JsonObject) -> Result<ApiRecord> {
        let url = self.endpoint(&[self.config.base_id(), table])?;
        let body = json!({ "fields": fields });
        let value = self.request(Method::POST, url, &[], Some(&body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Create up to ten records in one call
    pub async fn create_records(
        &self,
        table: &str,
        batch: &[JsonObject],
    ) -> Result<Vec<ApiRecord>> {
        let url = self.endpoint(&[self.config.base_id(), table])?;
        let records: Vec<JsonValue> = batch.iter().map(|f| json!({ "fields": f })).collect();
        let body = json!({ "records": records });
        let value = self.request(Method::POST, url, &[], Some(&body)).await?;
        let envelope: RecordsEnvelope = serde_json::from_value(value)?;
        Ok(envelope.records)
    }

    /// Update a record's fields (PATCH; unnamed fields are left untouched)
    pub async fn update_record(
        &self,
        table: &str,
        id: &str,
        fields: &JsonObject,
    ) -> Result<ApiRecord> {
        let url = self.endpoint(&[self.config.base_id(), table, id])?;
        let body = json!({ "fields": fields });
        let value = self.request(Method::PATCH, url, &[], Some(&body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Delete a record by id
    pub async fn delete_record(&self, table: &str, id: &str) -> Result<()> {
        let url = self.endpoint(&[self.config.base_id(), table, id])?;
        self.request(Method::DELETE, url, &[], None).await?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Metadata endpoints: /v0/meta/...
    // ------------------------------------------------------------------------

    /// List bases accessible to the token
    pub async fn list_bases(&self) -> Result<Vec<BaseInfo>> {
        let url = self.endpoint(&["meta", "bases"])?;
        let value = self.request(Method::GET, url, &[], None).await?;
        let list: BaseList = serde_json::from_value(value)?;
        Ok(list.bases)
    }

    /// Fetch the table schemas of a base
    pub async fn get_base_schema(&self, base_id: &str) -> Result<Vec<TableSchema>> {
        let url = self.endpoint(&["meta", "bases", base_id, "tables"])?;
        let value = self.request(Method::GET, url, &[], None).await?;
        let list: TableList = serde_json::from_value(value)?;
        Ok(list.tables)
    }

    /// Create a base with an initial set of tables
    pub async fn create_base(
        &self,
        name: &str,
        tables: &[TableSpec],
        workspace_id: Option<&str>,
    ) -> Result<CreatedBase> {
        let url = self.endpoint(&["meta", "bases"])?;
        let mut body = json!({ "name": name, "tables": tables });
        if let Some(workspace) = workspace_id {
            body["workspaceId"] = json!(workspace);
        }
        let value = self.request(Method::POST, url, &[], Some(&body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Create a table in the configured base
    pub async fn create_table(&self, spec: &TableSpec) -> Result<TableSchema> {
        let url = self.endpoint(&["meta", "bases", self.config.base_id(), "tables"])?;
        let body = serde_json::to_value(spec)?;
        let value = self.request(Method::POST, url, &[], Some(&body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Add a field to an existing table in the configured base
    pub async fn create_field(&self, table_id: &str, spec: &JsonValue) -> Result<FieldSchema> {
        let url = self.endpoint(&[
            "meta",
            "bases",
            self.config.base_id(),
            "tables",
            table_id,
            "fields",
        ])?;
        let value = self.request(Method::POST, url, &[], Some(spec)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Update a field of an existing table in the configured base
    pub async fn update_field(
        &self,
        table_id: &str,
        field_id: &str,
        patch: &JsonValue,
    ) -> Result<FieldSchema> {
        let url = self.endpoint(&[
            "meta",
            "bases",
            self.config.base_id(),
            "tables",
            table_id,
            "fields",
            field_id,
        ])?;
        let value = self.request(Method::PATCH, url, &[], Some(patch)).await?;
        Ok(serde_json::from_value(value)?)
    }

    // ------------------------------------------------------------------------
    // Request plumbing
    // ------------------------------------------------------------------------

    /// Build an endpoint URL under the API base
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::config("API base URL cannot be path-extended"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issue one request; on 429 sleep a fixed interval and retry exactly once
    async fn request(
        &self,
        method: Method,
        url: Url,
        query: &[(String, String)],
        body: Option<&JsonValue>,
    ) -> Result<JsonValue> {
        let mut retried = false;

        loop {
            if let Some(ref limiter) = self.limiter {
                limiter.wait().await;
            }

            let mut req = self
                .http
                .request(method.clone(), url.clone())
                .bearer_auth(self.config.access_token());

            if !query.is_empty() {
                req = req.query(query);
            }
            if let Some(body) = body {
                req = req.json(body);
            }

            let response = req.send().await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let wait = retry_after(&response).unwrap_or(self.rate_limit_wait);
                if !retried {
                    warn!("rate limited (429), waiting {:?} before one retry", wait);
                    tokio::time::sleep(wait).await;
                    retried = true;
                    continue;
                }
                return Err(Error::RateLimited {
                    retry_after_seconds: wait.as_secs(),
                });
            }

            let text = response.text().await?;
            if !status.is_success() {
                return Err(api_error(status.as_u16(), &text));
            }

            debug!("{} {} succeeded", method, url);
            if text.is_empty() {
                return Ok(JsonValue::Null);
            }
            return Ok(serde_json::from_str(&text)?);
        }
    }
}

impl std::fmt::Debug for AirtableClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirtableClient")
            .field("api_url", &self.api_url.as_str())
            .field("base_id", &self.config.base_id())
            .field("has_rate_limiter", &self.limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Extract the Retry-After header as a duration
fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .map(Duration::from_secs)
}

/// Build a typed API error from a non-2xx response body
///
/// Airtable wraps errors as `{"error": {"type": ..., "message": ...}}`, or
/// occasionally `{"error": "NOT_FOUND"}`.
fn api_error(status: u16, body: &str) -> Error {
    let message = serde_json::from_str::<JsonValue>(body)
        .ok()
        .and_then(|v| {
            let error = v.get("error")?.clone();
            error
                .get("message")
                .and_then(JsonValue::as_str)
                .map(str::to_string)
                .or_else(|| error.as_str().map(str::to_string))
        })
        .unwrap_or_else(|| format!("HTTP {status}"));

    Error::api(status, message, body)
}
