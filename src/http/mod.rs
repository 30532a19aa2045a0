//! HTTP client for the Airtable REST API
//!
//! A thin, authenticated wrapper over the record and metadata endpoints.
//!
//! # Features
//!
//! - **Bearer Auth**: personal access token attached to every request
//! - **Typed Errors**: non-2xx responses become [`crate::Error::Api`] with
//!   status and parsed body
//! - **Rate Limiting**: client-side token bucket plus a single fixed-wait
//!   retry on HTTP 429

mod client;
mod rate_limit;

pub use client::{
    AirtableClient, ApiRecord, ClientConfig, ClientConfigBuilder, ListParams, RecordPage,
    SortDirection,
};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
