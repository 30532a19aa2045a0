//! # airmodel
//!
//! A minimal, Rust-native data-model binding layer for the Airtable REST API.
//! Declare a record shape once, get typed CRUD and schema provisioning.
//!
//! ## Features
//!
//! - **Declarative Schemas**: Build a record schema from field descriptors
//! - **Smart Type Detection**: Field names and declared types map to Airtable column types
//! - **Typed CRUD**: create / get / save / delete / all / find_by / first / bulk_create
//! - **Table Provisioning**: Create tables and sync declared schemas against live bases
//! - **Base Management**: List bases, inspect schemas, create bases and tables
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use airmodel::{AirtableConfig, DeclaredType, Field, Fields, RecordSchema, Table, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AirtableConfig::from_env()?;
//!
//!     let schema = RecordSchema::builder("Users")
//!         .field(Field::new("name", DeclaredType::Text))
//!         .field(Field::new("email", DeclaredType::Text)) // detected as an email column
//!         .field(Field::new("age", DeclaredType::optional(DeclaredType::Integer)))
//!         .build()?;
//!
//!     let users = Table::bind(schema, config)?;
//!
//!     let alice = users
//!         .create(Fields::new().set("name", "Alice").set("email", "alice@example.com"))
//!         .await?;
//!
//!     let fetched = users.get(alice.id()).await?;
//!     println!("{:?}", fetched.get("email"));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Table (binding)                          │
//! │  create / get / save / delete      all / find_by / first        │
//! │  bulk_create                       create_table / sync_table    │
//! └───────────────┬─────────────────────────────────┬───────────────┘
//!                 │                                 │
//! ┌───────────────┴───────────────┐ ┌───────────────┴───────────────┐
//! │         Field Resolver        │ │        AirtableClient         │
//! │  name patterns → column type  │ │  records + metadata endpoints │
//! │  value (de)serialization      │ │  bearer auth, rate limiting   │
//! └───────────────────────────────┘ └───────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the library
pub mod error;

/// Common types and type aliases
pub mod types;

/// Connection configuration
pub mod config;

/// Field model: column types, type resolution, value conversion
pub mod fields;

/// Filter formula construction
pub mod formula;

/// HTTP client for the Airtable REST API
pub mod http;

/// Record schemas and the table binding
pub mod model;

/// Base and table management
pub mod base;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use base::{validate_schema, BaseManager, SchemaDiff, TableSchema};
pub use config::{current_config, init_current_config, AirtableConfig};
pub use error::{Error, Result};
pub use fields::{DeclaredType, FieldDescriptor, FieldType, FieldValue};
pub use http::{AirtableClient, ClientConfig, ListParams};
pub use model::{Field, Fields, Record, RecordSchema, SyncOptions, SyncReport, Table};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
