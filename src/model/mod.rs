//! Record schemas and the table binding
//!
//! Declare a record shape once with [`RecordSchema::builder`], bind it to a
//! connection with [`Table::bind`], and use the resulting accessor for CRUD,
//! queries, and table provisioning.
//!
//! # Features
//!
//! - **Explicit Registration**: schemas are built from field descriptor
//!   lists; no runtime metaprogramming
//! - **Validation Before the Wire**: malformed input fails before any
//!   network call
//! - **Batched Creates**: `bulk_create` splits input into Airtable's
//!   ten-record batches, preserving order

mod binding;
mod record;
mod schema;

pub use binding::{SyncOptions, SyncReport, Table};
pub use record::{Fields, Record};
pub use schema::{Field, RecordSchema, SchemaBuilder};
