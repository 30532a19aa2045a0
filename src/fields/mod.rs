//! Field model
//!
//! Column types, declared value shapes, field descriptors, smart type
//! resolution from field names, and value conversion to and from the
//! Airtable JSON encodings.
//!
//! # Features
//!
//! - **Closed Column-Type Set**: [`FieldType`] covers the Airtable column types
//!   this library declares, matched exhaustively
//! - **Smart Detection**: field names like `email`, `website` or `description`
//!   select the matching column type for string fields
//! - **Typed Values**: [`FieldValue`] carries runtime values with lossless
//!   conversion for datetimes, dates and durations

mod resolve;
mod types;
mod value;

pub use resolve::resolve_field_type;
pub use types::{DeclaredType, FieldDescriptor, FieldType};
pub use value::{from_api_value, to_api_value, FieldValue};
