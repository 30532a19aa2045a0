//! Field type resolution
//!
//! Maps (field name, declared type, explicit override) to an Airtable
//! column type. Resolution order, first match wins:
//!
//! 1. Explicit override (descriptor metadata arrives through the same
//!    parameter)
//! 2. For string-shaped fields, name-pattern groups in order:
//!    email, url, phone, long text
//! 3. Base-type mapping, with a currency/percent refinement for numbers
//! 4. Fallback to single-line text

use super::types::{DeclaredType, FieldType};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)email|e_mail|mail|contact").unwrap());

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)url|link|website|site|href").unwrap());

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)phone|tel|mobile|cell").unwrap());

static LONG_TEXT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)description|comment|note|bio|summary|content|body|message|detail").unwrap()
});

static CURRENCY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)price|cost|amount|fee|salary|wage|revenue|budget|payment").unwrap());

static PERCENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)percent|percentage|rate|ratio").unwrap());

/// Resolve the Airtable column type for a field
pub fn resolve_field_type(
    field_name: &str,
    declared: &DeclaredType,
    explicit: Option<FieldType>,
) -> FieldType {
    if let Some(field_type) = explicit {
        return field_type;
    }

    match declared.base() {
        DeclaredType::Text => {
            detect_from_name(field_name).unwrap_or(FieldType::SingleLineText)
        }
        DeclaredType::Integer | DeclaredType::Float => refine_number(field_name),
        DeclaredType::Bool => FieldType::Checkbox,
        DeclaredType::DateTime => FieldType::DateTime,
        DeclaredType::Date => FieldType::Date,
        DeclaredType::Duration => FieldType::Duration,
        DeclaredType::TextList => FieldType::MultipleSelects,
        DeclaredType::Enumeration => FieldType::SingleSelect,
        // base() never returns Optional
        DeclaredType::Optional(inner) => resolve_field_type(field_name, inner, None),
    }
}

/// Detect a column type from the field name, for string-shaped fields
fn detect_from_name(field_name: &str) -> Option<FieldType> {
    if EMAIL_PATTERN.is_match(field_name) {
        return Some(FieldType::Email);
    }
    if URL_PATTERN.is_match(field_name) {
        return Some(FieldType::Url);
    }
    if PHONE_PATTERN.is_match(field_name) {
        return Some(FieldType::PhoneNumber);
    }
    if LONG_TEXT_PATTERN.is_match(field_name) {
        return Some(FieldType::MultilineText);
    }
    None
}

/// Refine a numeric field by name: currency and percent names get
/// the matching column type, everything else stays a plain number
fn refine_number(field_name: &str) -> FieldType {
    if CURRENCY_PATTERN.is_match(field_name) {
        return FieldType::Currency;
    }
    if PERCENT_PATTERN.is_match(field_name) {
        return FieldType::Percent;
    }
    FieldType::Number
}
