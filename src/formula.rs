//! Airtable filter formula construction
//!
//! Builds `filterByFormula` expressions from equality filters. One filter
//! renders as `{Column}=value`; several are combined with `AND(...)`.
//! No other expression language is supported.

use crate::fields::FieldValue;
use chrono::SecondsFormat;

/// Build an equality-AND filter formula
///
/// Pairs are (column name, value). An empty slice yields an empty formula.
pub fn equality_and(filters: &[(&str, &FieldValue)]) -> String {
    let clauses: Vec<String> = filters
        .iter()
        .map(|(column, value)| format!("{{{column}}}={}", render_value(value)))
        .collect();

    match clauses.len() {
        0 => String::new(),
        1 => clauses.into_iter().next().unwrap_or_default(),
        _ => format!("AND({})", clauses.join(",")),
    }
}

/// Render a value as an Airtable formula literal
fn render_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Null => "BLANK()".to_string(),
        FieldValue::Text(s) => quote(s),
        FieldValue::Number(n) => render_number(*n),
        FieldValue::Bool(true) => "TRUE()".to_string(),
        FieldValue::Bool(false) => "FALSE()".to_string(),
        FieldValue::DateTime(dt) => quote(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        FieldValue::Date(d) => quote(&d.format("%Y-%m-%d").to_string()),
        FieldValue::Duration(seconds) => seconds.to_string(),
        // multi-select cells compare against their comma-joined string form
        FieldValue::List(items) => quote(&items.join(", ")),
        FieldValue::Json(v) => quote(&v.to_string()),
    }
}

/// Whole numbers render bare, everything else keeps its fraction
fn render_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Single-quote a string literal, escaping embedded quotes and backslashes
fn quote(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_single_equality() {
        let value = FieldValue::Text("Alice".to_string());
        assert_eq!(equality_and(&[("Name", &value)]), "{Name}='Alice'");
    }

    #[test]
    fn test_multiple_equalities_joined_with_and() {
        let a = FieldValue::Number(1.0);
        let b = FieldValue::Text("x".to_string());
        assert_eq!(
            equality_and(&[("a", &a), ("b", &b)]),
            "AND({a}=1,{b}='x')"
        );
    }

    #[test]
    fn test_empty_filters() {
        assert_eq!(equality_and(&[]), "");
    }

    #[test]
    fn test_boolean_rendering() {
        let yes = FieldValue::Bool(true);
        let no = FieldValue::Bool(false);
        assert_eq!(equality_and(&[("Active", &yes)]), "{Active}=TRUE()");
        assert_eq!(equality_and(&[("Active", &no)]), "{Active}=FALSE()");
    }

    #[test]
    fn test_number_rendering() {
        assert_eq!(render_number(42.0), "42");
        assert_eq!(render_number(-7.0), "-7");
        assert_eq!(render_number(2.5), "2.5");
    }

    #[test]
    fn test_quote_escaping() {
        let value = FieldValue::Text("O'Brien".to_string());
        assert_eq!(equality_and(&[("Name", &value)]), r"{Name}='O\'Brien'");
    }

    #[test]
    fn test_date_and_datetime_rendering() {
        let d = FieldValue::Date(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
        assert_eq!(equality_and(&[("Due", &d)]), "{Due}='2024-06-30'");

        let dt = FieldValue::DateTime(Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap());
        assert_eq!(
            equality_and(&[("At", &dt)]),
            "{At}='2024-06-30T12:00:00Z'"
        );
    }

    #[test]
    fn test_null_renders_blank() {
        let value = FieldValue::Null;
        assert_eq!(equality_and(&[("Owner", &value)]), "{Owner}=BLANK()");
    }
}
