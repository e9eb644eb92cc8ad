//! Field-level coercion of raw text into typed values.
//!
//! Coercion is fail-soft: [`coerce`] never errors, a field that cannot be read
//! as its column type becomes [`TypedValue::Null`]. [`try_coerce`] exposes the
//! reason so the row validator can report it.

use super::schema::{ColumnSpec, LogicalType};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use rusqlite::types::{ToSql, ToSqlOutput};
use std::fmt;

/// Tokens read as "not available", in addition to empty/whitespace-only fields.
const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl TypedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, TypedValue::Null)
    }
}

/// Canonical text form. Coercing it against the matching column type yields
/// the same value back.
impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Null => Ok(()),
            TypedValue::Integer(v) => write!(f, "{}", v),
            TypedValue::Float(v) => write!(f, "{}", v),
            TypedValue::Text(v) => f.write_str(v),
            TypedValue::Timestamp(v) => f.write_str(&v.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }
}

impl ToSql for TypedValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            TypedValue::Null => ToSqlOutput::from(rusqlite::types::Null),
            TypedValue::Integer(v) => ToSqlOutput::from(*v),
            TypedValue::Float(v) => ToSqlOutput::from(*v),
            TypedValue::Text(v) => ToSqlOutput::from(v.as_str()),
            TypedValue::Timestamp(v) => {
                ToSqlOutput::from(v.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
        })
    }
}

/// Why a present field could not be read as its column type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoerceError {
    pub raw: String,
    pub expected: LogicalType,
}

impl fmt::Display for CoerceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not read '{}' as {}", self.raw, self.expected)
    }
}

impl std::error::Error for CoerceError {}

pub fn is_not_available(raw: Option<&str>) -> bool {
    match raw.map(str::trim) {
        None => true,
        Some(s) => s.is_empty() || NA_TOKENS.contains(&s),
    }
}

/// Coerce a raw field, turning anything unreadable into `Null`.
pub fn coerce(raw: Option<&str>, spec: &ColumnSpec) -> TypedValue {
    try_coerce(raw, spec).unwrap_or(TypedValue::Null)
}

/// Coerce a raw field. Absent and "not available" fields are `Ok(Null)`;
/// only a present field of the wrong shape is an error.
pub fn try_coerce(raw: Option<&str>, spec: &ColumnSpec) -> Result<TypedValue, CoerceError> {
    if is_not_available(raw) {
        return Ok(TypedValue::Null);
    }
    let trimmed = raw.map(str::trim).unwrap_or_default();
    let parsed = match spec.logical_type {
        LogicalType::Integer => parse_integer(trimmed).map(TypedValue::Integer),
        // the f64 parser takes "NAN", "+nan" and friends that the NA list misses
        LogicalType::Float => trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| !v.is_nan())
            .map(TypedValue::Float),
        LogicalType::DateTime => parse_datetime(trimmed).map(TypedValue::Timestamp),
        LogicalType::String => Some(TypedValue::Text(trimmed.to_string())),
    };
    parsed.ok_or_else(|| CoerceError {
        raw: trimmed.to_string(),
        expected: spec.logical_type,
    })
}

/// Integers written as floats ("34.0") are truncated.
fn parse_integer(s: &str) -> Option<i64> {
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let f = s.parse::<f64>().ok()?;
    let truncated = f.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is out of range
    if !truncated.is_finite() || truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return None;
    }
    Some(truncated as i64)
}

pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    None
}
