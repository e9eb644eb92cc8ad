//! # Named SQL Queries
//!
//! Runs a `.sql` template from the queries directory with caller-supplied
//! parameters and returns every row as a column-name to JSON value map.
//!
//! Parameters are bound by name. A JSON key `dept` fills `:dept`, `@dept` or
//! `$dept` in the template; keys the template does not use are ignored, and a
//! placeholder left without a value fails the query.

use crate::error::{ServiceError, ServiceResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use regex::Regex;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::Connection;
use serde_json::{Map, Number, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub type Row = Map<String, Value>;

fn template_path(queries_dir: &Path, name: &str) -> ServiceResult<PathBuf> {
    let name_re = Regex::new(r"^[A-Za-z0-9_\-]+$")
        .map_err(|e| ServiceError::Internal(format!("Regex error: {}", e)))?;
    let not_found = || ServiceError::NotFound(format!("query '{}'", name));
    if !name_re.is_match(name) {
        return Err(not_found());
    }
    let path = queries_dir.join(format!("{}.sql", name));
    if !path.is_file() {
        return Err(not_found());
    }
    Ok(path)
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => n.as_f64().map(SqlValue::Real).unwrap_or(SqlValue::Null),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::String(STANDARD.encode(b)),
    }
}

/// Execute `<queries_dir>/<name>.sql` with `params`.
pub fn run_named_query(
    conn: &Connection,
    queries_dir: &Path,
    name: &str,
    params: &Map<String, Value>,
) -> ServiceResult<Vec<Row>> {
    let path = template_path(queries_dir, name)?;
    let sql = fs::read_to_string(&path)?;
    let query_err = |e: rusqlite::Error| ServiceError::Query(format!("{}: {}", name, e));

    let mut stmt = conn.prepare(sql.trim()).map_err(query_err)?;

    let mut bound = vec![false; stmt.parameter_count()];
    for (key, value) in params {
        for prefix in [':', '@', '$'] {
            let placeholder = format!("{}{}", prefix, key);
            if let Some(idx) = stmt.parameter_index(&placeholder).map_err(query_err)? {
                stmt.raw_bind_parameter(idx, to_sql_value(value))
                    .map_err(query_err)?;
                bound[idx - 1] = true;
            }
        }
    }
    if let Some(missing) = bound.iter().position(|b| !b) {
        let placeholder = stmt
            .parameter_name(missing + 1)
            .map(str::to_string)
            .unwrap_or_else(|| format!("?{}", missing + 1));
        return Err(ServiceError::Query(format!(
            "{}: no value for parameter {}",
            name, placeholder
        )));
    }

    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let mut rows = stmt.raw_query();
    let mut out = Vec::new();
    while let Some(row) = rows.next().map_err(query_err)? {
        let mut record = Map::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            let value = row.get_ref(i).map_err(query_err)?;
            record.insert(column.clone(), to_json(value));
        }
        out.push(record);
    }
    Ok(out)
}
