//! # Batch Record Insert
//!
//! Validates externally supplied JSON records against a resource's declared
//! shape and inserts them in a single bulk transaction.
//!
//! Unlike the CSV loader this path is all-or-nothing: the first record that
//! fails shape validation rejects the whole batch before anything is written.

use crate::error::{ServiceError, ServiceResult};
use crate::ingestion::coerce::{parse_datetime, TypedValue};
use crate::ingestion::schema::{SchemaRegistry, TableSchema};
use crate::ingestion::validate::AcceptedRecord;
use crate::ingestion::writer::bulk_insert;
use common::model::record::{DepartmentCreate, EmployeeCreate, JobCreate};
use common::model::resource::Resource;
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const MAX_BATCH: usize = 1000;

fn parse<T: DeserializeOwned>(value: &Value) -> Result<T, String> {
    T::deserialize(value).map_err(|e| e.to_string())
}

fn text(s: String) -> TypedValue {
    TypedValue::Text(s.trim().to_string())
}

/// Turn one JSON record into a row in schema column order.
fn to_record(resource: Resource, value: &Value) -> Result<AcceptedRecord, String> {
    let values = match resource {
        Resource::Departments => {
            let d: DepartmentCreate = parse(value)?;
            vec![TypedValue::Integer(d.id), text(d.department)]
        }
        Resource::Jobs => {
            let j: JobCreate = parse(value)?;
            vec![TypedValue::Integer(j.id), text(j.job)]
        }
        Resource::Employees => {
            let e: EmployeeCreate = parse(value)?;
            let datetime = match e.datetime.as_deref().map(str::trim) {
                None | Some("") => TypedValue::Null,
                Some(raw) => parse_datetime(raw)
                    .map(TypedValue::Timestamp)
                    .ok_or_else(|| format!("datetime: could not read '{}' as datetime", raw))?,
            };
            vec![
                TypedValue::Integer(e.id),
                text(e.name),
                datetime,
                TypedValue::Integer(e.department_id),
                TypedValue::Integer(e.job_id),
            ]
        }
    };
    Ok(AcceptedRecord::from_values(values))
}

fn check_required(schema: &TableSchema, record: &AcceptedRecord) -> Result<(), String> {
    for (column, value) in schema.columns().iter().zip(record.values()) {
        if column.requires_value() && value.is_null() {
            return Err(format!("missing required field: {}", column.name));
        }
        if column.requires_value() && matches!(value, TypedValue::Text(s) if s.is_empty()) {
            return Err(format!("{} must not be empty", column.name));
        }
    }
    Ok(())
}

/// Validate and insert a batch of records for `resource_name`.
///
/// Returns the number of inserted rows.
pub fn insert_batch(
    resource_name: &str,
    records: &[Value],
    registry: &SchemaRegistry,
    conn: &mut Connection,
) -> ServiceResult<usize> {
    let resource = Resource::from_name(resource_name)
        .ok_or_else(|| ServiceError::NotFound(format!("resource '{}'", resource_name)))?;

    if records.is_empty() || records.len() > MAX_BATCH {
        return Err(ServiceError::InvalidArgument(format!(
            "batch must contain between 1 and {} records, got {}",
            MAX_BATCH,
            records.len()
        )));
    }

    let schema = registry.get(resource)?;
    let validated = records
        .iter()
        .enumerate()
        .map(|(index, value)| {
            to_record(resource, value)
                .and_then(|record| check_required(schema, &record).map(|_| record))
                .map_err(|message| ServiceError::Validation { index, message })
        })
        .collect::<ServiceResult<Vec<_>>>()?;

    bulk_insert(conn, schema, &validated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn db() -> (SchemaRegistry, Connection) {
        let registry = SchemaRegistry::load().unwrap();
        let conn = Connection::open_in_memory().unwrap();
        for schema in registry.iter() {
            conn.execute(&schema.create_table_sql(), []).unwrap();
        }
        (registry, conn)
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
            .unwrap()
    }

    fn departments(n: usize) -> Vec<Value> {
        (1..=n)
            .map(|i| json!({ "id": i, "department": format!("Department {}", i) }))
            .collect()
    }

    #[test]
    fn unknown_resource_is_not_found() {
        let (registry, mut conn) = db();
        let err = insert_batch("widgets", &departments(1), &registry, &mut conn).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn batch_size_is_bounded() {
        let (registry, mut conn) = db();
        let err = insert_batch("departments", &[], &registry, &mut conn).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
        let err = insert_batch("departments", &departments(1001), &registry, &mut conn).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
        assert_eq!(count(&conn, "departments"), 0);
    }

    #[test]
    fn inserts_full_batch() {
        let (registry, mut conn) = db();
        let n = insert_batch("departments", &departments(500), &registry, &mut conn).unwrap();
        assert_eq!(n, 500);
        assert_eq!(count(&conn, "departments"), 500);
    }

    #[test]
    fn accepts_maximum_batch() {
        let (registry, mut conn) = db();
        let n = insert_batch("departments", &departments(MAX_BATCH), &registry, &mut conn).unwrap();
        assert_eq!(n, MAX_BATCH);
    }

    #[test]
    fn one_bad_record_rejects_the_batch() {
        let (registry, mut conn) = db();
        let mut batch: Vec<Value> = (1..=10)
            .map(|i| json!({ "id": i, "job": format!("Job {}", i) }))
            .collect();
        batch[2] = json!({ "id": 3 });
        let err = insert_batch("jobs", &batch, &registry, &mut conn).unwrap_err();
        match err {
            ServiceError::Validation { index, message } => {
                assert_eq!(index, 2);
                assert!(message.contains("job"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(count(&conn, "jobs"), 0);
    }

    #[test]
    fn reports_first_failure_only() {
        let (registry, mut conn) = db();
        let batch = vec![
            json!({ "id": 1, "job": "Analyst" }),
            json!({ "id": "two", "job": "Analyst" }),
            json!({ "job": "Analyst" }),
        ];
        let err = insert_batch("jobs", &batch, &registry, &mut conn).unwrap_err();
        assert!(matches!(err, ServiceError::Validation { index: 1, .. }));
    }

    #[test]
    fn employees_validate_datetime() {
        let (registry, mut conn) = db();
        let good = json!({
            "id": 1, "name": "Ada", "datetime": "2021-11-07T02:48:42Z",
            "department_id": 1, "job_id": 2
        });
        let bad = json!({
            "id": 2, "name": "Grace", "datetime": "last tuesday",
            "department_id": 1, "job_id": 2
        });
        let err = insert_batch("employees", &[good.clone(), bad], &registry, &mut conn).unwrap_err();
        assert!(matches!(err, ServiceError::Validation { index: 1, .. }));
        assert_eq!(insert_batch("employees", &[good], &registry, &mut conn).unwrap(), 1);
    }

    #[test]
    fn blank_required_text_is_invalid() {
        let (registry, mut conn) = db();
        let err = insert_batch("jobs", &[json!({ "id": 1, "job": "  " })], &registry, &mut conn)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation { index: 0, .. }));
    }

    #[test]
    fn duplicate_key_is_write_error_and_rolls_back() {
        let (registry, mut conn) = db();
        let batch = vec![
            json!({ "id": 1, "job": "Analyst" }),
            json!({ "id": 1, "job": "Recruiter" }),
        ];
        let err = insert_batch("jobs", &batch, &registry, &mut conn).unwrap_err();
        assert!(matches!(err, ServiceError::Write(_)));
        assert_eq!(count(&conn, "jobs"), 0);
    }
}
