use super::schema::TableSchema;
use super::validate::AcceptedRecord;
use crate::error::{ServiceError, ServiceResult};
use rusqlite::{params_from_iter, Connection};

/// Insert every record in one transaction and commit.
///
/// Either all records are committed or none are: any insert or commit failure
/// drops the transaction, which rolls it back, and surfaces as
/// [`ServiceError::Write`]. An empty slice is a no-op.
pub fn bulk_insert(
    conn: &mut Connection,
    schema: &TableSchema,
    records: &[AcceptedRecord],
) -> ServiceResult<usize> {
    if records.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction().map_err(ServiceError::Write)?;
    {
        let mut stmt = tx.prepare(&schema.insert_sql()).map_err(ServiceError::Write)?;
        for record in records {
            stmt.execute(params_from_iter(record.values()))
                .map_err(ServiceError::Write)?;
        }
    }
    tx.commit().map_err(ServiceError::Write)?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::coerce::TypedValue;
    use crate::ingestion::schema::columns_of;
    use common::model::resource::Resource;

    fn jobs_db() -> (Connection, TableSchema) {
        let schema = columns_of(Resource::Jobs).unwrap();
        let conn = Connection::open_in_memory().unwrap();
        conn.execute(&schema.create_table_sql(), []).unwrap();
        (conn, schema)
    }

    fn job(id: i64, name: &str) -> AcceptedRecord {
        AcceptedRecord::from_values(vec![TypedValue::Integer(id), TypedValue::Text(name.into())])
    }

    fn count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM jobs", [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn commits_all_records() {
        let (mut conn, schema) = jobs_db();
        let n = bulk_insert(&mut conn, &schema, &[job(1, "Recruiter"), job(2, "Manager")]).unwrap();
        assert_eq!(n, 2);
        assert_eq!(count(&conn), 2);
    }

    #[test]
    fn empty_batch_is_noop() {
        let (mut conn, schema) = jobs_db();
        assert_eq!(bulk_insert(&mut conn, &schema, &[]).unwrap(), 0);
        assert_eq!(count(&conn), 0);
    }

    #[test]
    fn failure_rolls_back_whole_batch() {
        let (mut conn, schema) = jobs_db();
        // duplicate primary key on the third record
        let records = [job(1, "Recruiter"), job(2, "Manager"), job(1, "Analyst")];
        let err = bulk_insert(&mut conn, &schema, &records).unwrap_err();
        assert!(matches!(err, ServiceError::Write(_)));
        assert_eq!(count(&conn), 0);
    }

    #[test]
    fn null_primary_key_is_assigned() {
        let (mut conn, schema) = jobs_db();
        let record = AcceptedRecord::from_values(vec![TypedValue::Null, TypedValue::Text("Intern".into())]);
        bulk_insert(&mut conn, &schema, &[record]).unwrap();
        let id: i64 = conn
            .query_row("SELECT id FROM jobs WHERE job = 'Intern'", [], |r| r.get(0))
            .unwrap();
        assert!(id > 0);
    }
}
