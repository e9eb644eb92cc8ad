//! # Bulk CSV Loader
//!
//! Loads a headerless, positional CSV file into one resource table.
//!
//! ## Workflow
//!
//! 1.  **Source check**: the path must name a readable file, otherwise the load
//!     fails with `SourceNotFound` before any schema work. HTTP callers resolve
//!     user-supplied names with [`resolve_source`], which also confines them to
//!     the configured data directory.
//!
//! 2.  **Read**: every line is data (no header row). Blank lines are skipped.
//!     Fields are matched to the schema by position, so a row whose field count
//!     differs from the column count is rejected rather than mapped.
//!
//! 3.  **Validate**: rows are coerced and checked in parallel with rayon. Row
//!     order is preserved. A rejected row is reported to the sink and dropped;
//!     it never fails the load.
//!
//! 4.  **Commit**: accepted rows go to the database in a single transaction via
//!     `writer::bulk_insert`. A write failure rolls back everything and is
//!     returned as `ServiceError::Write`.

use super::schema::TableSchema;
use super::sink::{IngestionSink, RowContext};
use super::validate::{validate, AcceptedRecord, Rejection};
use super::writer::bulk_insert;
use crate::error::{ServiceError, ServiceResult};
use common::model::report::{IngestionReport, RowRejection};
use rayon::prelude::*;
use rusqlite::Connection;
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

type RawRow = Result<Vec<String>, Rejection>;

/// Resolve `file` inside `data_dir`.
///
/// Absolute paths, `..` components and symlinks escaping the directory are
/// refused the same way as missing files.
pub fn resolve_source(data_dir: &Path, file: &str) -> ServiceResult<PathBuf> {
    let relative = Path::new(file);
    let plain = !file.trim().is_empty()
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if !plain {
        return Err(ServiceError::SourceNotFound(format!(
            "'{}' is not a file name inside the data directory",
            file
        )));
    }

    let root = data_dir.canonicalize().map_err(|e| {
        ServiceError::SourceNotFound(format!("data directory {}: {}", data_dir.display(), e))
    })?;
    let candidate = root
        .join(relative)
        .canonicalize()
        .map_err(|e| ServiceError::SourceNotFound(format!("{}: {}", file, e)))?;
    if !candidate.starts_with(&root) || !candidate.is_file() {
        return Err(ServiceError::SourceNotFound(format!(
            "'{}' is not a file inside the data directory",
            file
        )));
    }
    Ok(candidate)
}

fn read_rows(source: &Path) -> ServiceResult<Vec<(usize, RawRow)>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(source)
        .map_err(|e| ServiceError::SourceNotFound(format!("{}: {}", source.display(), e)))?;

    let mut rows = Vec::new();
    for (i, result) in rdr.byte_records().enumerate() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(i + 1);
        let decoded: Result<Vec<String>, _> = record
            .iter()
            .map(|field| String::from_utf8(field.to_vec()))
            .collect();
        let row = decoded.map_err(|e| Rejection::Unreadable {
            message: format!(
                "{} in {:?}",
                e.utf8_error(),
                String::from_utf8_lossy(record.as_slice())
            ),
        });
        rows.push((line, row));
    }
    Ok(rows)
}

fn check_row(raw: &RawRow, schema: &TableSchema) -> Result<AcceptedRecord, Rejection> {
    let fields = raw.as_ref().map_err(|r| r.clone())?;
    if fields.len() != schema.len() {
        return Err(Rejection::FieldCount {
            expected: schema.len(),
            found: fields.len(),
        });
    }
    validate(fields, schema)
}

/// Load `source` into the table described by `schema`.
pub fn load(
    source: &Path,
    schema: &TableSchema,
    conn: &mut Connection,
    sink: &dyn IngestionSink,
) -> ServiceResult<IngestionReport> {
    if !source.is_file() {
        return Err(ServiceError::SourceNotFound(source.display().to_string()));
    }

    let load_id = Uuid::new_v4().to_string();
    let source_name = source.display().to_string();
    sink.started(&load_id, schema, &source_name);

    let rows = read_rows(source)?;
    let outcomes: Vec<(usize, RawRow, Result<AcceptedRecord, Rejection>)> = rows
        .into_par_iter()
        .map(|(line, raw)| {
            let outcome = check_row(&raw, schema);
            (line, raw, outcome)
        })
        .collect();

    let rows_read = outcomes.len();
    let mut accepted = Vec::with_capacity(rows_read);
    let mut rejections = Vec::new();
    for (line, raw, outcome) in outcomes {
        let ctx = RowContext {
            load_id: &load_id,
            table: schema.table(),
            line,
        };
        match outcome {
            Ok(record) => {
                sink.accepted(ctx, schema, &record);
                accepted.push(record);
            }
            Err(reason) => {
                sink.rejected(ctx, raw.as_deref().unwrap_or_default(), &reason);
                rejections.push(RowRejection {
                    line,
                    reason: reason.to_string(),
                });
            }
        }
    }

    let inserted = match bulk_insert(conn, schema, &accepted) {
        Ok(n) => n,
        Err(e) => {
            sink.rolled_back(&load_id, schema.table(), accepted.len(), &e);
            return Err(e);
        }
    };

    let report = IngestionReport {
        load_id,
        table: schema.table().to_string(),
        source: source_name,
        rows_read,
        accepted: inserted,
        rejected: rejections.len(),
        rejections,
    };
    sink.finished(&report);
    Ok(report)
}
