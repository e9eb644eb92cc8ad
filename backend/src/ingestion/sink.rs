//! Observer for per-row ingestion outcomes.
//!
//! The loader reports every accepted and rejected row here instead of logging
//! directly, so the process-wide log handle is injected rather than ambient and
//! tests can count outcomes. Implementations must not panic.

use super::schema::TableSchema;
use super::validate::{AcceptedRecord, Rejection};
use crate::error::ServiceError;
use common::model::report::IngestionReport;
use log::{error, info, warn};

/// Where the row a notification refers to came from.
#[derive(Debug, Clone, Copy)]
pub struct RowContext<'a> {
    pub load_id: &'a str,
    pub table: &'a str,
    /// 1-based physical record number in the source file.
    pub line: usize,
}

pub trait IngestionSink: Send + Sync {
    fn started(&self, _load_id: &str, _schema: &TableSchema, _source: &str) {}

    fn accepted(&self, _ctx: RowContext<'_>, _schema: &TableSchema, _record: &AcceptedRecord) {}

    fn rejected(&self, _ctx: RowContext<'_>, _raw: &[String], _reason: &Rejection) {}

    /// The commit failed; `pending` accepted rows were rolled back.
    fn rolled_back(&self, _load_id: &str, _table: &str, _pending: usize, _error: &ServiceError) {}

    fn finished(&self, _report: &IngestionReport) {}
}

/// Writes ingestion events through the `log` facade under the `ingest` target.
#[derive(Debug, Default)]
pub struct LogSink;

impl IngestionSink for LogSink {
    fn started(&self, load_id: &str, schema: &TableSchema, source: &str) {
        let names: Vec<&str> = schema.columns().iter().map(|c| c.name.as_str()).collect();
        info!(target: "ingest", "[{}] loading {} into {} using columns {:?}", load_id, source, schema.table(), names);
    }

    fn accepted(&self, ctx: RowContext<'_>, schema: &TableSchema, record: &AcceptedRecord) {
        info!(
            target: "ingest",
            "[{}] {} line {}: accepted {}",
            ctx.load_id,
            ctx.table,
            ctx.line,
            record.describe(schema)
        );
    }

    fn rejected(&self, ctx: RowContext<'_>, raw: &[String], reason: &Rejection) {
        warn!(
            target: "ingest",
            "[{}] {} line {}: skipping row {:?}: {}",
            ctx.load_id,
            ctx.table,
            ctx.line,
            raw,
            reason
        );
    }

    fn rolled_back(&self, load_id: &str, table: &str, pending: usize, err: &ServiceError) {
        error!(
            target: "ingest",
            "[{}] {}: rolled back {} accepted rows: {}",
            load_id,
            table,
            pending,
            err
        );
    }

    fn finished(&self, report: &IngestionReport) {
        info!(
            target: "ingest",
            "[{}] valid records loaded from {}: {} ({} read, {} rejected)",
            report.load_id,
            report.source,
            report.accepted,
            report.rows_read,
            report.rejected
        );
    }
}
