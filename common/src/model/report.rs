use serde::{Deserialize, Serialize};

/// Outcome of one CSV load.
///
/// Counts cover every data line read from the source. Rejected rows are not
/// persisted; their reasons are listed here and written to the ingestion log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionReport {
    /// Correlates the per-row log lines of a single load.
    pub load_id: String,
    pub table: String,
    pub source: String,
    pub rows_read: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub rejections: Vec<RowRejection>,
}

/// A dropped row. `line` is the 1-based line number in the source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowRejection {
    pub line: usize,
    pub reason: String,
}
