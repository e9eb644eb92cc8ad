//! CSV ingestion pipeline: schema, coercion, row validation, bulk load.

pub mod coerce;
pub mod loader;
pub mod schema;
pub mod sink;
pub mod validate;
pub mod writer;

pub use loader::{load, resolve_source};
pub use schema::{columns_of, ColumnSpec, LogicalType, SchemaRegistry, TableSchema};
pub use sink::{IngestionSink, LogSink};
