//! Loads headerless CSV files from the data directory into resource tables.
//!
//! The provided routes are:
//! - `POST /api/data_sources/csv/upload`: body `{"table": "...", "file": "..."}`. `file` is a
//!   name inside the configured data directory and defaults to `<table>.csv`. Responds with
//!   the `IngestionReport` of the load. Malformed rows are dropped and listed in the report;
//!   they do not fail the request.
//!
//! - `POST /upload/csv`: the original fixed trigger, loading `departments.csv` into the
//!   `departments` table.

use actix_web::web::{post, scope};
use actix_web::Scope;

mod upload;

const API_PATH: &str = "/api/data_sources/csv";

/// Configures and returns the Actix scope for CSV data source routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/upload", post().to(upload::process))
}

pub fn configure_legacy_routes() -> Scope {
    scope("/upload").route("/csv", post().to(upload::process_default))
}
