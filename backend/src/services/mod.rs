//! HTTP surface. Each sub-module exposes a `configure_routes()` returning its
//! Actix `Scope`; handlers are thin wrappers that move the blocking database
//! and file work off the async runtime.

pub mod data_sources;
pub mod health;
pub mod queries;
pub mod records;

use crate::error::{ServiceError, ServiceResult};
use actix_web::web;

/// Register every route. Used by `main` and by the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health::configure_routes())
        .service(data_sources::csv::configure_routes())
        .service(data_sources::csv::configure_legacy_routes())
        .service(queries::configure_routes())
        .service(records::configure_routes());
}

/// Run blocking work (rusqlite, file reads) on Tokio's blocking pool.
pub(crate) async fn run_blocking<T, F>(work: F) -> ServiceResult<T>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|join_err| ServiceError::Internal(format!("join error: {}", join_err)))?
}
