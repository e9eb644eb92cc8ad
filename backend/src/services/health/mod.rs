use crate::services::run_blocking;
use crate::state::AppState;
use actix_web::web::{get, scope};
use actix_web::{web, HttpResponse, Responder, Scope};
use common::responses::HealthResponse;
use log::error;

const API_PATH: &str = "/health";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/db", get().to(process))
}

/// `GET /health/db`: `SELECT 1` against the configured database.
///
/// An unreachable database answers `500` with `status: "failed"`; it never
/// takes the server down.
pub(crate) async fn process(state: web::Data<AppState>) -> impl Responder {
    let db = state.db.clone();
    match run_blocking(move || db.ping()).await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse::ok()),
        Err(e) => {
            error!("Database health check failed: {}", e);
            HttpResponse::InternalServerError().json(HealthResponse::failed(format!(
                "Database connection failed: {}",
                e
            )))
        }
    }
}
