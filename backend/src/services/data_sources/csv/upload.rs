use crate::error::{ServiceError, ServiceResult};
use crate::ingestion::{load, resolve_source};
use crate::services::run_blocking;
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::report::IngestionReport;
use common::model::resource::Resource;
use common::requests::UploadCsvRequest;
use log::info;

fn respond(result: ServiceResult<IngestionReport>) -> HttpResponse {
    match result {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => e.error_response(),
    }
}

/// HTTP handler for `POST /api/data_sources/csv/upload`.
pub(crate) async fn process(
    state: web::Data<AppState>,
    req: web::Json<UploadCsvRequest>,
) -> impl Responder {
    let req = req.into_inner();
    respond(upload_csv(state.get_ref().clone(), &req.table, req.file).await)
}

/// HTTP handler for `POST /upload/csv`.
pub(crate) async fn process_default(state: web::Data<AppState>) -> impl Responder {
    respond(upload_csv(state.get_ref().clone(), Resource::Departments.name(), None).await)
}

/// Load one CSV file from the data directory into `table`.
pub async fn upload_csv(
    state: AppState,
    table: &str,
    file: Option<String>,
) -> ServiceResult<IngestionReport> {
    let resource = Resource::from_name(table)
        .ok_or_else(|| ServiceError::NotFound(format!("table '{}'", table)))?;
    let file = file.unwrap_or_else(|| format!("{}.csv", resource.name()));

    let report = run_blocking(move || {
        let source = resolve_source(&state.config.data_dir, &file)?;
        let schema = state.schemas.get(resource)?;
        let mut conn = state.db.connect()?;
        load(&source, schema, &mut conn, state.sink.as_ref())
    })
    .await?;

    info!(
        "Loaded {} into {}: {} accepted, {} rejected",
        report.source, report.table, report.accepted, report.rejected
    );
    Ok(report)
}
