use crate::records::insert_batch;
use crate::services::run_blocking;
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::responses::InsertResponse;
use log::info;
use serde_json::Value;

pub(crate) async fn process(
    state: web::Data<AppState>,
    resource: web::Path<String>,
    payload: web::Json<Vec<Value>>,
) -> impl Responder {
    let resource = resource.into_inner();
    let records = payload.into_inner();
    let state = state.get_ref().clone();
    let name = resource.clone();

    let result = run_blocking(move || {
        let mut conn = state.db.connect()?;
        insert_batch(&name, &records, &state.schemas, &mut conn)
    })
    .await;

    match result {
        Ok(inserted) => {
            info!("Inserted {} records into {}", inserted, resource);
            HttpResponse::Ok().json(InsertResponse { resource, inserted })
        }
        Err(e) => e.error_response(),
    }
}
