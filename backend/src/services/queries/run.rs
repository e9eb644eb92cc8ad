use crate::error::{ServiceError, ServiceResult};
use crate::query::{run_named_query, Row};
use crate::services::run_blocking;
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use serde_json::{Map, Value};
use std::collections::HashMap;

fn respond(result: ServiceResult<Vec<Row>>) -> HttpResponse {
    match result {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => e.error_response(),
    }
}

fn parse_params(body: &[u8]) -> ServiceResult<Map<String, Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    serde_json::from_slice(body)
        .map_err(|e| ServiceError::InvalidArgument(format!("parameters must be a JSON object: {}", e)))
}

pub(crate) async fn process(
    state: web::Data<AppState>,
    name: web::Path<String>,
    body: web::Bytes,
) -> impl Responder {
    let params = match parse_params(&body) {
        Ok(params) => params,
        Err(e) => return e.error_response(),
    };
    respond(execute(state.get_ref().clone(), name.into_inner(), params).await)
}

pub(crate) async fn process_query_string(
    state: web::Data<AppState>,
    name: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let params = query
        .into_inner()
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();
    respond(execute(state.get_ref().clone(), name.into_inner(), params).await)
}

async fn execute(state: AppState, name: String, params: Map<String, Value>) -> ServiceResult<Vec<Row>> {
    run_blocking(move || {
        let conn = state.db.connect()?;
        run_named_query(&conn, &state.config.queries_dir, &name, &params)
    })
    .await
}
