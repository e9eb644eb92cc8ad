use actix_web::{web, App, HttpServer};
use backend::config::AppConfig;
use backend::ingestion::{LogSink, SchemaRegistry};
use backend::state::AppState;
use backend::{logging, services};
use log::info;
use std::io;
use std::sync::Arc;

fn other(e: impl std::fmt::Display) -> io::Error {
    io::Error::other(e.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env().map_err(other)?;
    logging::init(config.log_file.as_deref())?;

    let schemas = SchemaRegistry::load().map_err(other)?;
    let state = AppState::new(config, schemas, Arc::new(LogSink));
    state.db.ensure_tables(&state.schemas).map_err(other)?;

    let host = state.config.host.clone();
    let port = state.config.port;
    let json_limit = state.config.max_json_bytes;
    info!("Server running at http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(json_limit))
            .app_data(web::Data::new(state.clone()))
            .configure(services::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
