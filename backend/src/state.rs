use crate::config::AppConfig;
use crate::db::Database;
use crate::ingestion::schema::SchemaRegistry;
use crate::ingestion::sink::IngestionSink;
use std::sync::Arc;

/// Read-only application state shared with every handler as `web::Data`.
///
/// Holds no connections and no mutable data: handlers open a fresh
/// connection per request through [`Database`].
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Database,
    pub schemas: Arc<SchemaRegistry>,
    pub sink: Arc<dyn IngestionSink>,
}

impl AppState {
    pub fn new(config: AppConfig, schemas: SchemaRegistry, sink: Arc<dyn IngestionSink>) -> Self {
        AppState {
            db: Database::new(&config.database_path),
            config: Arc::new(config),
            schemas: Arc::new(schemas),
            sink,
        }
    }
}
