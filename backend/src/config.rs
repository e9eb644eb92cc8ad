use std::env;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    /// CSV sources must live under this directory.
    pub data_dir: PathBuf,
    /// Named `.sql` templates are read from here.
    pub queries_dir: PathBuf,
    /// Append-only ingestion log. `None` logs to stderr only.
    pub log_file: Option<PathBuf>,
    pub max_json_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_path: PathBuf::from("ingest.sqlite"),
            data_dir: PathBuf::from("data_folder"),
            queries_dir: PathBuf::from("queries"),
            log_file: Some(PathBuf::from("logs/upload_logs.log")),
            max_json_bytes: 10 * 1024 * 1024, // 10 MB
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source; unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();
        if let Some(host) = lookup("INGEST_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("INGEST_PORT") {
            config.port = parse_number("INGEST_PORT", port)?;
        }
        if let Some(path) = lookup("DATABASE_PATH") {
            config.database_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("QUERIES_DIR") {
            config.queries_dir = PathBuf::from(dir);
        }
        if let Some(file) = lookup("LOG_FILE") {
            config.log_file = if file.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(file))
            };
        }
        if let Some(limit) = lookup("MAX_JSON_BYTES") {
            config.max_json_bytes = parse_number("MAX_JSON_BYTES", limit)?;
        }
        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}
