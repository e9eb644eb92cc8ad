use serde::Deserialize;

/// Request payload for the CSV load endpoint.
///
/// `file` is resolved relative to the server's data directory and defaults to
/// `<table>.csv` when omitted.
#[derive(Debug, Deserialize)]
pub struct UploadCsvRequest {
    pub table: String,
    #[serde(default)]
    pub file: Option<String>,
}
