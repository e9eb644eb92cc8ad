use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct InsertResponse {
    pub resource: String,
    pub inserted: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        HealthResponse {
            status: "ok",
            message: "Database connected".to_string(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        HealthResponse {
            status: "failed",
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}
