//! Error taxonomy for ingestion, record inserts and named queries.
//!
//! Per-row failures while loading a CSV file are not errors: they are recovered
//! in the loader and reported through the ingestion sink. Everything here
//! aborts the operation that raised it.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::responses::ErrorResponse;
use log::error;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The input path is missing, unreadable, or outside the data directory.
    #[error("source not found: {0}")]
    SourceNotFound(String),

    /// A table definition is unusable (no columns, duplicate names).
    #[error("schema error: {0}")]
    Schema(String),

    /// A batch record does not match its resource shape. `index` is 0-based.
    #[error("record {index} failed validation: {message}")]
    Validation { index: usize, message: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Bulk insert or commit failed. The transaction was rolled back.
    #[error("write failed: {0}")]
    Write(#[source] rusqlite::Error),

    #[error("query failed: {0}")]
    Query(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    fn kind(&self) -> &'static str {
        match self {
            ServiceError::SourceNotFound(_) => "source_not_found",
            ServiceError::Schema(_) => "schema_error",
            ServiceError::Validation { .. } => "validation_error",
            ServiceError::InvalidArgument(_) => "invalid_argument",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Write(_) => "write_error",
            ServiceError::Query(_) => "query_error",
            ServiceError::Database(_) => "database_error",
            ServiceError::Csv(_) => "csv_error",
            ServiceError::Io(_) => "io_error",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::SourceNotFound(_)
            | ServiceError::InvalidArgument(_)
            | ServiceError::Csv(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Schema(_)
            | ServiceError::Write(_)
            | ServiceError::Query(_)
            | ServiceError::Database(_)
            | ServiceError::Io(_)
            | ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
        }
        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind(),
            message: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(
            ServiceError::SourceNotFound("x.csv".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::InvalidArgument("empty batch".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::NotFound("widgets".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::Validation {
                index: 2,
                message: "missing field `job`".into()
            }
            .status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn write_and_schema_errors_are_5xx() {
        let write = ServiceError::Write(rusqlite::Error::InvalidQuery);
        assert_eq!(write.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ServiceError::Schema("no columns".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_message_names_the_record() {
        let err = ServiceError::Validation {
            index: 2,
            message: "missing field `job`".into(),
        };
        assert_eq!(err.to_string(), "record 2 failed validation: missing field `job`");
    }
}
