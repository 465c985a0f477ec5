use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Failure talking to the task store. Absence of a row is not an error,
/// repository lookups return `Ok(None)` for that.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("query failed: {0}")]
    Query(#[from] diesel::result::Error),
}

/// Errors surfaced to HTTP clients. The display text is the `error` field of
/// the response body, so it must never carry internal detail.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid ID format")]
    InvalidId,

    #[error("Title is required")]
    TitleRequired,

    #[error("Invalid request body")]
    InvalidBody,

    #[error("Task not found")]
    NotFound,

    #[error("Unauthorized: Invalid API Key")]
    Unauthorized,

    #[error("Server configuration error")]
    Misconfigured,

    #[error("Internal Server Error")]
    Internal,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidId | ApiError::TitleRequired | ApiError::InvalidBody => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Misconfigured | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        tracing::error!(error = %err, "task repository failure");
        ApiError::Internal
    }
}

impl From<BlockingError> for ApiError {
    fn from(err: BlockingError) -> Self {
        tracing::error!(error = %err, "blocking task failed");
        ApiError::Internal
    }
}
