//! Custom error types for the API service

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::ServiceError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or rejected bearer token
    #[error("Unauthorized")]
    Unauthorized,

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Failure reported by a service
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Unauthorized | ApiError::Service(ServiceError::InvalidCredentials) => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "invalid credentials" }),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::Service(ServiceError::Validation(fields)) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "validation failed", "fields": fields }),
            ),
            ApiError::Service(ServiceError::AlreadyExists(resource)) => (
                StatusCode::CONFLICT,
                json!({ "error": format!("{} already exists", resource) }),
            ),
            ApiError::Service(ServiceError::NotFound(resource)) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("{} not found", resource) }),
            ),
            ApiError::Service(ServiceError::Internal(e)) => {
                error!("Internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "something went wrong, please try again" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
