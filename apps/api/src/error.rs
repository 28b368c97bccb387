//! API error type and its HTTP mapping.
//!
//! Every failure leaves the server as `{"error": "<message>"}` with the
//! matching status code. Internal detail is logged, never echoed to the
//! client.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use venta_core::{CoreError, ValidationError};
use venta_db::{CreateSaleError, DbError};

/// API-level error. Variants map one-to-one to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 401: missing, malformed, or unverifiable credentials.
    #[error("Invalid or expired token")]
    Unauthorized,

    /// 400: the request was understood but violates a business rule.
    #[error("{0}")]
    Validation(String),

    /// 404: absent, or owned by a different user.
    #[error("{0}")]
    NotFound(String),

    /// 409: write conflicts with existing data.
    #[error("{0}")]
    Conflict(String),

    /// 500: anything the client cannot fix. Detail stays in the logs.
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref detail) = self {
            error!(detail = %detail, "Internal error");
        }
        let body = json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DbError::UniqueViolation { .. } => ApiError::Conflict(err.to_string()),
            DbError::CheckViolation { .. } | DbError::ForeignKeyViolation { .. } => {
                ApiError::Validation(err.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(_) | CoreError::CustomerNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            CoreError::InsufficientStock { .. } | CoreError::Validation(_) => {
                ApiError::Validation(err.to_string())
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<CreateSaleError> for ApiError {
    fn from(err: CreateSaleError) -> Self {
        match err {
            CreateSaleError::Domain(core) => core.into(),
            CreateSaleError::Db(db) => db.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

/// JSON extractor whose rejection speaks the API's error shape instead of
/// axum's plain-text default.
#[derive(axum::extract::FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

pub type ApiResult<T> = Result<T, ApiError>;
