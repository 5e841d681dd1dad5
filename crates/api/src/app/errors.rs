use axum::extract::multipart::MultipartError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use jobboard_auth::{AuthzError, TokenError};
use jobboard_core::DomainError;
use jobboard_infra::{ServiceError, store::StoreError};

pub type ApiResult<T> = Result<T, ApiError>;

/// Everything a handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The request body or query could not be read as the expected shape.
    #[error("malformed request: {0}")]
    Malformed(String),
}

impl ApiError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

impl From<DomainError> for ApiError {
    fn from(value: DomainError) -> Self {
        Self::Service(value.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::Malformed(value.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        Self::Malformed(value.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(value: MultipartError) -> Self {
        Self::Malformed(value.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Service(err) => service_error_to_response(err),
            ApiError::Malformed(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        }
    }
}

pub fn service_error_to_response(err: ServiceError) -> Response {
    match err {
        ServiceError::Domain(err) => domain_error_to_response(err),
        ServiceError::Authz(AuthzError::Unauthenticated) => {
            json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "authentication required")
        }
        ServiceError::Authz(AuthzError::Forbidden(msg)) => json_error(StatusCode::FORBIDDEN, "forbidden", msg),
        ServiceError::Credentials(msg) => json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", msg),
        ServiceError::Store(e) => {
            tracing::error!(error = %e, "store failure");
            let code = match e {
                StoreError::Serialization(_) => "serialization_error",
                _ => "store_error",
            };
            json_error(StatusCode::INTERNAL_SERVER_ERROR, code, e.to_string())
        }
        ServiceError::Upstream(msg) => {
            tracing::warn!(error = %msg, "collaborator failure");
            json_error(StatusCode::BAD_GATEWAY, "upstream_error", msg)
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound(_) => json_error(StatusCode::NOT_FOUND, "not_found", err.to_string()),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::Unauthorized => json_error(StatusCode::FORBIDDEN, "forbidden", "forbidden"),
    }
}

/// A presented token that did not validate.
pub fn token_error_to_response(err: &TokenError) -> Response {
    match err {
        TokenError::Expired => json_error(StatusCode::UNAUTHORIZED, "token_expired", err.to_string()),
        _ => json_error(StatusCode::UNAUTHORIZED, "token_invalid", err.to_string()),
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
