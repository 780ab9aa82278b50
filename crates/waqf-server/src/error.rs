//! API error type
//!
//! Every handler returns `Result<_, ApiError>`. The response body carries the
//! error category, the Arabic message shown to users and the raw detail.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use waqf::domain::services::error_classifier;
use waqf::{DomainError, ErrorCategory};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON body of every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorCategory,
    pub message: String,
    pub detail: String,
}

/// Attached to error responses so the error log middleware can record them
#[derive(Debug, Clone)]
pub struct ErrorDetail {
    pub category: ErrorCategory,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ExternalService(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        error_classifier::classify(&self.to_string())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        ApiError::NotFound(what.into())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();
        match err {
            DomainError::NotFound { .. } => ApiError::NotFound(message),
            DomainError::Validation(_) => ApiError::BadRequest(message),
            DomainError::Conflict(_) => ApiError::Conflict(message),
            DomainError::Forbidden(_) => ApiError::Forbidden(message),
            DomainError::Repository(_) => ApiError::Database(message),
            DomainError::ExternalService(_) => ApiError::ExternalService(message),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Database(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();
        let category = self.category();

        if status.is_server_error() {
            tracing::error!("{detail}");
        } else {
            tracing::warn!("{detail}");
        }

        let body = ErrorResponse {
            error: category,
            message: category.user_message().to_string(),
            detail: detail.clone(),
        };

        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(ErrorDetail {
            category,
            message: detail,
        });
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_domain_errors_map_to_status() {
        let cases = [
            (DomainError::not_found("Beneficiary", Uuid::nil()), StatusCode::NOT_FOUND),
            (DomainError::validation("phone is invalid"), StatusCode::BAD_REQUEST),
            (DomainError::conflict("already closed"), StatusCode::CONFLICT),
            (DomainError::forbidden("not yours"), StatusCode::FORBIDDEN),
            (DomainError::Repository("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::ExternalService("down".into()), StatusCode::BAD_GATEWAY),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_category_follows_message() {
        assert_eq!(
            ApiError::Database("duplicate key value".into()).category(),
            ErrorCategory::Database
        );
        assert_eq!(
            ApiError::Unauthorized("missing bearer token".into()).category(),
            ErrorCategory::Auth
        );
        assert_eq!(
            ApiError::ExternalService("operation timed out".into()).category(),
            ErrorCategory::Network
        );
        assert_eq!(
            ApiError::from(DomainError::validation("iban must be SA followed by 22 digits"))
                .category(),
            ErrorCategory::Validation
        );
    }

    #[test]
    fn test_response_carries_detail_extension() {
        let response = ApiError::Conflict("Cannot approve a record that is draft".into())
            .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let detail = response.extensions().get::<ErrorDetail>().unwrap();
        assert!(detail.message.contains("Cannot approve"));
    }
}
