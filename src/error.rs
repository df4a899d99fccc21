//! Request-boundary error taxonomy.
//!
//! Out-of-scope reads are not errors at all (they surface as empty
//! results or 404); everything here is a genuine rejection reported to
//! the caller once, never retried.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use crate::schemas::ErrorResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A write referenced a parent entity outside the principal's
    /// ownership scope. Surfaced as a field-level validation error.
    #[error("{field}: {message}")]
    ScopeViolation {
        field: &'static str,
        message: String,
    },

    /// A stored value violates a declared constraint.
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// A delete was attempted on a row with existing dependents.
    #[error("{0}")]
    ReferentialProtection(String),

    #[error("Not found")]
    NotFound,

    #[error("Missing or unknown user identity")]
    Unauthorized,

    #[error("Operation requires the unrestricted role")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl From<compute::ComputeError> for ApiError {
    fn from(err: compute::ComputeError) -> Self {
        match err {
            compute::ComputeError::Database(db_err) => ApiError::Database(db_err),
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::ScopeViolation { .. } | ApiError::Validation { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::ReferentialProtection(_) => StatusCode::CONFLICT,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::ScopeViolation { .. } => "SCOPE_VIOLATION",
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::ReferentialProtection(_) => "REFERENTIAL_PROTECTION",
            ApiError::NotFound => "NOT_FOUND",
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::Forbidden => "FORBIDDEN",
            ApiError::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Database(ref db_err) = self {
            error!("Database error while handling request: {}", db_err);
        }
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
            success: false,
        };
        (self.status(), Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
