//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::ScheduleConflict;
use crate::db::repository::RepositoryError;
use crate::services::ServiceError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Itemized conflict list for booking rejections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicts: Option<Vec<ScheduleConflict>>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            conflicts: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_conflicts(mut self, conflicts: Vec<ScheduleConflict>) -> Self {
        self.conflicts = Some(conflicts);
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request (validation error)
    BadRequest(String),
    /// The requested booking collides with existing bookings
    Conflict(Vec<ScheduleConflict>),
    /// Transient backend failure; safe to retry with backoff
    Unavailable(String),
    /// Internal server error
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Conflict(conflicts) => {
                let summary = conflicts
                    .iter()
                    .map(|c| c.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ");
                (
                    StatusCode::CONFLICT,
                    ApiError::new("CONFLICT", "Requested slot is already occupied")
                        .with_details(summary)
                        .with_conflicts(conflicts),
                )
            }
            AppError::Unavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError::new("UNAVAILABLE", msg),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match &err {
            RepositoryError::NotFound { message, .. } => AppError::NotFound(message.clone()),
            RepositoryError::ConflictError { message, .. } => {
                // Repository conflict messages lead with the resource name.
                let resource = if message.starts_with("Teacher") {
                    crate::api::ConflictResource::Teacher
                } else if message.starts_with("Room") {
                    crate::api::ConflictResource::Room
                } else {
                    crate::api::ConflictResource::Class
                };
                AppError::Conflict(vec![ScheduleConflict::new(resource, message.clone())])
            }
            RepositoryError::ValidationError { message, .. } => {
                AppError::BadRequest(message.clone())
            }
            _ if err.is_retryable() => AppError::Unavailable(err.to_string()),
            _ => AppError::Internal(err.to_string()),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidRange(msg) => AppError::BadRequest(msg),
            ServiceError::NotConfigured(e) => AppError::BadRequest(e.to_string()),
            ServiceError::Conflict(conflicts) => AppError::Conflict(conflicts),
            ServiceError::Time(e) => AppError::BadRequest(e.to_string()),
            ServiceError::Slot(e) => AppError::BadRequest(e.to_string()),
            ServiceError::Repository(e) => e.into(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
