//! Error handling for the Weather Insight Platform
//!
//! Provides consistent JSON error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{IntakeError, PolicyError, SeriesError};
use thiserror::Error;

/// Message shown for any failure the user can only retry
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to fetch weather data. Please try again.";

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    // Data source errors
    #[error("Weather data unavailable: {0}")]
    DataUnavailable(String),

    // Advisory errors are absorbed by the advisory service
    #[error("Advisory service error: {0}")]
    Advisory(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<IntakeError> for AppError {
    fn from(err: IntakeError) -> Self {
        AppError::validation(err.field(), err.to_string())
    }
}

impl From<SeriesError> for AppError {
    fn from(err: SeriesError) -> Self {
        AppError::DataUnavailable(err.to_string())
    }
}

impl From<PolicyError> for AppError {
    fn from(err: PolicyError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub retryable: bool,
}

impl AppError {
    fn status_and_detail(&self) -> (StatusCode, ErrorDetail) {
        match self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                    retryable: false,
                },
            ),
            AppError::DataUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "DATA_UNAVAILABLE".to_string(),
                    message: "Weather data is temporarily unavailable. Please try again."
                        .to_string(),
                    field: None,
                    retryable: true,
                },
            ),
            AppError::Advisory(_) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "ADVISORY_ERROR".to_string(),
                    message: "Advisory service error".to_string(),
                    field: None,
                    retryable: true,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message: format!("Configuration error: {}", msg),
                    field: None,
                    retryable: false,
                },
            ),
            AppError::Internal(_) | AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: GENERIC_FAILURE_MESSAGE.to_string(),
                    field: None,
                    retryable: true,
                },
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.status_and_detail();

        // Log the error for debugging
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
