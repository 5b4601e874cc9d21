use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::convert::ConversionError;
use crate::loader::LoadError;
use crate::template::TemplateError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status and machine-readable code for this error
    pub fn status_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Template(e) => match e {
                TemplateError::NotFound(_) => (StatusCode::NOT_FOUND, "TEMPLATE_NOT_FOUND"),
                TemplateError::AlreadyExists(_) => (StatusCode::CONFLICT, "TEMPLATE_EXISTS"),
                TemplateError::InvalidId(_) => (StatusCode::BAD_REQUEST, "INVALID_ID"),
                TemplateError::InvalidTemplate(_) => (StatusCode::BAD_REQUEST, "INVALID_TEMPLATE"),
                TemplateError::NestedBlock { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "NESTED_BLOCK")
                }
            },
            AppError::Load(_) => (StatusCode::INTERNAL_SERVER_ERROR, "LOAD_ERROR"),
            AppError::Conversion(_) => (StatusCode::BAD_GATEWAY, "CONVERSION_FAILED"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Check if running in production mode (based on RUN_MODE env var)
fn is_production() -> bool {
    std::env::var("RUN_MODE")
        .map(|m| m == "production" || m == "prod")
        .unwrap_or(false)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_code();
        let log_message = self.to_string();

        // Converter diagnostics are part of the contract, so only
        // configuration, load and internal failures are masked.
        let client_message = match &self {
            AppError::Config(_) if is_production() => "Configuration error".to_string(),
            AppError::Load(_) if is_production() => "Failed to load report data".to_string(),
            AppError::Internal(_) if is_production() => "Internal server error".to_string(),
            _ => log_message.clone(),
        };

        // Always log the detailed error server-side
        tracing::error!(
            code = %code,
            status = %status.as_u16(),
            message = %log_message,
            "API error"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: client_message,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_template_error_status() {
        let err: AppError = TemplateError::NotFound("weekly".into()).into();
        assert_eq!(err.status_code(), (StatusCode::NOT_FOUND, "TEMPLATE_NOT_FOUND"));

        let err: AppError = TemplateError::NestedBlock {
            marker: "@foreach(a)".into(),
        }
        .into();
        assert_eq!(err.status_code().0, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.to_string().contains("@foreach(a)"));
    }

    #[test]
    fn test_conversion_error_is_bad_gateway() {
        let err: AppError = ConversionError::Failed {
            status: "exit status: 1".into(),
            stderr: "source file could not be loaded".into(),
        }
        .into();
        assert_eq!(err.status_code(), (StatusCode::BAD_GATEWAY, "CONVERSION_FAILED"));
        assert!(err.to_string().contains("source file could not be loaded"));
    }

    #[test]
    fn test_load_error_is_internal() {
        let err: AppError = LoadError::Template {
            path: PathBuf::from("templates/missing.rtf"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }
        .into();
        assert_eq!(err.status_code().0, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("templates/missing.rtf"));
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::Validation("context must be an object".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
