use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::migration::{MigrationError, MigrationService};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub migration_service: Arc<MigrationService>,
}

impl AppState {
    pub fn new(migration_service: Arc<MigrationService>) -> Self {
        Self { migration_service }
    }
}

/// HTTP-facing failures. Domain rejections render as `200 {success: false}`
/// with their reason; everything else is an opaque 5xx.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Rejected: {0}")]
    Rejected(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<MigrationError> for AppError {
    fn from(error: MigrationError) -> Self {
        match error {
            MigrationError::Upstream(e) => AppError::Upstream(e.to_string()),
            MigrationError::Persistence(msg) => AppError::DatabaseError(msg),
            rejection @ (MigrationError::MissingCredentials
            | MigrationError::InvalidSignature
            | MigrationError::AlreadyMigrated) => AppError::Rejected(rejection.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Rejected(reason) => (StatusCode::OK, reason),
            AppError::Upstream(msg) => {
                tracing::error!(error = %msg, "Upstream failure");
                (StatusCode::BAD_GATEWAY, "Upstream data source failure".to_string())
            }
            AppError::DatabaseError(msg) => {
                tracing::error!(error = %msg, "Database failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
        };

        let body = Json(json!({
            "success": false,
            "error": error_message
        }));

        (status, body).into_response()
    }
}
