use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

use crate::complaint::ComplaintError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `NOT_FOUND`,
    /// `CONFLICT`, `UPLOAD_FAILED`, `PERSISTENCE_FAILED`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "customer_email is required")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    NotFound(String),
    Conflict(String),
    /// Object store upload failed. Contains the internal detail, which is logged only.
    UploadFailed(String),
    /// Database write failed. Contains the internal detail, which is logged only.
    PersistenceFailed(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "CONFLICT",
                    message: msg,
                },
            ),
            AppError::UploadFailed(detail) => {
                tracing::error!("Upload failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "UPLOAD_FAILED",
                        message: "Could not upload images".into(),
                    },
                )
            }
            AppError::PersistenceFailed(detail) => {
                tracing::error!("Persistence failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "PERSISTENCE_FAILED",
                        message: "Could not save complaint".into(),
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<ComplaintError> for AppError {
    fn from(err: ComplaintError) -> Self {
        match err {
            ComplaintError::Validation(msg) => AppError::Validation(msg),
            ComplaintError::Conflict(msg) => AppError::Conflict(msg),
            e @ ComplaintError::Upload { .. } => AppError::UploadFailed(e.to_string()),
            ComplaintError::Persistence(e) => AppError::PersistenceFailed(e.to_string()),
            ComplaintError::Cancelled => AppError::Internal("request cancelled".into()),
        }
    }
}
