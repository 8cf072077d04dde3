use axum::{Json, http::StatusCode, response::IntoResponse};
use database::ServiceError;
use models::scan::ScanCode;
use serde_json::json;
use thiserror::Error;

/// Application-level errors converted into the JSON error envelope.
///
/// Every body is `{"success": false, "error": ...}`; scan rejections nest a
/// stable machine code so scanner clients can branch without parsing text.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{1}")]
    Scan(ScanCode, String),
    #[error("{0}")]
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::BadRequest(message) => Self::BadRequest(message),
            ServiceError::NotFound(message) => Self::NotFound(message),
            ServiceError::Conflict(message) => Self::Conflict(message),
            ServiceError::Scan { code, message } => Self::Scan(code, message),
            ServiceError::Db(err) => Self::Internal(err.to_string()),
        }
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({"success": false, "error": message})),
            )
                .into_response(),
            Self::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(json!({"success": false, "error": message})),
            )
                .into_response(),
            Self::Conflict(message) => (
                StatusCode::CONFLICT,
                Json(json!({"success": false, "error": message})),
            )
                .into_response(),
            Self::Scan(code, message) => {
                let status = match code {
                    ScanCode::InvalidQr => StatusCode::NOT_FOUND,
                    _ => StatusCode::BAD_REQUEST,
                };
                (
                    status,
                    Json(json!({
                        "success": false,
                        "error": {"code": code.as_str(), "message": message},
                    })),
                )
                    .into_response()
            }
            Self::Internal(detail) => {
                // Internals stay in the log; clients get a generic message.
                log::error!("internal error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"success": false, "error": "Error interno del servidor"})),
                )
                    .into_response()
            }
        }
    }
}
