use models::scan::{ScanCode, ScanDenial};
use sea_orm::DbErr;
use thiserror::Error;

/// Tagged outcome of a service operation; the HTTP boundary owns the
/// mapping to status codes.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// Scan rejections carry a stable machine code for scanner clients.
    #[error("{message}")]
    Scan { code: ScanCode, message: String },
    #[error(transparent)]
    Db(#[from] DbErr),
}

impl From<ScanDenial> for ServiceError {
    fn from(denial: ScanDenial) -> Self {
        Self::Scan {
            code: denial.code,
            message: denial.message,
        }
    }
}
