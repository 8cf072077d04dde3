use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Scanner clients speak snake_case on this API.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateScanRequest {
    pub qr_code: String,
    pub mode: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScanRequest {
    pub qr_code: String,
    /// Caller-supplied scan moment; the server clock is used when absent.
    pub scanned_at: Option<DateTime<Utc>>,
    #[allow(dead_code)]
    pub device_id: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct ScanHistoryQuery {
    pub date: Option<String>,
    pub mode: Option<String>,
    pub limit: Option<u64>,
}
