use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDateTime;
use database::services::festival::scan::{ScanRecord, ScanService};
use models::scan::ScanMode;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::dtos::common::ok;
use crate::dtos::scan::{ScanHistoryQuery, ScanRequest, ValidateScanRequest};
use crate::error::ApiError;
use crate::state::AppState;

fn scan_payload(record: &ScanRecord, message: &str) -> Value {
    json!({
        "scan_id": format!("scan-{}", Uuid::new_v4()),
        "participant_id": record.participant.id,
        "name": record.participant.full_name(),
        "mode": record.mode.as_str(),
        "timestamp": record.timestamp,
        "message": message,
    })
}

fn supplied_time(request: &ScanRequest) -> Option<NaiveDateTime> {
    request.scanned_at.map(|at| at.naive_utc())
}

/// Pre-flight a scan: reports whether the checkpoint may be stamped and why
/// not, without mutating anything.
#[utoipa::path(
    post,
    path = "/scan/validate",
    request_body = ValidateScanRequest,
    responses(
        (status = 200, description = "Validation result with current checkpoint state"),
        (status = 400, description = "Unknown scan mode"),
        (status = 404, description = "Unknown QR code")
    ),
    tag = "Scan"
)]
pub async fn validate(
    State(state): State<AppState>,
    Json(body): Json<ValidateScanRequest>,
) -> Result<Json<Value>, ApiError> {
    let mode: ScanMode = body
        .mode
        .parse()
        .map_err(|_| ApiError::BadRequest("Modo inválido".into()))?;

    let preview = ScanService::validate(&state.festival, &body.qr_code, mode).await?;
    Ok(ok(json!({
        "participant_id": preview.participant.id,
        "name": preview.participant.full_name(),
        "email": preview.participant.email,
        "registration_date": preview.participant.registration_date,
        "status": {
            "entrada": preview.progress.entrada,
            "entrega": preview.progress.entrega,
            "completo": preview.progress.completo,
            "sorteo": preview.progress.sorteo,
        },
        "can_scan": preview.can_scan,
        "eligible_for_sorteo": preview.eligible_for_sorteo,
        "message": preview.message,
    })))
}

/// Stamp the entrance checkpoint.
#[utoipa::path(
    post,
    path = "/scan/entrada",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Entrance registered"),
        (status = 400, description = "Checkpoint already set"),
        (status = 404, description = "Unknown QR code")
    ),
    tag = "Scan"
)]
pub async fn entrada(
    State(state): State<AppState>,
    Json(body): Json<ScanRequest>,
) -> Result<Json<Value>, ApiError> {
    let record = ScanService::scan_entrada(
        &state.festival,
        &body.qr_code,
        supplied_time(&body),
        state.clock.now_utc(),
    )
    .await?;
    Ok(ok(scan_payload(&record, "Entrada registrada exitosamente")))
}

/// Stamp the passport-delivery checkpoint (strict variant: requires a prior
/// entrance scan).
#[utoipa::path(
    post,
    path = "/scan/entrega",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Passport delivery registered"),
        (status = 400, description = "Entrance missing or checkpoint already set"),
        (status = 404, description = "Unknown QR code")
    ),
    tag = "Scan"
)]
pub async fn entrega(
    State(state): State<AppState>,
    Json(body): Json<ScanRequest>,
) -> Result<Json<Value>, ApiError> {
    let record = ScanService::scan_entrega(
        &state.festival,
        &body.qr_code,
        supplied_time(&body),
        state.clock.now_utc(),
    )
    .await?;
    Ok(ok(scan_payload(&record, "Entrega de pasaporte registrada")))
}

/// Combined-scanner delivery: also stamps the entrance when it is missing.
#[utoipa::path(
    post,
    path = "/scan/entrega-combined",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Entrance and passport delivery registered"),
        (status = 400, description = "Checkpoint already set"),
        (status = 404, description = "Unknown QR code")
    ),
    tag = "Scan"
)]
pub async fn entrega_combined(
    State(state): State<AppState>,
    Json(body): Json<ScanRequest>,
) -> Result<Json<Value>, ApiError> {
    let record = ScanService::scan_entrega_combined(
        &state.festival,
        &body.qr_code,
        supplied_time(&body),
        state.clock.now_utc(),
    )
    .await?;
    Ok(ok(scan_payload(
        &record,
        "Entrada y entrega de pasaporte registrada",
    )))
}

/// Stamp the passport-complete checkpoint.
#[utoipa::path(
    post,
    path = "/scan/completo",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Passport completed"),
        (status = 400, description = "Delivery missing or checkpoint already set"),
        (status = 404, description = "Unknown QR code")
    ),
    tag = "Scan"
)]
pub async fn completo(
    State(state): State<AppState>,
    Json(body): Json<ScanRequest>,
) -> Result<Json<Value>, ApiError> {
    let record = ScanService::scan_completo(
        &state.festival,
        &body.qr_code,
        supplied_time(&body),
        state.clock.now_utc(),
    )
    .await?;
    Ok(ok(scan_payload(&record, "Pasaporte completado exitosamente")))
}

/// Stamp the raffle checkpoint (requires entrance and delivery).
#[utoipa::path(
    post,
    path = "/scan/sorteo",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Raffle participation registered"),
        (status = 400, description = "Prerequisites missing or already participated"),
        (status = 404, description = "Unknown QR code")
    ),
    tag = "Scan"
)]
pub async fn sorteo(
    State(state): State<AppState>,
    Json(body): Json<ScanRequest>,
) -> Result<Json<Value>, ApiError> {
    let record = ScanService::scan_sorteo(
        &state.festival,
        &body.qr_code,
        supplied_time(&body),
        state.clock.now_utc(),
    )
    .await?;
    Ok(ok(scan_payload(
        &record,
        "Participación en sorteo registrada exitosamente",
    )))
}

/// Recent scans, optionally filtered by checkpoint.
#[utoipa::path(
    get,
    path = "/scan/history",
    params(ScanHistoryQuery),
    responses(
        (status = 200, description = "Recent scans")
    ),
    tag = "Scan"
)]
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<ScanHistoryQuery>,
) -> Result<Json<Value>, ApiError> {
    let mode = match &query.mode {
        Some(raw) => Some(
            raw.parse::<ScanMode>()
                .map_err(|_| ApiError::BadRequest("Modo inválido".into()))?,
        ),
        None => None,
    };
    let limit = query.limit.unwrap_or(50);

    let entries = ScanService::history(&state.festival, mode, limit).await?;
    let scans: Vec<Value> = entries
        .iter()
        .map(|entry| {
            json!({
                "scan_id": format!("scan-{}", entry.participant.id),
                "participant_id": entry.participant.id,
                "name": entry.participant.full_name(),
                "mode": entry.mode.as_str(),
                "timestamp": entry.timestamp,
                "status": "valid",
            })
        })
        .collect();

    Ok(ok(json!({"total": scans.len(), "scans": scans})))
}

/// Counts per checkpoint.
#[utoipa::path(
    get,
    path = "/scan/stats",
    responses(
        (status = 200, description = "Scan counters")
    ),
    tag = "Scan"
)]
pub async fn stats(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let stats = ScanService::stats(&state.festival).await?;
    Ok(ok(json!({
        "date": state.clock.today(),
        "total_scans": stats.total_scans,
        "by_mode": {
            "entrada": stats.entrada,
            "entrega": stats.entrega,
            "completo": stats.completo,
            "sorteo": stats.sorteo,
        },
        "valid_scans": stats.total_scans,
        "invalid_scans": 0,
        "total_registrations": stats.total_registrations,
        "last_updated": chrono::Utc::now().to_rfc3339(),
    })))
}
