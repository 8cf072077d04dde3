use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::ServiceError;
use database::services::festival::registration::{RegistrationService, VerifyOutcome};
use serde_json::json;
use uuid::Uuid;

use crate::dtos::registration::VerifyTicketRequest;
use crate::error::ApiError;
use crate::state::AppState;

/// Idempotent ticket verification: a repeat scan reports `already_used`
/// without touching the stored check-in time.
#[utoipa::path(
    post,
    path = "/verify",
    request_body = VerifyTicketRequest,
    responses(
        (status = 200, description = "Check-in performed or ticket already used"),
        (status = 400, description = "Missing ticket id"),
        (status = 404, description = "Ticket not found")
    ),
    tag = "Verification"
)]
pub async fn verify(
    State(state): State<AppState>,
    Json(body): Json<VerifyTicketRequest>,
) -> Result<Response, ApiError> {
    let ticket_id = body
        .ticket_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Ticket ID es requerido".into()))?;

    let not_found = || {
        (
            StatusCode::NOT_FOUND,
            Json(json!({
                "success": false,
                "status": "not_found",
                "message": "Ticket no encontrado",
            })),
        )
            .into_response()
    };

    let Ok(id) = Uuid::parse_str(&ticket_id) else {
        return Ok(not_found());
    };

    let outcome = match RegistrationService::verify(&state.festival, id, state.clock.now_utc()).await
    {
        Ok(outcome) => outcome,
        Err(ServiceError::NotFound(_)) => return Ok(not_found()),
        Err(err) => return Err(err.into()),
    };

    let response = match outcome {
        VerifyOutcome::AlreadyUsed(row) => Json(json!({
            "success": true,
            "status": "already_used",
            "message": "Este ticket ya fue usado",
            "data": {
                "id": row.id,
                "firstName": row.first_name,
                "lastName": row.last_name,
                "checkInTime": row.check_in_time,
                "status": row.status,
            },
        })),
        VerifyOutcome::CheckedIn(row) => Json(json!({
            "success": true,
            "status": "success",
            "message": "Check-in exitoso",
            "data": row,
        })),
    };
    Ok(response.into_response())
}
