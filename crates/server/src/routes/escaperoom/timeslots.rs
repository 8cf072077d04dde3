use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::NaiveDate;
use database::services::escaperoom::timeslot::TimeslotService;
use serde_json::Value;

use crate::dtos::common::ok;
use crate::dtos::escaperoom::{SlotAvailabilityResponse, SlotsQuery};
use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/timeslots", get(slots_for_date))
}

/// Bookable slots for one event date, with current occupancy.
#[utoipa::path(
    get,
    path = "/escaperoom/timeslots",
    params(SlotsQuery),
    responses(
        (status = 200, description = "Slots for the requested date"),
        (status = 400, description = "Missing or malformed date")
    ),
    tag = "EscapeRoom"
)]
pub async fn slots_for_date(
    State(state): State<AppState>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Value>, ApiError> {
    let raw = query
        .date
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ApiError::BadRequest("La fecha es requerida (YYYY-MM-DD)".into()))?;
    let date = raw
        .parse::<NaiveDate>()
        .map_err(|_| ApiError::BadRequest("Fecha inválida, usa el formato YYYY-MM-DD".into()))?;

    let slots = TimeslotService::slots_for_date(&state.escaperoom, date).await?;
    let payload: Vec<SlotAvailabilityResponse> = slots
        .into_iter()
        .map(|availability| SlotAvailabilityResponse {
            available: i64::from(availability.slot.capacity) - availability.reserved as i64,
            reserved: availability.reserved,
            slot: availability.slot,
        })
        .collect();
    Ok(ok(payload))
}
