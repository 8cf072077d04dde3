use axum::{Json, extract::State};
use database::services::festival::registration::RegistrationService;
use serde_json::Value;

use crate::dtos::common::ok;
use crate::error::ApiError;
use crate::state::AppState;

/// Aggregate dashboard numbers for the festival.
#[utoipa::path(
    get,
    path = "/stats",
    responses(
        (status = 200, description = "Aggregate registration and check-in counts"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Stats"
)]
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let stats = RegistrationService::stats(&state.festival).await?;
    Ok(ok(stats))
}
