use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get, post},
};
use database::services::escaperoom::admin::AdminService;
use serde_json::{Value, json};

use crate::dtos::common::ok;
use crate::dtos::escaperoom::{RegistrationControlRequest, TimeslotConfigRequest};
use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/registration-control",
            get(registration_status)
                .post(set_registration_control)
                .delete(reset_registration_control),
        )
        .route(
            "/admin/timeslot-config",
            get(timeslot_config).post(set_timeslot_config),
        )
        .route("/admin/generate-timeslots", post(generate_timeslots))
        .route("/admin/timeslots", delete(clear_timeslots))
        .route("/admin/users-data", get(users_data))
}

/// Manual override plus the schedule currently in force.
#[utoipa::path(
    get,
    path = "/escaperoom/admin/registration-control",
    responses((status = 200, description = "Current registration-window status")),
    tag = "EscapeRoomAdmin"
)]
pub async fn registration_status(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let view = AdminService::registration_status(&state.escaperoom).await?;
    Ok(ok(view))
}

/// Force the window open or closed; the most recent record wins.
#[utoipa::path(
    post,
    path = "/escaperoom/admin/registration-control",
    request_body = RegistrationControlRequest,
    responses((status = 200, description = "Override recorded")),
    tag = "EscapeRoomAdmin"
)]
pub async fn set_registration_control(
    State(state): State<AppState>,
    Json(body): Json<RegistrationControlRequest>,
) -> Result<Json<Value>, ApiError> {
    let control = AdminService::set_registration_control(
        &state.escaperoom,
        body.is_open,
        body.reason,
        body.admin_email,
        state.clock.now_utc(),
    )
    .await?;
    Ok(ok(control))
}

/// Remove every override; the automatic schedule decides again.
#[utoipa::path(
    delete,
    path = "/escaperoom/admin/registration-control",
    responses((status = 200, description = "Overrides removed")),
    tag = "EscapeRoomAdmin"
)]
pub async fn reset_registration_control(
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    AdminService::reset_registration_control(&state.escaperoom).await?;
    Ok(ok(json!({
        "message": "Control manual eliminado. Sistema en modo automático.",
    })))
}

/// The latest generator configuration (or the defaults).
#[utoipa::path(
    get,
    path = "/escaperoom/admin/timeslot-config",
    responses((status = 200, description = "Current timeslot configuration")),
    tag = "EscapeRoomAdmin"
)]
pub async fn timeslot_config(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let view = AdminService::timeslot_config(&state.escaperoom).await?;
    Ok(ok(view))
}

/// Save a new configuration revision.
#[utoipa::path(
    post,
    path = "/escaperoom/admin/timeslot-config",
    request_body = TimeslotConfigRequest,
    responses(
        (status = 200, description = "Configuration saved"),
        (status = 400, description = "Invalid schedule values")
    ),
    tag = "EscapeRoomAdmin"
)]
pub async fn set_timeslot_config(
    State(state): State<AppState>,
    Json(body): Json<TimeslotConfigRequest>,
) -> Result<Json<Value>, ApiError> {
    let config = AdminService::set_timeslot_config(
        &state.escaperoom,
        body.event_dates,
        body.duration_minutes,
        body.start_hour,
        body.end_hour,
        body.admin_email,
        state.clock.now_utc(),
    )
    .await?;
    Ok(ok(config))
}

/// Clear (guarded) and regenerate the slot grid from the saved config.
#[utoipa::path(
    post,
    path = "/escaperoom/admin/generate-timeslots",
    responses(
        (status = 200, description = "Slots generated"),
        (status = 400, description = "No configuration or reservations still exist")
    ),
    tag = "EscapeRoomAdmin"
)]
pub async fn generate_timeslots(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let summary = AdminService::generate_timeslots(&state.escaperoom).await?;
    Ok(ok(summary))
}

/// Delete every slot; refused while any reservation exists.
#[utoipa::path(
    delete,
    path = "/escaperoom/admin/timeslots",
    responses(
        (status = 200, description = "Slots deleted"),
        (status = 400, description = "Reservations still reference slots")
    ),
    tag = "EscapeRoomAdmin"
)]
pub async fn clear_timeslots(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let deleted = AdminService::clear_timeslots(&state.escaperoom).await?;
    Ok(ok(json!({
        "message": format!("Eliminados {deleted} turnos"),
        "deletedCount": deleted,
    })))
}

/// CSV-ready export of every user with reservation, partner, and rating.
#[utoipa::path(
    get,
    path = "/escaperoom/admin/users-data",
    responses((status = 200, description = "Export rows")),
    tag = "EscapeRoomAdmin"
)]
pub async fn users_data(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let rows = AdminService::users_data(&state.escaperoom).await?;
    Ok(ok(rows))
}
