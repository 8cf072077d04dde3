use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use database::services::escaperoom::checkin::CheckinService;
use database::services::escaperoom::reservation::BookedReservation;
use database::services::escaperoom::timeslot::TimeslotService;
use serde_json::{Value, json};

use crate::dtos::common::ok;
use crate::dtos::escaperoom::{
    GroupCheckinRequest, GroupReassignRequest, RateGroupRequest, ReassignRequest, TicketRequest,
    TicketResponse,
};
use crate::error::ApiError;
use crate::state::AppState;

use super::dispatch_reservation_notice;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/checkin/validate", post(validate))
        .route("/checkin/confirm", post(confirm))
        .route("/checkin/reassign", post(reassign))
        .route("/checkin/group/checkin", post(group_checkin))
        .route("/checkin/group/reassign", post(group_reassign))
        .route("/checkin/groups/checked-in", get(checked_in_groups))
        .route("/checkin/groups/rate", post(rate_group))
        .route("/checkin/timeslots/available", get(available_timeslots))
}

/// Resolve a ticket without consuming it; terminal states are rejected.
#[utoipa::path(
    post,
    path = "/escaperoom/checkin/validate",
    request_body = TicketRequest,
    responses(
        (status = 200, description = "Ticket is valid and unused"),
        (status = 400, description = "Ticket already used or cancelled"),
        (status = 404, description = "Unknown token")
    ),
    tag = "EscapeRoomCheckin"
)]
pub async fn validate(
    State(state): State<AppState>,
    Json(body): Json<TicketRequest>,
) -> Result<Json<Value>, ApiError> {
    let detail =
        CheckinService::get_by_token(&state.escaperoom, &body.qr_code, &state.clock).await?;
    Ok(ok(TicketResponse::from(detail)))
}

/// Consume a ticket: `ACTIVE → USED` with a fresh timestamp.
#[utoipa::path(
    post,
    path = "/escaperoom/checkin/confirm",
    request_body = TicketRequest,
    responses(
        (status = 200, description = "Checked in"),
        (status = 400, description = "Ticket already used or cancelled"),
        (status = 404, description = "Unknown token")
    ),
    tag = "EscapeRoomCheckin"
)]
pub async fn confirm(
    State(state): State<AppState>,
    Json(body): Json<TicketRequest>,
) -> Result<Json<Value>, ApiError> {
    let detail = CheckinService::checkin(
        &state.escaperoom,
        &body.qr_code,
        state.clock.now_utc(),
        &state.clock,
    )
    .await?;
    Ok(ok(TicketResponse::from(detail)))
}

/// Move a still-active ticket to another slot; the token (and QR) survive.
#[utoipa::path(
    post,
    path = "/escaperoom/checkin/reassign",
    request_body = ReassignRequest,
    responses(
        (status = 200, description = "Ticket moved, holder re-notified"),
        (status = 400, description = "Ticket already used or cancelled"),
        (status = 404, description = "Unknown token or slot")
    ),
    tag = "EscapeRoomCheckin"
)]
pub async fn reassign(
    State(state): State<AppState>,
    Json(body): Json<ReassignRequest>,
) -> Result<Json<Value>, ApiError> {
    let detail = CheckinService::reassign(
        &state.escaperoom,
        &body.qr_code,
        body.new_timeslot_id,
        &state.clock,
    )
    .await?;

    dispatch_reservation_notice(
        &state,
        &BookedReservation {
            reservation: detail.reservation.clone(),
            user: detail.user.clone(),
            timeslot: detail.timeslot.clone(),
        },
    );
    Ok(ok(TicketResponse::from(detail)))
}

/// Check in both members of a group in one transaction.
#[utoipa::path(
    post,
    path = "/escaperoom/checkin/group/checkin",
    request_body = GroupCheckinRequest,
    responses(
        (status = 200, description = "Both tickets consumed with the same timestamp"),
        (status = 400, description = "Tickets are not mutual partners or already used"),
        (status = 404, description = "Unknown token")
    ),
    tag = "EscapeRoomCheckin"
)]
pub async fn group_checkin(
    State(state): State<AppState>,
    Json(body): Json<GroupCheckinRequest>,
) -> Result<Json<Value>, ApiError> {
    let (first, second) = CheckinService::checkin_group(
        &state.escaperoom,
        &body.qr_code_1,
        &body.qr_code_2,
        state.clock.now_utc(),
        &state.clock,
    )
    .await?;
    Ok(ok(json!({
        "reservation1": TicketResponse::from(first),
        "reservation2": TicketResponse::from(second),
    })))
}

/// Move both members of a group to another slot atomically.
#[utoipa::path(
    post,
    path = "/escaperoom/checkin/group/reassign",
    request_body = GroupReassignRequest,
    responses(
        (status = 200, description = "Both tickets moved, holders re-notified"),
        (status = 400, description = "Tickets are not mutual partners or already used"),
        (status = 404, description = "Unknown token or slot")
    ),
    tag = "EscapeRoomCheckin"
)]
pub async fn group_reassign(
    State(state): State<AppState>,
    Json(body): Json<GroupReassignRequest>,
) -> Result<Json<Value>, ApiError> {
    let (first, second) = CheckinService::reassign_group(
        &state.escaperoom,
        &body.qr_code_1,
        &body.qr_code_2,
        body.new_timeslot_id,
        &state.clock,
    )
    .await?;

    for detail in [&first, &second] {
        dispatch_reservation_notice(
            &state,
            &BookedReservation {
                reservation: detail.reservation.clone(),
                user: detail.user.clone(),
                timeslot: detail.timeslot.clone(),
            },
        );
    }
    Ok(ok(json!({
        "reservation1": TicketResponse::from(first),
        "reservation2": TicketResponse::from(second),
    })))
}

/// Pairs that completed their visit and still lack a rating.
#[utoipa::path(
    get,
    path = "/escaperoom/checkin/groups/checked-in",
    responses(
        (status = 200, description = "Checked-in, unrated groups")
    ),
    tag = "EscapeRoomCheckin"
)]
pub async fn checked_in_groups(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let groups = CheckinService::checked_in_groups(&state.escaperoom).await?;
    Ok(ok(groups))
}

/// Stamp the interest rating on both reservations of a group.
#[utoipa::path(
    post,
    path = "/escaperoom/checkin/groups/rate",
    request_body = RateGroupRequest,
    responses(
        (status = 200, description = "Both reservations rated"),
        (status = 400, description = "Rating outside 1-3"),
        (status = 404, description = "Reservation not found")
    ),
    tag = "EscapeRoomCheckin"
)]
pub async fn rate_group(
    State(state): State<AppState>,
    Json(body): Json<RateGroupRequest>,
) -> Result<Json<Value>, ApiError> {
    let (first, second) = CheckinService::rate_group(
        &state.escaperoom,
        body.reservation_id_1,
        body.reservation_id_2,
        body.rating,
        state.clock.now_utc(),
    )
    .await?;
    Ok(ok(json!({
        "reservation1": first,
        "reservation2": second,
        "rating": body.rating,
    })))
}

/// Today's slots that have not started yet, for walk-in reassignment.
#[utoipa::path(
    get,
    path = "/escaperoom/checkin/timeslots/available",
    responses(
        (status = 200, description = "Remaining slots for today")
    ),
    tag = "EscapeRoomCheckin"
)]
pub async fn available_timeslots(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let slots = TimeslotService::available_today(
        &state.escaperoom,
        state.clock.today(),
        state.clock.minutes_into_day(),
    )
    .await?;
    Ok(ok(slots))
}
