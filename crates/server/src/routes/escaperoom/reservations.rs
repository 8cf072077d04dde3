use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use database::services::escaperoom::reservation::{
    ResendRequest, ReservationService,
};
use notify::qr;
use serde_json::json;

use crate::dtos::common::ok;
use crate::dtos::escaperoom::{
    BookedResponse, CreateMultipleReservationsRequest, CreateReservationRequest, ResendQrRequest,
};
use crate::error::ApiError;
use crate::state::AppState;

use super::dispatch_reservation_notice;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reservations", post(create))
        .route("/reservations/multiple", post(create_multiple))
        .route("/reservations/resend", post(resend))
}

fn render_qr(token: &str) -> Result<String, ApiError> {
    qr::render(token)
        .map(|ticket| ticket.data_url)
        .map_err(|err| ApiError::Internal(err.to_string()))
}

/// Book one seat: capacity-checked, returns the rendered QR, notifies the
/// user off the request path.
#[utoipa::path(
    post,
    path = "/escaperoom/reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created, QR returned"),
        (status = 400, description = "Trivia incomplete or slot full"),
        (status = 404, description = "User or slot not found"),
        (status = 409, description = "User already holds an active reservation")
    ),
    tag = "EscapeRoom"
)]
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateReservationRequest>,
) -> Result<Response, ApiError> {
    let booked = ReservationService::book(
        &state.escaperoom,
        body.user_id,
        body.timeslot_id,
        state.clock.now_utc(),
    )
    .await?;

    let qr_image = render_qr(&booked.reservation.qr_code)?;
    dispatch_reservation_notice(&state, &booked);

    Ok((
        StatusCode::CREATED,
        ok(BookedResponse::new(booked, qr_image)),
    )
        .into_response())
}

/// Book both seats of a group atomically.
#[utoipa::path(
    post,
    path = "/escaperoom/reservations/multiple",
    request_body = CreateMultipleReservationsRequest,
    responses(
        (status = 201, description = "Both reservations created"),
        (status = 400, description = "Validation failed or insufficient capacity"),
        (status = 404, description = "User or slot not found"),
        (status = 409, description = "A group member already holds a reservation")
    ),
    tag = "EscapeRoom"
)]
pub async fn create_multiple(
    State(state): State<AppState>,
    Json(body): Json<CreateMultipleReservationsRequest>,
) -> Result<Response, ApiError> {
    let booked = ReservationService::book_pair(
        &state.escaperoom,
        &body.user_ids,
        body.timeslot_id,
        state.clock.now_utc(),
    )
    .await?;

    let mut reservations = Vec::with_capacity(booked.len());
    for entry in booked {
        let qr_image = render_qr(&entry.reservation.qr_code)?;
        dispatch_reservation_notice(&state, &entry);
        reservations.push(BookedResponse::new(entry, qr_image));
    }

    Ok((
        StatusCode::CREATED,
        ok(json!({"reservations": reservations})),
    )
        .into_response())
}

/// Resend the QR; fixes contact details, moves the slot for the whole
/// group, or creates the first reservation(s) when none exists.
#[utoipa::path(
    post,
    path = "/escaperoom/reservations/resend",
    request_body = ResendQrRequest,
    responses(
        (status = 200, description = "QR (re-)sent; reservation possibly created or moved"),
        (status = 400, description = "Trivia incomplete, terminal reservation, or missing slot"),
        (status = 404, description = "User or slot not found"),
        (status = 409, description = "New email already in use")
    ),
    tag = "EscapeRoom"
)]
pub async fn resend(
    State(state): State<AppState>,
    Json(body): Json<ResendQrRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if body.email.is_empty() {
        return Err(ApiError::BadRequest("El email es requerido".into()));
    }

    let outcome = ReservationService::resend_or_create(
        &state.escaperoom,
        ResendRequest {
            email: body.email,
            new_email: body.new_email,
            new_whatsapp: body.new_whatsapp,
            new_partner_email: body.new_partner_email,
            new_partner_whatsapp: body.new_partner_whatsapp,
            new_timeslot_id: body.new_timeslot_id,
        },
        state.clock.now_utc(),
        &state.clock,
    )
    .await?;

    for delivery in &outcome.deliveries {
        dispatch_reservation_notice(&state, delivery);
    }

    Ok(ok(json!({
        "message": outcome.message,
        "sentTo": {
            "email": outcome.sent_to.email,
            "whatsapp": outcome.sent_to.whatsapp,
        },
        "partnerSentTo": outcome.partner_sent_to.as_ref().map(|contact| json!({
            "email": contact.email,
            "whatsapp": contact.whatsapp,
        })),
        "emailUpdated": outcome.email_updated,
        "whatsappUpdated": outcome.whatsapp_updated,
        "timeslotUpdated": outcome.timeslot_updated,
        "reservationCreated": outcome.reservation_created,
    })))
}
