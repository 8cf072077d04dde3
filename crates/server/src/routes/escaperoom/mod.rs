pub mod admin;
pub mod checkin;
pub mod reservations;
pub mod timeslots;
pub mod trivia;
pub mod users;

use axum::{
    Json, Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use database::services::escaperoom::reservation::BookedReservation;
use database::services::escaperoom::window::RegistrationWindow;
use models::window::WindowStatus;
use notify::ReservationNotice;
use serde_json::{Value, json};

use crate::state::AppState;

/// Escape-room API subtree. Registration and trivia are behind the
/// registration-window gate; check-in, reservations, and admin are not.
pub fn router(state: AppState) -> Router<AppState> {
    let gated = Router::new()
        .merge(users::router())
        .merge(trivia::router())
        .layer(middleware::from_fn_with_state(state, require_open_window));

    Router::new()
        .route("/health", get(health))
        .merge(gated)
        .merge(timeslots::router())
        .merge(reservations::router())
        .merge(checkin::router())
        .merge(admin::router())
}

/// Escape-room liveness endpoint.
#[utoipa::path(
    get,
    path = "/escaperoom/health",
    responses((status = 200, description = "Service is healthy")),
    tag = "Health"
)]
pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "timestamp": Utc::now().to_rfc3339()}))
}

/// Admission control for registration/trivia endpoints: a manual override
/// wins, otherwise the event-date/hour schedule decides.
pub async fn require_open_window(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let status =
        RegistrationWindow::status(&state.escaperoom, state.clock.today(), state.clock.hour())
            .await;

    match status {
        Ok(WindowStatus::Open) => next.run(request).await,
        Ok(WindowStatus::Closed {
            message,
            reason,
            next_opening,
        }) => {
            let mut body = json!({"success": false, "error": message});
            if let Some(reason) = reason {
                body["reason"] = json!(reason);
            }
            if let Some(next_opening) = next_opening {
                body["nextOpening"] = json!(next_opening);
            }
            (StatusCode::FORBIDDEN, Json(body)).into_response()
        }
        Err(err) => {
            log::error!("registration window check failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Error al validar horario de registro",
                })),
            )
                .into_response()
        }
    }
}

/// Fire the reservation confirmation for one recipient after the mutation
/// committed. Outcomes never influence the response; they land in the log.
pub(crate) fn dispatch_reservation_notice(state: &AppState, booked: &BookedReservation) {
    let notifier = state.notifier.clone();
    let notice = ReservationNotice {
        first_name: booked.user.first_name.clone(),
        email: booked.user.email.clone(),
        whatsapp: booked.user.whatsapp.clone(),
        date: booked.timeslot.date,
        start_time: booked.timeslot.start_time.clone(),
        end_time: booked.timeslot.end_time.clone(),
        token: booked.reservation.qr_code.clone(),
    };
    let reservation_id = booked.reservation.id;
    tokio::spawn(async move {
        let report = notifier.send_reservation(&notice).await;
        report.log(&format!("reservation {reservation_id}"));
    });
}
