pub mod escaperoom;
pub mod health;
pub mod registration;
pub mod scan;
pub mod stats;
pub mod verification;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Both logical APIs: the festival endpoints at the root and the
/// escape-room endpoints under `/escaperoom`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/registrations",
            post(registration::create).get(registration::list),
        )
        .route(
            "/registrations/search",
            get(registration::search_by_cedula),
        )
        .route(
            "/registrations/{id}",
            get(registration::get_by_id).patch(registration::update),
        )
        .route("/registrations/{id}/resend", post(registration::resend))
        .route(
            "/registrations/{id}/send-alt-email",
            post(registration::send_alt_email),
        )
        .route(
            "/registrations/{id}/send-whatsapp",
            post(registration::send_whatsapp),
        )
        .route("/verify", post(verification::verify))
        .route("/stats", get(stats::get_stats))
        .route("/scan/validate", post(scan::validate))
        .route("/scan/entrada", post(scan::entrada))
        .route("/scan/entrega", post(scan::entrega))
        .route("/scan/entrega-combined", post(scan::entrega_combined))
        .route("/scan/completo", post(scan::completo))
        .route("/scan/sorteo", post(scan::sorteo))
        .route("/scan/history", get(scan::history))
        .route("/scan/stats", get(scan::stats))
        .nest("/escaperoom", escaperoom::router(state.clone()))
        .with_state(state)
}
