use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use database::services::escaperoom::user::{NewUser, UserService};
use serde_json::json;

use crate::dtos::common::ok;
use crate::dtos::escaperoom::{EmailSearchQuery, NewUserRequest, RegisterMultipleRequest, UserSearchResponse};
use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/register-multiple", post(register_multiple))
        .route("/users/search", get(search))
}

fn to_new_user(dto: NewUserRequest) -> NewUser {
    NewUser {
        first_name: dto.first_name,
        last_name: dto.last_name,
        email: dto.email,
        whatsapp: dto.whatsapp,
    }
}

/// Register the mandatory two-person group with mutual partner links.
#[utoipa::path(
    post,
    path = "/escaperoom/users/register-multiple",
    request_body = RegisterMultipleRequest,
    responses(
        (status = 201, description = "Both users created and linked as partners"),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Registration window closed"),
        (status = 409, description = "Email already registered or already in a group")
    ),
    tag = "EscapeRoom"
)]
pub async fn register_multiple(
    State(state): State<AppState>,
    Json(body): Json<RegisterMultipleRequest>,
) -> Result<Response, ApiError> {
    let Ok([first, second]) = <[NewUserRequest; 2]>::try_from(body.users) else {
        return Err(ApiError::BadRequest(
            "Debes registrar exactamente 2 personas".into(),
        ));
    };

    let (user1, user2) = UserService::create_pair(
        &state.escaperoom,
        [to_new_user(first), to_new_user(second)],
        state.clock.now_utc(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({"success": true, "data": [user1, user2]})),
    )
        .into_response())
}

/// Look up a user by email, with partner and latest active reservation.
#[utoipa::path(
    get,
    path = "/escaperoom/users/search",
    params(EmailSearchQuery),
    responses(
        (status = 200, description = "User found"),
        (status = 400, description = "Missing email"),
        (status = 403, description = "Registration window closed"),
        (status = 404, description = "User not found")
    ),
    tag = "EscapeRoom"
)]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<EmailSearchQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let email = query
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::BadRequest("El email es requerido".into()))?;

    let profile = UserService::search(&state.escaperoom, &email).await?;
    Ok(ok(UserSearchResponse {
        user: profile.user,
        partner: profile.partner,
        reservations: profile.reservation.into_iter().collect(),
    }))
}
