use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::services::festival::registration::{
    ContactUpdate, NewRegistration, RegistrationService,
};
use models::contact::{is_valid_email, is_valid_phone};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::dtos::common::ok;
use crate::dtos::registration::{
    AltEmailRequest, CedulaSearchQuery, CreateRegistrationRequest, ListRegistrationsQuery,
    SendWhatsAppRequest, UpdateRegistrationRequest,
};
use crate::error::ApiError;
use crate::state::AppState;

/// Create a festival registration and mail the QR ticket.
#[utoipa::path(
    post,
    path = "/registrations",
    request_body = CreateRegistrationRequest,
    responses(
        (status = 201, description = "Registration created, QR email attempted"),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email or cédula already registered")
    ),
    tag = "Registrations"
)]
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateRegistrationRequest>,
) -> Result<Response, ApiError> {
    let Some(sports) = body.sports else {
        return Err(ApiError::BadRequest("Todos los campos son requeridos".into()));
    };

    let registration = RegistrationService::create(
        &state.festival,
        NewRegistration {
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            phone: body.phone,
            cedula: body.cedula,
            edad: body.edad,
            sector: body.sector,
            sports,
        },
        state.clock.now_utc(),
    )
    .await?;

    let email = state
        .notifier
        .send_festival_ticket(
            &registration.email,
            &registration.first_name,
            &registration.id.to_string(),
        )
        .await;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": registration,
            "notifications": {"email": email},
        })),
    )
        .into_response())
}

/// List registrations, optionally filtered by status.
#[utoipa::path(
    get,
    path = "/registrations",
    params(ListRegistrationsQuery),
    responses(
        (status = 200, description = "Registrations retrieved")
    ),
    tag = "Registrations"
)]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListRegistrationsQuery>,
) -> Result<Json<Value>, ApiError> {
    let rows =
        RegistrationService::get_all(&state.festival, query.status, query.limit, query.offset)
            .await?;
    Ok(Json(json!({
        "success": true,
        "data": rows,
        "total": rows.len(),
    })))
}

/// Look up one registration.
#[utoipa::path(
    get,
    path = "/registrations/{id}",
    params(("id" = Uuid, Path, description = "Registration ID")),
    responses(
        (status = 200, description = "Registration found"),
        (status = 404, description = "Registration not found")
    ),
    tag = "Registrations"
)]
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let row = RegistrationService::get_by_id(&state.festival, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Registro no encontrado".into()))?;
    Ok(ok(row))
}

/// Search a registration by cédula.
#[utoipa::path(
    get,
    path = "/registrations/search",
    params(CedulaSearchQuery),
    responses(
        (status = 200, description = "Registration found"),
        (status = 400, description = "Malformed cédula"),
        (status = 404, description = "No registration for that cédula")
    ),
    tag = "Registrations"
)]
pub async fn search_by_cedula(
    State(state): State<AppState>,
    Query(query): Query<CedulaSearchQuery>,
) -> Result<Json<Value>, ApiError> {
    let cedula = query
        .cedula
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::BadRequest("La cédula es requerida".into()))?;
    if cedula.len() != 10 || !cedula.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::BadRequest("La cédula debe tener 10 dígitos".into()));
    }

    let row = RegistrationService::get_by_cedula(&state.festival, &cedula)
        .await?
        .ok_or_else(|| ApiError::NotFound("Registro no encontrado".into()))?;
    Ok(ok(row))
}

/// Update contact details (email/phone only) and re-send the QR.
#[utoipa::path(
    patch,
    path = "/registrations/{id}",
    params(("id" = Uuid, Path, description = "Registration ID")),
    request_body = UpdateRegistrationRequest,
    responses(
        (status = 200, description = "Registration updated, QR re-sent"),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Registration not found")
    ),
    tag = "Registrations"
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateRegistrationRequest>,
) -> Result<Json<Value>, ApiError> {
    let updated = RegistrationService::update_contact(
        &state.festival,
        id,
        ContactUpdate {
            email: body.email,
            phone: body.phone,
        },
        state.clock.now_utc(),
    )
    .await?;

    let email = state
        .notifier
        .send_festival_ticket(&updated.email, &updated.first_name, &updated.id.to_string())
        .await;

    Ok(Json(json!({
        "success": true,
        "data": updated,
        "notifications": {"email": email},
    })))
}

/// Re-send the QR to the registered address.
#[utoipa::path(
    post,
    path = "/registrations/{id}/resend",
    params(("id" = Uuid, Path, description = "Registration ID")),
    responses(
        (status = 200, description = "QR re-sent"),
        (status = 404, description = "Registration not found")
    ),
    tag = "Registrations"
)]
pub async fn resend(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let row = RegistrationService::get_by_id(&state.festival, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Registro no encontrado".into()))?;

    let email = state
        .notifier
        .send_festival_ticket(&row.email, &row.first_name, &row.id.to_string())
        .await;

    Ok(Json(json!({
        "success": true,
        "message": "QR reenviado exitosamente",
        "notifications": {"email": email},
    })))
}

/// Send the QR to an alternate address without changing the stored one.
#[utoipa::path(
    post,
    path = "/registrations/{id}/send-alt-email",
    params(("id" = Uuid, Path, description = "Registration ID")),
    request_body = AltEmailRequest,
    responses(
        (status = 200, description = "QR sent to the alternate address"),
        (status = 400, description = "Invalid email"),
        (status = 404, description = "Registration not found")
    ),
    tag = "Registrations"
)]
pub async fn send_alt_email(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AltEmailRequest>,
) -> Result<Json<Value>, ApiError> {
    let email = body
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::BadRequest("El email es requerido".into()))?;
    if !is_valid_email(&email) {
        return Err(ApiError::BadRequest("Email inválido".into()));
    }

    let row = RegistrationService::get_by_id(&state.festival, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Registro no encontrado".into()))?;

    let outcome = state
        .notifier
        .send_festival_ticket(&email, &row.first_name, &row.id.to_string())
        .await;

    Ok(Json(json!({
        "success": true,
        "message": "QR enviado al correo alternativo exitosamente",
        "notification": outcome,
    })))
}

/// Staff-triggered WhatsApp copy of the ticket.
#[utoipa::path(
    post,
    path = "/registrations/{id}/send-whatsapp",
    params(("id" = Uuid, Path, description = "Registration ID")),
    request_body = SendWhatsAppRequest,
    responses(
        (status = 200, description = "WhatsApp message attempted"),
        (status = 400, description = "Invalid phone"),
        (status = 404, description = "Registration not found")
    ),
    tag = "Registrations"
)]
pub async fn send_whatsapp(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SendWhatsAppRequest>,
) -> Result<Json<Value>, ApiError> {
    let phone = body
        .phone
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::BadRequest("El teléfono es requerido".into()))?;
    if !is_valid_phone(&phone) {
        return Err(ApiError::BadRequest(
            "El teléfono debe tener 10 dígitos y empezar con 09".into(),
        ));
    }

    let row = RegistrationService::get_by_id(&state.festival, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Registro no encontrado".into()))?;

    let outcome = state
        .notifier
        .send_festival_whatsapp(&phone, &row.first_name, &row.id.to_string())
        .await;

    Ok(Json(json!({
        "success": true,
        "message": "QR enviado por WhatsApp exitosamente",
        "notification": outcome,
    })))
}
