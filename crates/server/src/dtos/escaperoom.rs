use database::entities::escaperoom::{reservation, time_slot, user};
use database::services::escaperoom::checkin::TicketDetail;
use database::services::escaperoom::reservation::BookedReservation;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewUserRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub whatsapp: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterMultipleRequest {
    #[serde(default)]
    pub users: Vec<NewUserRequest>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct EmailSearchQuery {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDto {
    pub question_id: Uuid,
    pub answer_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateTriviaRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub answers: Vec<AnswerDto>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct SlotsQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub user_id: Uuid,
    pub timeslot_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMultipleReservationsRequest {
    #[serde(default)]
    pub user_ids: Vec<Uuid>,
    pub timeslot_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResendQrRequest {
    #[serde(default)]
    pub email: String,
    pub new_email: Option<String>,
    pub new_whatsapp: Option<String>,
    pub new_partner_email: Option<String>,
    pub new_partner_whatsapp: Option<String>,
    pub new_timeslot_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketRequest {
    #[serde(default)]
    pub qr_code: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReassignRequest {
    #[serde(default)]
    pub qr_code: String,
    pub new_timeslot_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupCheckinRequest {
    #[serde(default)]
    pub qr_code_1: String,
    #[serde(default)]
    pub qr_code_2: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupReassignRequest {
    #[serde(default)]
    pub qr_code_1: String,
    #[serde(default)]
    pub qr_code_2: String,
    pub new_timeslot_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RateGroupRequest {
    pub reservation_id_1: Uuid,
    pub reservation_id_2: Uuid,
    pub rating: i16,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationControlRequest {
    pub is_open: bool,
    pub reason: Option<String>,
    pub admin_email: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeslotConfigRequest {
    #[serde(default)]
    pub event_dates: Vec<chrono::NaiveDate>,
    pub duration_minutes: i32,
    pub start_hour: i32,
    pub end_hour: i32,
    pub admin_email: Option<String>,
}

/// Reservation with the joined rows scanners and templates display.
#[derive(Debug, Serialize)]
pub struct TicketResponse {
    #[serde(flatten)]
    pub reservation: reservation::Model,
    pub user: user::Model,
    pub timeslot: time_slot::Model,
}

impl From<TicketDetail> for TicketResponse {
    fn from(detail: TicketDetail) -> Self {
        Self {
            reservation: detail.reservation,
            user: detail.user,
            timeslot: detail.timeslot,
        }
    }
}

/// A freshly booked reservation plus its rendered QR image.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedResponse {
    #[serde(flatten)]
    pub reservation: reservation::Model,
    pub user: user::Model,
    pub timeslot: time_slot::Model,
    pub qr_image: String,
}

impl BookedResponse {
    pub fn new(booked: BookedReservation, qr_image: String) -> Self {
        Self {
            reservation: booked.reservation,
            user: booked.user,
            timeslot: booked.timeslot,
            qr_image,
        }
    }
}

/// Search result mirroring the user row with partner and latest booking.
#[derive(Debug, Serialize)]
pub struct UserSearchResponse {
    #[serde(flatten)]
    pub user: user::Model,
    pub partner: Option<user::Model>,
    pub reservations: Vec<reservation::Model>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotAvailabilityResponse {
    #[serde(flatten)]
    pub slot: time_slot::Model,
    pub reserved: u64,
    pub available: i64,
}
