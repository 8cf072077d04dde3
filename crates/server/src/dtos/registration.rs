use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegistrationRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub sports: Option<Vec<String>>,
    pub cedula: Option<String>,
    pub edad: Option<i16>,
    pub sector: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct ListRegistrationsQuery {
    pub status: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRegistrationRequest {
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AltEmailRequest {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendWhatsAppRequest {
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct CedulaSearchQuery {
    pub cedula: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyTicketRequest {
    pub ticket_id: Option<String>,
}
