use chrono::{NaiveDate, NaiveDateTime};
use models::rating::InterestRating;
use models::slots::slots_per_day;
use models::window::{DEFAULT_DURATION_MINUTES, DEFAULT_END_HOUR, DEFAULT_START_HOUR};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DbErr, EntityTrait, QueryOrder,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::escaperoom::{
    registration_control, time_slot, timeslot_config, timeslot_config::EventDates, user,
};
use crate::error::ServiceError;

use super::timeslot::TimeslotService;
use super::window::RegistrationWindow;

/// Combined admin view: manual override plus the schedule in force.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStatusView {
    pub manual_override: Option<bool>,
    pub reason: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
    pub updated_by: Option<String>,
    pub event_dates: Vec<NaiveDate>,
    pub duration_minutes: i32,
    pub start_hour: i32,
    pub end_hour: i32,
    pub slots_per_day: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeslotConfigView {
    pub event_dates: Vec<NaiveDate>,
    pub duration_minutes: i32,
    pub start_hour: i32,
    pub end_hour: i32,
    pub slots_per_day: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSummary {
    pub message: String,
    pub total_slots: u64,
    pub slots_per_day: i32,
    pub days: usize,
}

/// CSV-ready export row for one escape-room participant.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserExportRow {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub whatsapp: String,
    pub trivia_completed: bool,
    pub has_reservation: bool,
    pub reservation_status: String,
    pub checked_in: bool,
    pub interest_rating: Option<i16>,
    pub interest_level: String,
    pub partner_name: String,
    pub timeslot: String,
    pub created_at: NaiveDateTime,
}

pub struct AdminService;

impl AdminService {
    pub async fn registration_status(
        db: &DatabaseConnection,
    ) -> Result<RegistrationStatusView, DbErr> {
        let control = RegistrationWindow::latest_override(db).await?;
        let config = RegistrationWindow::latest_config(db).await?;

        Ok(RegistrationStatusView {
            manual_override: control.as_ref().map(|c| c.is_open),
            reason: control.as_ref().and_then(|c| c.reason.clone()),
            updated_at: control.as_ref().map(|c| c.updated_at),
            updated_by: control.and_then(|c| c.updated_by),
            event_dates: config
                .as_ref()
                .map(|c| c.event_dates.0.clone())
                .unwrap_or_default(),
            duration_minutes: config
                .as_ref()
                .map_or(DEFAULT_DURATION_MINUTES as i32, |c| c.duration_minutes),
            start_hour: config
                .as_ref()
                .map_or(DEFAULT_START_HOUR as i32, |c| c.start_hour),
            end_hour: config
                .as_ref()
                .map_or(DEFAULT_END_HOUR as i32, |c| c.end_hour),
            slots_per_day: config.as_ref().map_or(48, |c| c.slots_per_day),
        })
    }

    pub async fn set_registration_control(
        db: &DatabaseConnection,
        is_open: bool,
        reason: Option<String>,
        updated_by: Option<String>,
        now: NaiveDateTime,
    ) -> Result<registration_control::Model, DbErr> {
        registration_control::ActiveModel {
            id: Set(Uuid::new_v4()),
            is_open: Set(is_open),
            reason: Set(reason),
            updated_by: Set(updated_by),
            updated_at: Set(now),
        }
        .insert(db)
        .await
    }

    /// Drop every override row; the automatic schedule takes over again.
    pub async fn reset_registration_control(db: &DatabaseConnection) -> Result<u64, DbErr> {
        let deleted = registration_control::Entity::delete_many().exec(db).await?;
        Ok(deleted.rows_affected)
    }

    pub async fn timeslot_config(db: &DatabaseConnection) -> Result<TimeslotConfigView, DbErr> {
        let config = RegistrationWindow::latest_config(db).await?;
        Ok(TimeslotConfigView {
            event_dates: config
                .as_ref()
                .map(|c| c.event_dates.0.clone())
                .unwrap_or_default(),
            duration_minutes: config
                .as_ref()
                .map_or(DEFAULT_DURATION_MINUTES as i32, |c| c.duration_minutes),
            start_hour: config
                .as_ref()
                .map_or(DEFAULT_START_HOUR as i32, |c| c.start_hour),
            end_hour: config
                .as_ref()
                .map_or(DEFAULT_END_HOUR as i32, |c| c.end_hour),
            slots_per_day: config.as_ref().map_or(48, |c| c.slots_per_day),
        })
    }

    /// Save a new configuration revision with the derived slots-per-day.
    pub async fn set_timeslot_config(
        db: &DatabaseConnection,
        event_dates: Vec<NaiveDate>,
        duration_minutes: i32,
        start_hour: i32,
        end_hour: i32,
        updated_by: Option<String>,
        now: NaiveDateTime,
    ) -> Result<timeslot_config::Model, ServiceError> {
        if event_dates.is_empty() {
            return Err(ServiceError::BadRequest(
                "Debes indicar al menos una fecha del evento".into(),
            ));
        }
        if duration_minutes <= 0 {
            return Err(ServiceError::BadRequest(
                "La duración del turno debe ser mayor a cero".into(),
            ));
        }
        if !(0..=24).contains(&start_hour) || !(0..=24).contains(&end_hour) || start_hour >= end_hour
        {
            return Err(ServiceError::BadRequest(
                "El horario debe cumplir 0 <= inicio < fin <= 24".into(),
            ));
        }

        let per_day = slots_per_day(duration_minutes as u32, start_hour as u32, end_hour as u32);

        let row = timeslot_config::ActiveModel {
            id: Set(Uuid::new_v4()),
            event_dates: Set(EventDates(event_dates)),
            duration_minutes: Set(duration_minutes),
            start_hour: Set(start_hour),
            end_hour: Set(end_hour),
            slots_per_day: Set(per_day as i32),
            updated_by: Set(updated_by),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;
        Ok(row)
    }

    /// Regenerate the grid from the saved configuration. The guarded clear
    /// runs first, so existing bookings block the whole operation.
    pub async fn generate_timeslots(db: &DatabaseConnection) -> Result<GenerateSummary, ServiceError> {
        let config = RegistrationWindow::latest_config(db).await?;
        let config = match config {
            Some(config) if !config.event_dates.0.is_empty() => config,
            _ => {
                return Err(ServiceError::BadRequest(
                    "No hay configuración de turnos. Configure primero.".into(),
                ));
            }
        };

        TimeslotService::clear_all(db).await?;
        let total_slots = TimeslotService::generate_from_config(db, &config).await?;

        Ok(GenerateSummary {
            message: format!("Generados {total_slots} turnos"),
            total_slots,
            slots_per_day: config.slots_per_day,
            days: config.event_dates.0.len(),
        })
    }

    pub async fn clear_timeslots(db: &DatabaseConnection) -> Result<u64, ServiceError> {
        TimeslotService::clear_all(db).await
    }

    /// Export every user joined with the latest active reservation, the
    /// partner's name, and the rating label.
    pub async fn users_data(db: &DatabaseConnection) -> Result<Vec<UserExportRow>, DbErr> {
        let users = user::Entity::find()
            .order_by_desc(user::Column::CreatedAt)
            .all(db)
            .await?;

        let mut rows = Vec::with_capacity(users.len());
        for current in users {
            let latest = super::user::UserService::latest_active_reservation(db, current.id).await?;
            let slot = match &latest {
                Some(reservation) => {
                    time_slot::Entity::find_by_id(reservation.timeslot_id)
                        .one(db)
                        .await?
                }
                None => None,
            };
            let partner = super::user::UserService::get_partner(db, &current).await?;

            let interest_rating = latest.as_ref().and_then(|r| r.interest_rating);
            rows.push(UserExportRow {
                first_name: current.first_name,
                last_name: current.last_name,
                email: current.email,
                whatsapp: current.whatsapp,
                trivia_completed: current.trivia_completed,
                has_reservation: latest.is_some(),
                reservation_status: latest
                    .as_ref()
                    .map(|r| r.status.clone())
                    .unwrap_or_else(|| "Sin reserva".into()),
                checked_in: latest
                    .as_ref()
                    .map(|r| r.checked_in_at.is_some())
                    .unwrap_or(false),
                interest_rating,
                interest_level: InterestRating::label_for(interest_rating).to_string(),
                partner_name: partner
                    .map(|p| p.full_name())
                    .unwrap_or_else(|| "Sin compañero".into()),
                timeslot: slot
                    .map(|s| s.label())
                    .unwrap_or_else(|| "Sin turno".into()),
                created_at: current.created_at,
            });
        }
        Ok(rows)
    }
}
