use chrono::NaiveDate;
use models::window::{self, ManualOverride, WindowSchedule, WindowStatus};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QueryOrder};

use crate::entities::escaperoom::{registration_control, timeslot_config};

pub struct RegistrationWindow;

impl RegistrationWindow {
    pub async fn latest_override(
        db: &DatabaseConnection,
    ) -> Result<Option<registration_control::Model>, DbErr> {
        registration_control::Entity::find()
            .order_by_desc(registration_control::Column::UpdatedAt)
            .one(db)
            .await
    }

    pub async fn latest_config(
        db: &DatabaseConnection,
    ) -> Result<Option<timeslot_config::Model>, DbErr> {
        timeslot_config::Entity::find()
            .order_by_desc(timeslot_config::Column::UpdatedAt)
            .one(db)
            .await
    }

    /// Schedule currently in force: the latest config when it carries dates,
    /// the baked-in defaults otherwise.
    pub async fn schedule(db: &DatabaseConnection) -> Result<WindowSchedule, DbErr> {
        let config = Self::latest_config(db).await?;
        Ok(match config {
            Some(config) if !config.event_dates.0.is_empty() => WindowSchedule {
                event_dates: config.event_dates.0,
                start_hour: config.start_hour.max(0) as u32,
                end_hour: config.end_hour.max(0) as u32,
            },
            _ => WindowSchedule::default(),
        })
    }

    /// Is registration open right now? `today`/`hour` come from the event
    /// clock, already converted to the event's local zone.
    pub async fn status(
        db: &DatabaseConnection,
        today: NaiveDate,
        hour: u32,
    ) -> Result<WindowStatus, DbErr> {
        let manual = Self::latest_override(db).await?.map(|row| ManualOverride {
            is_open: row.is_open,
            reason: row.reason,
        });
        let schedule = Self::schedule(db).await?;
        Ok(window::evaluate(today, hour, &schedule, manual.as_ref()))
    }
}
