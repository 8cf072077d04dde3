use chrono::NaiveDate;
use models::slots::{build_slots, parse_hhmm};
use models::status::ReservationStatus;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    ActiveValue::Set,
};
use uuid::Uuid;

use crate::entities::escaperoom::{reservation, time_slot, timeslot_config};
use crate::error::ServiceError;

/// Seats per generated slot: the room admits one pair at a time.
pub const DEFAULT_SLOT_CAPACITY: i32 = 2;

/// A slot with its current non-cancelled booking count.
pub struct SlotAvailability {
    pub slot: time_slot::Model,
    pub reserved: u64,
}

pub struct TimeslotService;

impl TimeslotService {
    pub async fn get_by_id(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<Option<time_slot::Model>, DbErr> {
        time_slot::Entity::find_by_id(id).one(db).await
    }

    /// Cancelled rows never consume capacity.
    pub async fn count_active_reservations(
        db: &DatabaseConnection,
        timeslot_id: Uuid,
    ) -> Result<u64, DbErr> {
        reservation::Entity::find()
            .filter(reservation::Column::TimeslotId.eq(timeslot_id))
            .filter(reservation::Column::Status.ne(ReservationStatus::Cancelled.as_str()))
            .count(db)
            .await
    }

    /// Slots for one calendar date, ordered, with occupancy counts.
    pub async fn slots_for_date(
        db: &DatabaseConnection,
        date: NaiveDate,
    ) -> Result<Vec<SlotAvailability>, DbErr> {
        let slots = time_slot::Entity::find()
            .filter(time_slot::Column::Date.eq(date))
            .order_by_asc(time_slot::Column::StartTime)
            .all(db)
            .await?;

        let mut result = Vec::with_capacity(slots.len());
        for slot in slots {
            let reserved = Self::count_active_reservations(db, slot.id).await?;
            result.push(SlotAvailability { slot, reserved });
        }
        Ok(result)
    }

    /// Today's slots that have not started yet, for walk-in reassignment.
    pub async fn available_today(
        db: &DatabaseConnection,
        today: NaiveDate,
        minutes_into_day: u32,
    ) -> Result<Vec<time_slot::Model>, DbErr> {
        let slots = time_slot::Entity::find()
            .filter(time_slot::Column::Date.eq(today))
            .order_by_asc(time_slot::Column::StartTime)
            .all(db)
            .await?;

        Ok(slots
            .into_iter()
            .filter(|slot| {
                parse_hhmm(&slot.start_time)
                    .map(|start| start >= minutes_into_day)
                    .unwrap_or(false)
            })
            .collect())
    }

    /// Regenerate the whole grid from a configuration. Callers clear first;
    /// generation itself only inserts.
    pub async fn generate_from_config(
        db: &DatabaseConnection,
        config: &timeslot_config::Model,
    ) -> Result<u64, ServiceError> {
        let templates = build_slots(
            &config.event_dates.0,
            config.duration_minutes.max(0) as u32,
            config.start_hour.max(0) as u32,
            config.end_hour.max(0) as u32,
        );

        if templates.is_empty() {
            return Err(ServiceError::BadRequest(
                "La configuración no produce ningún turno".into(),
            ));
        }

        let rows: Vec<time_slot::ActiveModel> = templates
            .into_iter()
            .map(|template| time_slot::ActiveModel {
                id: Set(Uuid::new_v4()),
                date: Set(template.date),
                start_time: Set(template.start_time),
                end_time: Set(template.end_time),
                capacity: Set(DEFAULT_SLOT_CAPACITY),
            })
            .collect();

        let count = rows.len() as u64;
        time_slot::Entity::insert_many(rows).exec(db).await?;
        log::info!("generated {count} timeslots");
        Ok(count)
    }

    /// Destructive clear, refused while any reservation references any slot.
    pub async fn clear_all(db: &DatabaseConnection) -> Result<u64, ServiceError> {
        let reservations = reservation::Entity::find().count(db).await?;
        if reservations > 0 {
            let plural = if reservations > 1 { "s" } else { "" };
            return Err(ServiceError::BadRequest(format!(
                "No se pueden eliminar los turnos porque existen {reservations} reserva{plural} activa{plural}. Elimina las reservas primero."
            )));
        }

        let deleted = time_slot::Entity::delete_many().exec(db).await?;
        log::info!("deleted {} timeslots", deleted.rows_affected);
        Ok(deleted.rows_affected)
    }
}
