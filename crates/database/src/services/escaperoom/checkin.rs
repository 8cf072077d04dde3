use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use models::clock::EventClock;
use models::rating::InterestRating;
use models::status::ReservationStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::escaperoom::{reservation, time_slot, user};
use crate::error::ServiceError;

use super::timeslot::TimeslotService;
use super::user::UserService;

/// A resolved ticket: reservation plus the rows the scanner displays.
#[derive(Debug)]
pub struct TicketDetail {
    pub reservation: reservation::Model,
    pub user: user::Model,
    pub timeslot: time_slot::Model,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub reservation_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSlot {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
}

/// A checked-in, not-yet-rated pair, keyed internally by the smaller of the
/// two user ids so each group appears once.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckedInGroup {
    pub user1: GroupMember,
    pub user2: GroupMember,
    pub timeslot: GroupSlot,
    pub checked_in_at: Option<NaiveDateTime>,
}

pub struct CheckinService;

impl CheckinService {
    /// Resolve a ticket by token without mutating it.
    ///
    /// Terminal states are reported as errors: `USED` includes the original
    /// check-in time so staff can explain the rejection.
    pub async fn get_by_token(
        db: &DatabaseConnection,
        qr_code: &str,
        clock: &EventClock,
    ) -> Result<TicketDetail, ServiceError> {
        let reservation = reservation::Entity::find()
            .filter(reservation::Column::QrCode.eq(qr_code))
            .one(db)
            .await?
            .ok_or_else(|| {
                let prefix: String = qr_code.chars().take(8).collect();
                ServiceError::NotFound(format!(
                    "Código QR no válido. No se encontró ninguna reserva asociada a este código ({prefix}...). Verifica que el QR sea correcto o contacta al personal del evento."
                ))
            })?;

        match reservation.status.parse::<ReservationStatus>() {
            Ok(ReservationStatus::Used) => {
                let used_at = reservation
                    .checked_in_at
                    .map(|t| clock.format_local(t))
                    .unwrap_or_else(|| "fecha desconocida".into());
                return Err(ServiceError::BadRequest(format!(
                    "Este código QR ya fue utilizado el {used_at}. Cada QR solo puede usarse una vez. Si necesitas ayuda, contacta al personal del evento."
                )));
            }
            Ok(ReservationStatus::Cancelled) => {
                return Err(ServiceError::BadRequest(
                    "Esta reserva fue cancelada previamente y no puede ser utilizada. Por favor, crea una nueva reserva o contacta al personal del evento.".into(),
                ));
            }
            _ => {}
        }

        Self::attach_detail(db, reservation).await
    }

    /// Single check-in: `ACTIVE → USED`, stamping the moment.
    pub async fn checkin(
        db: &DatabaseConnection,
        qr_code: &str,
        now: NaiveDateTime,
        clock: &EventClock,
    ) -> Result<TicketDetail, ServiceError> {
        let detail = Self::get_by_token(db, qr_code, clock).await?;

        let mut active: reservation::ActiveModel = detail.reservation.into();
        active.status = Set(ReservationStatus::Used.as_str().to_string());
        active.checked_in_at = Set(Some(now));
        let updated = active.update(db).await?;

        log::info!("checked in reservation {}", updated.id);
        Ok(TicketDetail {
            reservation: updated,
            user: detail.user,
            timeslot: detail.timeslot,
        })
    }

    /// Group check-in: both tickets must belong to mutual partners; both
    /// flip to USED with the same timestamp inside one transaction.
    pub async fn checkin_group(
        db: &DatabaseConnection,
        qr_code_1: &str,
        qr_code_2: &str,
        now: NaiveDateTime,
        clock: &EventClock,
    ) -> Result<(TicketDetail, TicketDetail), ServiceError> {
        let first = Self::get_by_token(db, qr_code_1, clock).await?;
        let second = Self::get_by_token(db, qr_code_2, clock).await?;
        Self::ensure_partners(&first, &second)?;

        let txn = db.begin().await?;
        let mut active: reservation::ActiveModel = first.reservation.into();
        active.status = Set(ReservationStatus::Used.as_str().to_string());
        active.checked_in_at = Set(Some(now));
        let updated_1 = active.update(&txn).await?;

        let mut active: reservation::ActiveModel = second.reservation.into();
        active.status = Set(ReservationStatus::Used.as_str().to_string());
        active.checked_in_at = Set(Some(now));
        let updated_2 = active.update(&txn).await?;
        txn.commit().await?;

        log::info!(
            "group check-in completed for {} and {}",
            first.user.id,
            second.user.id
        );
        Ok((
            TicketDetail {
                reservation: updated_1,
                user: first.user,
                timeslot: first.timeslot,
            },
            TicketDetail {
                reservation: updated_2,
                user: second.user,
                timeslot: second.timeslot,
            },
        ))
    }

    /// Move a still-active ticket to another slot. The token is preserved:
    /// the QR a visitor already holds keeps working.
    pub async fn reassign(
        db: &DatabaseConnection,
        qr_code: &str,
        new_timeslot_id: Uuid,
        clock: &EventClock,
    ) -> Result<TicketDetail, ServiceError> {
        let detail = Self::get_by_token(db, qr_code, clock).await?;

        let new_slot = TimeslotService::get_by_id(db, new_timeslot_id)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(
                    "El turno seleccionado no existe o ya no está disponible. Por favor, actualiza la lista de turnos y selecciona otro horario.".into(),
                )
            })?;

        let mut active: reservation::ActiveModel = detail.reservation.into();
        active.timeslot_id = Set(new_timeslot_id);
        let updated = active.update(db).await?;

        Ok(TicketDetail {
            reservation: updated,
            user: detail.user,
            timeslot: new_slot,
        })
    }

    /// Group variant of [`Self::reassign`]: partner check plus one
    /// transaction over both rows.
    pub async fn reassign_group(
        db: &DatabaseConnection,
        qr_code_1: &str,
        qr_code_2: &str,
        new_timeslot_id: Uuid,
        clock: &EventClock,
    ) -> Result<(TicketDetail, TicketDetail), ServiceError> {
        let first = Self::get_by_token(db, qr_code_1, clock).await?;
        let second = Self::get_by_token(db, qr_code_2, clock).await?;
        Self::ensure_partners(&first, &second)?;

        let new_slot = TimeslotService::get_by_id(db, new_timeslot_id)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(
                    "El turno seleccionado no existe o ya no está disponible. Por favor, actualiza la lista de turnos y selecciona otro horario.".into(),
                )
            })?;

        let txn = db.begin().await?;
        let mut active: reservation::ActiveModel = first.reservation.into();
        active.timeslot_id = Set(new_timeslot_id);
        let updated_1 = active.update(&txn).await?;

        let mut active: reservation::ActiveModel = second.reservation.into();
        active.timeslot_id = Set(new_timeslot_id);
        let updated_2 = active.update(&txn).await?;
        txn.commit().await?;

        Ok((
            TicketDetail {
                reservation: updated_1,
                user: first.user,
                timeslot: new_slot.clone(),
            },
            TicketDetail {
                reservation: updated_2,
                user: second.user,
                timeslot: new_slot,
            },
        ))
    }

    /// Pairs where both members are USED and unrated, one entry per group.
    pub async fn checked_in_groups(
        db: &DatabaseConnection,
    ) -> Result<Vec<CheckedInGroup>, DbErr> {
        let rows = reservation::Entity::find()
            .filter(reservation::Column::Status.eq(ReservationStatus::Used.as_str()))
            .filter(reservation::Column::CheckedInAt.is_not_null())
            .filter(reservation::Column::InterestRating.is_null())
            .order_by_desc(reservation::Column::CheckedInAt)
            .find_also_related(user::Entity)
            .all(db)
            .await?;

        let by_user: HashMap<Uuid, &reservation::Model> =
            rows.iter().map(|(r, _)| (r.user_id, r)).collect();

        let mut groups: HashMap<Uuid, CheckedInGroup> = HashMap::new();
        let mut order: Vec<Uuid> = Vec::new();

        for (reservation, joined_user) in &rows {
            let Some(joined_user) = joined_user else {
                continue;
            };
            let Some(partner_id) = joined_user.partner_id else {
                continue;
            };
            let key = if joined_user.id < partner_id {
                joined_user.id
            } else {
                partner_id
            };
            if groups.contains_key(&key) {
                continue;
            }
            let Some(partner_reservation) = by_user.get(&partner_id) else {
                continue;
            };
            let Some(partner) = user::Entity::find_by_id(partner_id).one(db).await? else {
                continue;
            };
            let Some(slot) = time_slot::Entity::find_by_id(reservation.timeslot_id)
                .one(db)
                .await?
            else {
                continue;
            };

            groups.insert(
                key,
                CheckedInGroup {
                    user1: GroupMember {
                        id: joined_user.id,
                        first_name: joined_user.first_name.clone(),
                        last_name: joined_user.last_name.clone(),
                        email: joined_user.email.clone(),
                        reservation_id: reservation.id,
                    },
                    user2: GroupMember {
                        id: partner.id,
                        first_name: partner.first_name,
                        last_name: partner.last_name,
                        email: partner.email,
                        reservation_id: partner_reservation.id,
                    },
                    timeslot: GroupSlot {
                        date: slot.date,
                        start_time: slot.start_time,
                        end_time: slot.end_time,
                    },
                    checked_in_at: reservation.checked_in_at,
                },
            );
            order.push(key);
        }

        Ok(order
            .into_iter()
            .filter_map(|key| groups.remove(&key))
            .collect())
    }

    /// Stamp the interest rating on both reservations of a group.
    pub async fn rate_group(
        db: &DatabaseConnection,
        reservation_id_1: Uuid,
        reservation_id_2: Uuid,
        rating: i16,
        now: NaiveDateTime,
    ) -> Result<(reservation::Model, reservation::Model), ServiceError> {
        let rating = InterestRating::try_from(rating).map_err(ServiceError::BadRequest)?;

        let first = reservation::Entity::find_by_id(reservation_id_1)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Reserva no encontrada".into()))?;
        let second = reservation::Entity::find_by_id(reservation_id_2)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Reserva no encontrada".into()))?;

        let txn = db.begin().await?;
        let mut active: reservation::ActiveModel = first.into();
        active.interest_rating = Set(Some(rating.value()));
        active.rated_at = Set(Some(now));
        let updated_1 = active.update(&txn).await?;

        let mut active: reservation::ActiveModel = second.into();
        active.interest_rating = Set(Some(rating.value()));
        active.rated_at = Set(Some(now));
        let updated_2 = active.update(&txn).await?;
        txn.commit().await?;

        log::info!(
            "group rated {} / {} -> {}",
            updated_1.id,
            updated_2.id,
            rating.value()
        );
        Ok((updated_1, updated_2))
    }

    fn ensure_partners(first: &TicketDetail, second: &TicketDetail) -> Result<(), ServiceError> {
        let mutual = first.user.partner_id == Some(second.user.id)
            && second.user.partner_id == Some(first.user.id);
        if !mutual {
            return Err(ServiceError::BadRequest(format!(
                "Los códigos QR escaneados no pertenecen al mismo grupo. {} y {} no están registrados como compañeros. Verifica que ambos QR sean del mismo grupo.",
                first.user.first_name, second.user.first_name
            )));
        }
        Ok(())
    }

    async fn attach_detail(
        db: &DatabaseConnection,
        reservation: reservation::Model,
    ) -> Result<TicketDetail, ServiceError> {
        let user = UserService::get_by_id(db, reservation.user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Usuario no encontrado".into()))?;
        let timeslot = TimeslotService::get_by_id(db, reservation.timeslot_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Turno no encontrado".into()))?;
        Ok(TicketDetail {
            reservation,
            user,
            timeslot,
        })
    }
}
