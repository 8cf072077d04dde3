use chrono::NaiveDateTime;
use models::clock::EventClock;
use models::status::ReservationStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::escaperoom::{reservation, time_slot, user};
use crate::error::ServiceError;

use super::timeslot::TimeslotService;
use super::user::UserService;

/// A reservation enriched with the rows notification templates need.
#[derive(Debug)]
pub struct BookedReservation {
    pub reservation: reservation::Model,
    pub user: user::Model,
    pub timeslot: time_slot::Model,
}

#[derive(Debug)]
pub struct ContactPoint {
    pub email: String,
    pub whatsapp: String,
}

pub struct ResendRequest {
    pub email: String,
    pub new_email: Option<String>,
    pub new_whatsapp: Option<String>,
    pub new_partner_email: Option<String>,
    pub new_partner_whatsapp: Option<String>,
    pub new_timeslot_id: Option<Uuid>,
}

#[derive(Debug)]
pub struct ResendOutcome {
    pub message: &'static str,
    /// One entry per person whose QR must be (re-)delivered, primary first.
    pub deliveries: Vec<BookedReservation>,
    pub sent_to: ContactPoint,
    pub partner_sent_to: Option<ContactPoint>,
    pub email_updated: bool,
    pub whatsapp_updated: bool,
    pub timeslot_updated: bool,
    pub reservation_created: bool,
}

pub struct ReservationService;

impl ReservationService {
    /// Book one seat. Every precondition is checked before the single
    /// insert; a fresh random token becomes the QR payload.
    pub async fn book(
        db: &DatabaseConnection,
        user_id: Uuid,
        timeslot_id: Uuid,
        now: NaiveDateTime,
    ) -> Result<BookedReservation, ServiceError> {
        let user = UserService::get_by_id(db, user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Usuario no encontrado".into()))?;

        if !user.trivia_completed {
            return Err(ServiceError::BadRequest(
                "No puedes crear una reserva sin completar la trivia. Por favor, completa las 5 preguntas de trivia antes de reservar tu turno.".into(),
            ));
        }

        if UserService::latest_active_reservation(db, user.id)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(
                "Ya tienes una reserva activa. No puedes crear múltiples reservas. Si necesitas cambiar tu turno, usa la opción de reenvío de QR.".into(),
            ));
        }

        let timeslot = TimeslotService::get_by_id(db, timeslot_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Turno no encontrado".into()))?;

        let reserved = TimeslotService::count_active_reservations(db, timeslot.id).await?;
        if reserved >= timeslot.capacity.max(0) as u64 {
            return Err(ServiceError::BadRequest(format!(
                "El turno de las {} ya está completo ({}/{} personas reservadas). Por favor, selecciona otro horario disponible.",
                timeslot.label(),
                timeslot.capacity,
                timeslot.capacity
            )));
        }

        let row = Self::insert_reservation(db, user.id, timeslot.id, now).await?;
        Ok(BookedReservation {
            reservation: row,
            user,
            timeslot,
        })
    }

    /// Book both seats of a group: all validations first, then both rows in
    /// one transaction so a half-booked pair can never exist.
    pub async fn book_pair(
        db: &DatabaseConnection,
        user_ids: &[Uuid],
        timeslot_id: Uuid,
        now: NaiveDateTime,
    ) -> Result<Vec<BookedReservation>, ServiceError> {
        if user_ids.len() != 2 {
            return Err(ServiceError::BadRequest(
                "Debes proporcionar exactamente 2 usuarios".into(),
            ));
        }

        let found = user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids.to_vec()))
            .all(db)
            .await?;
        if found.len() != 2 {
            return Err(ServiceError::NotFound(
                "Uno o más usuarios no fueron encontrados".into(),
            ));
        }
        // Keep the caller's ordering for the returned pair.
        let users: Vec<user::Model> = user_ids
            .iter()
            .filter_map(|id| found.iter().find(|u| u.id == *id).cloned())
            .collect();

        for user in &users {
            if !user.trivia_completed {
                return Err(ServiceError::BadRequest(format!(
                    "No se puede crear la reserva. {} ({}) aún no ha completado la trivia. Ambas personas del grupo deben completar las 5 preguntas antes de reservar.",
                    user.full_name(),
                    user.email
                )));
            }
            if UserService::latest_active_reservation(db, user.id)
                .await?
                .is_some()
            {
                return Err(ServiceError::Conflict(format!(
                    "No se puede crear la reserva. {} ({}) ya tiene una reserva activa. Cada persona solo puede tener una reserva a la vez.",
                    user.full_name(),
                    user.email
                )));
            }
        }

        let timeslot = TimeslotService::get_by_id(db, timeslot_id).await?.ok_or_else(|| {
            ServiceError::NotFound(
                "El turno seleccionado no existe o ya no está disponible. Por favor, actualiza la página y selecciona otro turno.".into(),
            )
        })?;

        let reserved = TimeslotService::count_active_reservations(db, timeslot.id).await?;
        let available = i64::from(timeslot.capacity) - reserved as i64;
        if available < 2 {
            return Err(ServiceError::BadRequest(format!(
                "El turno de las {} no tiene suficiente capacidad para 2 personas. Solo quedan {} lugar(es) disponible(s). Por favor, selecciona otro horario.",
                timeslot.label(),
                available.max(0)
            )));
        }

        let txn = db.begin().await?;
        let first = Self::insert_reservation(&txn, users[0].id, timeslot.id, now).await?;
        let second = Self::insert_reservation(&txn, users[1].id, timeslot.id, now).await?;
        txn.commit().await?;

        Ok([first, second]
            .into_iter()
            .zip(users)
            .map(|(reservation, user)| BookedReservation {
                reservation,
                user,
                timeslot: timeslot.clone(),
            })
            .collect())
    }

    /// Resend the QR, optionally fixing contact details or moving the slot;
    /// creates the first reservation(s) when none exists yet.
    pub async fn resend_or_create(
        db: &DatabaseConnection,
        request: ResendRequest,
        now: NaiveDateTime,
        clock: &EventClock,
    ) -> Result<ResendOutcome, ServiceError> {
        let user = UserService::get_by_email(db, &request.email)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Usuario no encontrado".into()))?;

        if !user.trivia_completed {
            return Err(ServiceError::BadRequest(
                "Debes completar la trivia primero".into(),
            ));
        }

        let partner = UserService::get_partner(db, &user).await?;
        let active = UserService::latest_active_reservation(db, user.id).await?;

        match active {
            None => Self::create_first(db, user, partner, request, now).await,
            Some(active) => Self::refresh_existing(db, user, partner, active, request, clock).await,
        }
    }

    async fn create_first(
        db: &DatabaseConnection,
        user: user::Model,
        partner: Option<user::Model>,
        request: ResendRequest,
        now: NaiveDateTime,
    ) -> Result<ResendOutcome, ServiceError> {
        let timeslot_id = request.new_timeslot_id.ok_or_else(|| {
            ServiceError::BadRequest(
                "No tienes ninguna reserva activa. Para crear tu primera reserva, debes seleccionar un turno disponible del calendario.".into(),
            )
        })?;

        let timeslot = TimeslotService::get_by_id(db, timeslot_id).await?.ok_or_else(|| {
            ServiceError::NotFound(
                "El turno seleccionado no existe o ya no está disponible. Por favor, actualiza la página y selecciona otro turno.".into(),
            )
        })?;

        let required: i64 = if partner.is_some() { 2 } else { 1 };
        let reserved = TimeslotService::count_active_reservations(db, timeslot.id).await?;
        let available = i64::from(timeslot.capacity) - reserved as i64;
        if available < required {
            return Err(ServiceError::BadRequest(format!(
                "Este turno no tiene suficiente capacidad (disponibles: {}/{required})",
                available.max(0)
            )));
        }

        let (user, email_updated, whatsapp_updated) = Self::apply_contact_update(
            db,
            user,
            request.new_email.as_deref(),
            request.new_whatsapp.as_deref(),
        )
        .await?;

        let partner = match partner {
            Some(partner) => Some(
                Self::apply_contact_update(
                    db,
                    partner,
                    request.new_partner_email.as_deref(),
                    request.new_partner_whatsapp.as_deref(),
                )
                .await?
                .0,
            ),
            None => None,
        };

        let sent_to = ContactPoint {
            email: user.email.clone(),
            whatsapp: user.whatsapp.clone(),
        };

        if let Some(partner) = partner {
            let txn = db.begin().await?;
            let first = Self::insert_reservation(&txn, user.id, timeslot.id, now).await?;
            let second = Self::insert_reservation(&txn, partner.id, timeslot.id, now).await?;
            txn.commit().await?;

            let partner_sent_to = ContactPoint {
                email: partner.email.clone(),
                whatsapp: partner.whatsapp.clone(),
            };
            Ok(ResendOutcome {
                message: "Reservas creadas y QR enviados exitosamente a ambos usuarios",
                deliveries: vec![
                    BookedReservation {
                        reservation: first,
                        user,
                        timeslot: timeslot.clone(),
                    },
                    BookedReservation {
                        reservation: second,
                        user: partner,
                        timeslot,
                    },
                ],
                sent_to,
                partner_sent_to: Some(partner_sent_to),
                email_updated,
                whatsapp_updated,
                timeslot_updated: false,
                reservation_created: true,
            })
        } else {
            let row = Self::insert_reservation(db, user.id, timeslot.id, now).await?;
            Ok(ResendOutcome {
                message: "Reserva creada y QR enviado exitosamente",
                deliveries: vec![BookedReservation {
                    reservation: row,
                    user,
                    timeslot,
                }],
                sent_to,
                partner_sent_to: None,
                email_updated,
                whatsapp_updated,
                timeslot_updated: false,
                reservation_created: true,
            })
        }
    }

    async fn refresh_existing(
        db: &DatabaseConnection,
        user: user::Model,
        partner: Option<user::Model>,
        active: reservation::Model,
        request: ResendRequest,
        clock: &EventClock,
    ) -> Result<ResendOutcome, ServiceError> {
        match active.status.parse::<ReservationStatus>() {
            Ok(ReservationStatus::Used) => {
                let used_at = active
                    .checked_in_at
                    .map(|t| clock.format_local(t))
                    .unwrap_or_else(|| "fecha desconocida".into());
                return Err(ServiceError::BadRequest(format!(
                    "No se puede reenviar el QR. Esta reserva ya fue utilizada el {used_at}. Las reservas usadas no pueden ser modificadas."
                )));
            }
            Ok(ReservationStatus::Cancelled) => {
                return Err(ServiceError::BadRequest(
                    "No se puede reenviar el QR. Esta reserva fue cancelada previamente. Por favor, crea una nueva reserva.".into(),
                ));
            }
            _ => {}
        }

        let (user, email_updated, whatsapp_updated) = Self::apply_contact_update(
            db,
            user,
            request.new_email.as_deref(),
            request.new_whatsapp.as_deref(),
        )
        .await?;

        let partner = match partner {
            Some(partner) => Some(
                Self::apply_contact_update(
                    db,
                    partner,
                    request.new_partner_email.as_deref(),
                    request.new_partner_whatsapp.as_deref(),
                )
                .await?
                .0,
            ),
            None => None,
        };

        let mut reservation = active;
        let mut partner_reservation = match &partner {
            Some(partner) => UserService::latest_active_reservation(db, partner.id).await?,
            None => None,
        };

        let mut timeslot_updated = false;
        if let Some(new_timeslot_id) = request.new_timeslot_id {
            if new_timeslot_id != reservation.timeslot_id {
                TimeslotService::get_by_id(db, new_timeslot_id)
                    .await?
                    .ok_or_else(|| ServiceError::NotFound("El nuevo turno no existe".into()))?;

                // A slot move covers the whole group, so both rows flip in
                // the same transaction.
                let txn = db.begin().await?;
                let mut active_model: reservation::ActiveModel = reservation.into();
                active_model.timeslot_id = Set(new_timeslot_id);
                reservation = active_model.update(&txn).await?;

                if let Some(row) = partner_reservation.take() {
                    let mut active_model: reservation::ActiveModel = row.into();
                    active_model.timeslot_id = Set(new_timeslot_id);
                    partner_reservation = Some(active_model.update(&txn).await?);
                }
                txn.commit().await?;
                timeslot_updated = true;
            }
        }

        let timeslot = TimeslotService::get_by_id(db, reservation.timeslot_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Turno no encontrado".into()))?;

        let sent_to = ContactPoint {
            email: user.email.clone(),
            whatsapp: user.whatsapp.clone(),
        };
        let partner_sent_to = partner.as_ref().map(|p| ContactPoint {
            email: p.email.clone(),
            whatsapp: p.whatsapp.clone(),
        });

        let mut deliveries = vec![BookedReservation {
            reservation,
            user,
            timeslot,
        }];
        if let (Some(partner), Some(partner_row)) = (partner, partner_reservation) {
            let partner_slot = TimeslotService::get_by_id(db, partner_row.timeslot_id)
                .await?
                .ok_or_else(|| ServiceError::NotFound("Turno no encontrado".into()))?;
            deliveries.push(BookedReservation {
                reservation: partner_row,
                user: partner,
                timeslot: partner_slot,
            });
        }

        Ok(ResendOutcome {
            message: "QR reenviado exitosamente",
            deliveries,
            sent_to,
            partner_sent_to,
            email_updated,
            whatsapp_updated,
            timeslot_updated,
            reservation_created: false,
        })
    }

    /// Update email/whatsapp when a new value differs, enforcing cross-user
    /// email uniqueness. Returns the (possibly refreshed) row plus what
    /// changed.
    async fn apply_contact_update(
        db: &DatabaseConnection,
        user: user::Model,
        new_email: Option<&str>,
        new_whatsapp: Option<&str>,
    ) -> Result<(user::Model, bool, bool), ServiceError> {
        let mut email_updated = false;
        let mut whatsapp_updated = false;

        let current_email = user.email.clone();
        let current_whatsapp = user.whatsapp.clone();
        let user_id = user.id;
        let mut active: user::ActiveModel = user.clone().into();

        if let Some(new_email) = new_email {
            if new_email != current_email {
                if let Some(existing) = UserService::get_by_email(db, new_email).await? {
                    if existing.id != user_id {
                        return Err(ServiceError::Conflict(format!(
                            "No se puede actualizar el email. La dirección {new_email} ya está registrada por otra persona. Por favor, usa un email diferente."
                        )));
                    }
                }
                active.email = Set(new_email.to_string());
                email_updated = true;
            }
        }

        if let Some(new_whatsapp) = new_whatsapp {
            if new_whatsapp != current_whatsapp {
                active.whatsapp = Set(new_whatsapp.to_string());
                whatsapp_updated = true;
            }
        }

        if email_updated || whatsapp_updated {
            Ok((active.update(db).await?, email_updated, whatsapp_updated))
        } else {
            Ok((user, false, false))
        }
    }

    async fn insert_reservation<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        timeslot_id: Uuid,
        now: NaiveDateTime,
    ) -> Result<reservation::Model, DbErr> {
        reservation::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            timeslot_id: Set(timeslot_id),
            qr_code: Set(Uuid::new_v4().to_string()),
            status: Set(ReservationStatus::Active.as_str().to_string()),
            checked_in_at: Set(None),
            interest_rating: Set(None),
            rated_at: Set(None),
            created_at: Set(now),
        }
        .insert(conn)
        .await
    }
}
