use std::collections::HashMap;

use chrono::NaiveDateTime;
use models::{
    cedula::validate_cedula,
    contact::{is_valid_email, is_valid_phone},
    sport::{Sport, validate_sports},
    status::ParticipantStatus,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::festival::registration::{self, SportList};
use crate::error::ServiceError;

pub struct NewRegistration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub cedula: Option<String>,
    pub edad: Option<i16>,
    pub sector: Option<String>,
    pub sports: Vec<String>,
}

pub struct ContactUpdate {
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Result of the idempotent ticket verification.
pub enum VerifyOutcome {
    /// First scan: the participant was just transitioned to CHECKED_IN.
    CheckedIn(registration::Model),
    /// Repeat scan: nothing was mutated, original check-in data returned.
    AlreadyUsed(registration::Model),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FestivalStats {
    pub total: u64,
    pub checked_in: u64,
    pub pending: u64,
    pub no_show: u64,
    pub sports_count: u64,
    pub sport_breakdown: HashMap<String, u64>,
    pub recent_scans: Vec<RecentScan>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentScan {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub check_in_time: Option<NaiveDateTime>,
    pub sports: Vec<String>,
}

pub struct RegistrationService;

impl RegistrationService {
    /// Validate and persist a new festival registration.
    ///
    /// All reads (uniqueness probes) happen before the single insert, so a
    /// rejected request leaves no trace.
    pub async fn create(
        db: &DatabaseConnection,
        data: NewRegistration,
        now: NaiveDateTime,
    ) -> Result<registration::Model, ServiceError> {
        if data.first_name.trim().is_empty()
            || data.last_name.trim().is_empty()
            || data.email.trim().is_empty()
            || data.phone.trim().is_empty()
        {
            return Err(ServiceError::BadRequest(
                "Todos los campos son requeridos".into(),
            ));
        }
        if !is_valid_email(&data.email) {
            return Err(ServiceError::BadRequest("Email inválido".into()));
        }
        if !is_valid_phone(&data.phone) {
            return Err(ServiceError::BadRequest(
                "El teléfono debe tener 10 dígitos y empezar con 09".into(),
            ));
        }
        validate_sports(&data.sports).map_err(|e| ServiceError::BadRequest(e.to_string()))?;

        if Self::get_by_email(db, &data.email).await?.is_some() {
            return Err(ServiceError::Conflict("Este email ya está registrado".into()));
        }

        if let Some(cedula) = &data.cedula {
            validate_cedula(cedula).map_err(|e| ServiceError::BadRequest(e.to_string()))?;
            if Self::get_by_cedula(db, cedula).await?.is_some() {
                return Err(ServiceError::Conflict(
                    "Esta cédula ya está registrada".into(),
                ));
            }
        }

        if let Some(edad) = data.edad {
            if !(5..=120).contains(&edad) {
                return Err(ServiceError::BadRequest(
                    "La edad debe estar entre 5 y 120 años".into(),
                ));
            }
        }

        if let Some(sector) = &data.sector {
            if sector.chars().count() > 100 {
                return Err(ServiceError::BadRequest(
                    "El sector no puede tener más de 100 caracteres".into(),
                ));
            }
        }

        let row = registration::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(data.first_name),
            last_name: Set(data.last_name),
            email: Set(data.email),
            phone: Set(data.phone),
            cedula: Set(data.cedula),
            edad: Set(data.edad),
            sector: Set(data.sector),
            sports: Set(SportList(data.sports)),
            status: Set(ParticipantStatus::Pending.as_str().to_string()),
            check_in_time: Set(None),
            entrada_scanned: Set(false),
            entrada_time: Set(None),
            entrega_scanned: Set(false),
            entrega_time: Set(None),
            completo_scanned: Set(false),
            completo_time: Set(None),
            sorteo_scanned: Set(false),
            sorteo_time: Set(None),
            registration_date: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;

        Ok(row)
    }

    pub async fn get_all(
        db: &DatabaseConnection,
        status: Option<String>,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Vec<registration::Model>, DbErr> {
        let mut query = registration::Entity::find()
            .order_by_desc(registration::Column::RegistrationDate);
        if let Some(status) = status {
            query = query.filter(registration::Column::Status.eq(status));
        }
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        if let Some(offset) = offset {
            query = query.offset(offset);
        }
        query.all(db).await
    }

    pub async fn get_by_id(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<Option<registration::Model>, DbErr> {
        registration::Entity::find_by_id(id).one(db).await
    }

    pub async fn get_by_email(
        db: &DatabaseConnection,
        email: &str,
    ) -> Result<Option<registration::Model>, DbErr> {
        registration::Entity::find()
            .filter(registration::Column::Email.eq(email))
            .one(db)
            .await
    }

    pub async fn get_by_cedula(
        db: &DatabaseConnection,
        cedula: &str,
    ) -> Result<Option<registration::Model>, DbErr> {
        registration::Entity::find()
            .filter(registration::Column::Cedula.eq(cedula))
            .one(db)
            .await
    }

    /// Admin correction of contact details; the caller re-sends the QR.
    pub async fn update_contact(
        db: &DatabaseConnection,
        id: Uuid,
        update: ContactUpdate,
        now: NaiveDateTime,
    ) -> Result<registration::Model, ServiceError> {
        if update.email.is_none() && update.phone.is_none() {
            return Err(ServiceError::BadRequest(
                "Debe proporcionar al menos email o phone para actualizar".into(),
            ));
        }
        if let Some(email) = &update.email {
            if !is_valid_email(email) {
                return Err(ServiceError::BadRequest("Email inválido".into()));
            }
        }
        if let Some(phone) = &update.phone {
            if !is_valid_phone(phone) {
                return Err(ServiceError::BadRequest(
                    "El teléfono debe tener 10 dígitos y empezar con 09".into(),
                ));
            }
        }

        let row = Self::get_by_id(db, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Registro no encontrado".into()))?;

        let mut active: registration::ActiveModel = row.into();
        if let Some(email) = update.email {
            active.email = Set(email);
        }
        if let Some(phone) = update.phone {
            active.phone = Set(phone);
        }
        active.updated_at = Set(now);
        Ok(active.update(db).await?)
    }

    /// Idempotent check-in by ticket id: a participant already CHECKED_IN is
    /// reported as `AlreadyUsed` without touching the stored timestamp.
    pub async fn verify(
        db: &DatabaseConnection,
        id: Uuid,
        now: NaiveDateTime,
    ) -> Result<VerifyOutcome, ServiceError> {
        let row = Self::get_by_id(db, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Ticket no encontrado".into()))?;

        if row.status == ParticipantStatus::CheckedIn.as_str() {
            return Ok(VerifyOutcome::AlreadyUsed(row));
        }

        let mut active: registration::ActiveModel = row.into();
        active.status = Set(ParticipantStatus::CheckedIn.as_str().to_string());
        active.check_in_time = Set(Some(now));
        active.updated_at = Set(now);
        Ok(VerifyOutcome::CheckedIn(active.update(db).await?))
    }

    pub async fn stats(db: &DatabaseConnection) -> Result<FestivalStats, DbErr> {
        let (total, checked_in, pending, no_show) = futures::try_join!(
            registration::Entity::find().count(db),
            Self::count_by_status(db, ParticipantStatus::CheckedIn),
            Self::count_by_status(db, ParticipantStatus::Pending),
            Self::count_by_status(db, ParticipantStatus::NoShow),
        )?;

        let all = registration::Entity::find().all(db).await?;
        let mut sport_counts: HashMap<String, u64> = HashMap::new();
        let mut sports_count = 0;
        for row in &all {
            for sport in &row.sports.0 {
                *sport_counts.entry(sport.clone()).or_insert(0) += 1;
                sports_count += 1;
            }
        }
        let sport_breakdown = Sport::ALL
            .into_iter()
            .map(|sport| {
                let name = sport.as_str().to_string();
                let count = sport_counts.get(&name).copied().unwrap_or(0);
                (name, count)
            })
            .collect();

        let recent_scans = registration::Entity::find()
            .filter(registration::Column::Status.eq(ParticipantStatus::CheckedIn.as_str()))
            .order_by_desc(registration::Column::CheckInTime)
            .limit(10)
            .all(db)
            .await?
            .into_iter()
            .map(|row| RecentScan {
                id: row.id,
                first_name: row.first_name,
                last_name: row.last_name,
                check_in_time: row.check_in_time,
                sports: row.sports.0,
            })
            .collect();

        Ok(FestivalStats {
            total,
            checked_in,
            pending,
            no_show,
            sports_count,
            sport_breakdown,
            recent_scans,
        })
    }

    async fn count_by_status(
        db: &DatabaseConnection,
        status: ParticipantStatus,
    ) -> Result<u64, DbErr> {
        registration::Entity::find()
            .filter(registration::Column::Status.eq(status.as_str()))
            .count(db)
            .await
    }
}
