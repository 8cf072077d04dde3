use chrono::NaiveDateTime;
use models::{
    scan::{ScanCode, ScanMode, ScanProgress},
    status::ParticipantStatus,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::festival::registration;
use crate::error::ServiceError;

/// A committed checkpoint stamp.
#[derive(Debug)]
pub struct ScanRecord {
    pub participant: registration::Model,
    pub mode: ScanMode,
    pub timestamp: NaiveDateTime,
}

/// Read-only pre-flight answer for scanner UIs.
#[derive(Debug)]
pub struct ScanPreview {
    pub participant: registration::Model,
    pub progress: ScanProgress,
    pub can_scan: bool,
    pub message: String,
    pub eligible_for_sorteo: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    pub entrada: u64,
    pub entrega: u64,
    pub completo: u64,
    pub sorteo: u64,
    pub total_scans: u64,
    pub total_registrations: u64,
}

pub struct HistoryEntry {
    pub participant: registration::Model,
    pub mode: ScanMode,
    pub timestamp: Option<NaiveDateTime>,
}

pub struct ScanService;

impl ScanService {
    /// The QR payload is the participant's own id.
    async fn load(db: &DatabaseConnection, qr_code: &str) -> Result<registration::Model, ServiceError> {
        let invalid = || ServiceError::Scan {
            code: ScanCode::InvalidQr,
            message: "Código QR no válido o no existe".into(),
        };
        let id = Uuid::parse_str(qr_code).map_err(|_| invalid())?;
        registration::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(invalid)
    }

    /// Pre-flight a scan without mutating anything.
    pub async fn validate(
        db: &DatabaseConnection,
        qr_code: &str,
        mode: ScanMode,
    ) -> Result<ScanPreview, ServiceError> {
        let participant = Self::load(db, qr_code).await?;
        let progress = participant.scan_progress();
        let (can_scan, message) = match progress.gate(mode) {
            Ok(()) => (true, ScanProgress::can_scan_message(mode).to_string()),
            Err(denial) => (false, denial.message),
        };
        Ok(ScanPreview {
            eligible_for_sorteo: progress.eligible_for_sorteo(),
            participant,
            progress,
            can_scan,
            message,
        })
    }

    /// Stamp `entrada`, flipping the coarse status to CHECKED_IN.
    pub async fn scan_entrada(
        db: &DatabaseConnection,
        qr_code: &str,
        scanned_at: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> Result<ScanRecord, ServiceError> {
        let participant = Self::load(db, qr_code).await?;
        participant.scan_progress().gate(ScanMode::Entrada)?;

        let timestamp = scanned_at.unwrap_or(now);
        let mut active: registration::ActiveModel = participant.into();
        active.entrada_scanned = Set(true);
        active.entrada_time = Set(Some(timestamp));
        active.status = Set(ParticipantStatus::CheckedIn.as_str().to_string());
        active.check_in_time = Set(Some(timestamp));
        active.updated_at = Set(now);

        Ok(ScanRecord {
            participant: active.update(db).await?,
            mode: ScanMode::Entrada,
            timestamp,
        })
    }

    /// Strict `entrega`: the participant must have registered entrada first.
    pub async fn scan_entrega(
        db: &DatabaseConnection,
        qr_code: &str,
        scanned_at: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> Result<ScanRecord, ServiceError> {
        let participant = Self::load(db, qr_code).await?;
        participant.scan_progress().gate(ScanMode::Entrega)?;

        let timestamp = scanned_at.unwrap_or(now);
        let mut active: registration::ActiveModel = participant.into();
        active.entrega_scanned = Set(true);
        active.entrega_time = Set(Some(timestamp));
        active.updated_at = Set(now);

        Ok(ScanRecord {
            participant: active.update(db).await?,
            mode: ScanMode::Entrega,
            timestamp,
        })
    }

    /// Combined-scanner `entrega`: stamps entrada (and CHECKED_IN) as a side
    /// effect when the participant skipped the entrance scanner.
    pub async fn scan_entrega_combined(
        db: &DatabaseConnection,
        qr_code: &str,
        scanned_at: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> Result<ScanRecord, ServiceError> {
        let participant = Self::load(db, qr_code).await?;
        participant.scan_progress().gate_entrega_combined()?;

        let timestamp = scanned_at.unwrap_or(now);
        let entrada_time = participant.entrada_time;
        let check_in_time = participant.check_in_time;

        let mut active: registration::ActiveModel = participant.into();
        active.entrada_scanned = Set(true);
        active.entrada_time = Set(Some(entrada_time.unwrap_or(timestamp)));
        active.status = Set(ParticipantStatus::CheckedIn.as_str().to_string());
        active.check_in_time = Set(Some(check_in_time.unwrap_or(timestamp)));
        active.entrega_scanned = Set(true);
        active.entrega_time = Set(Some(timestamp));
        active.updated_at = Set(now);

        Ok(ScanRecord {
            participant: active.update(db).await?,
            mode: ScanMode::Entrega,
            timestamp,
        })
    }

    pub async fn scan_completo(
        db: &DatabaseConnection,
        qr_code: &str,
        scanned_at: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> Result<ScanRecord, ServiceError> {
        let participant = Self::load(db, qr_code).await?;
        participant.scan_progress().gate(ScanMode::Completo)?;

        let timestamp = scanned_at.unwrap_or(now);
        let mut active: registration::ActiveModel = participant.into();
        active.completo_scanned = Set(true);
        active.completo_time = Set(Some(timestamp));
        active.updated_at = Set(now);

        Ok(ScanRecord {
            participant: active.update(db).await?,
            mode: ScanMode::Completo,
            timestamp,
        })
    }

    /// The raffle checkpoint is the only one gated on two prerequisites.
    pub async fn scan_sorteo(
        db: &DatabaseConnection,
        qr_code: &str,
        scanned_at: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> Result<ScanRecord, ServiceError> {
        let participant = Self::load(db, qr_code).await?;
        participant.scan_progress().gate(ScanMode::Sorteo)?;

        let timestamp = scanned_at.unwrap_or(now);
        let mut active: registration::ActiveModel = participant.into();
        active.sorteo_scanned = Set(true);
        active.sorteo_time = Set(Some(timestamp));
        active.updated_at = Set(now);

        Ok(ScanRecord {
            participant: active.update(db).await?,
            mode: ScanMode::Sorteo,
            timestamp,
        })
    }

    pub async fn history(
        db: &DatabaseConnection,
        mode: Option<ScanMode>,
        limit: u64,
    ) -> Result<Vec<HistoryEntry>, DbErr> {
        let mut query = registration::Entity::find()
            .order_by_desc(registration::Column::UpdatedAt)
            .limit(limit);
        if let Some(mode) = mode {
            query = match mode {
                ScanMode::Entrada => query.filter(registration::Column::EntradaScanned.eq(true)),
                ScanMode::Entrega => query.filter(registration::Column::EntregaScanned.eq(true)),
                ScanMode::Completo => query.filter(registration::Column::CompletoScanned.eq(true)),
                ScanMode::Sorteo => query.filter(registration::Column::SorteoScanned.eq(true)),
            };
        }

        let rows = query.all(db).await?;
        let mode = mode.unwrap_or(ScanMode::Entrada);
        Ok(rows
            .into_iter()
            .map(|row| {
                let timestamp = match mode {
                    ScanMode::Entrada => row.entrada_time,
                    ScanMode::Entrega => row.entrega_time,
                    ScanMode::Completo => row.completo_time,
                    ScanMode::Sorteo => row.sorteo_time,
                }
                .or(Some(row.updated_at));
                HistoryEntry {
                    participant: row,
                    mode,
                    timestamp,
                }
            })
            .collect())
    }

    pub async fn stats(db: &DatabaseConnection) -> Result<ScanStats, DbErr> {
        let (entrada, entrega, completo, sorteo, total_registrations) = futures::try_join!(
            Self::count_scanned(db, registration::Column::EntradaScanned),
            Self::count_scanned(db, registration::Column::EntregaScanned),
            Self::count_scanned(db, registration::Column::CompletoScanned),
            Self::count_scanned(db, registration::Column::SorteoScanned),
            registration::Entity::find().count(db),
        )?;

        Ok(ScanStats {
            entrada,
            entrega,
            completo,
            sorteo,
            total_scans: entrada + entrega + completo + sorteo,
            total_registrations,
        })
    }

    async fn count_scanned(
        db: &DatabaseConnection,
        column: registration::Column,
    ) -> Result<u64, DbErr> {
        registration::Entity::find()
            .filter(column.eq(true))
            .count(db)
            .await
    }
}
