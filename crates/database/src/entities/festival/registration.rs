use models::scan::ScanProgress;
use sea_orm::{FromJsonQueryResult, entity::prelude::*};
use serde::{Deserialize, Serialize};

/// Sports selection stored as a JSON array on the row.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct SportList(pub Vec<String>);

/// A festival participant. The row id doubles as the QR payload.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "registrations")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: String,
    pub cedula: Option<String>,
    pub edad: Option<i16>,
    pub sector: Option<String>,
    pub sports: SportList,
    pub status: String,
    pub check_in_time: Option<DateTime>,
    pub entrada_scanned: bool,
    pub entrada_time: Option<DateTime>,
    pub entrega_scanned: bool,
    pub entrega_time: Option<DateTime>,
    pub completo_scanned: bool,
    pub completo_time: Option<DateTime>,
    pub sorteo_scanned: bool,
    pub sorteo_time: Option<DateTime>,
    pub registration_date: DateTime,
    pub updated_at: DateTime,
}

impl Model {
    pub fn scan_progress(&self) -> ScanProgress {
        ScanProgress {
            entrada: self.entrada_scanned,
            entrega: self.entrega_scanned,
            completo: self.completo_scanned,
            sorteo: self.sorteo_scanned,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
