use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Manual open/close override for the registration window. The most recent
/// row wins; no rows means the automatic schedule applies.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "registration_controls")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub is_open: bool,
    pub reason: Option<String>,
    pub updated_by: Option<String>,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
