use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A fixed-capacity bookable window on one event date. Times are stored as
/// zero-padded `HH:MM` labels, matching what the generator emits.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "time_slots")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub date: Date,
    pub start_time: String,
    pub end_time: String,
    pub capacity: i32,
}

impl Model {
    pub fn label(&self) -> String {
        format!("{} - {}", self.start_time, self.end_time)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::reservation::Entity")]
    Reservations,
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
