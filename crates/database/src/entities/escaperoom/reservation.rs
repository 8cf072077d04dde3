use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Links one user to one timeslot and carries the QR token. Status is
/// `ACTIVE` until check-in (`USED`) or cancellation (`CANCELLED`); both of
/// those are terminal.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub timeslot_id: Uuid,
    #[sea_orm(unique)]
    pub qr_code: String,
    pub status: String,
    pub checked_in_at: Option<DateTime>,
    pub interest_rating: Option<i16>,
    pub rated_at: Option<DateTime>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::time_slot::Entity",
        from = "Column::TimeslotId",
        to = "super::time_slot::Column::Id"
    )]
    TimeSlot,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::time_slot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimeSlot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
