use chrono::NaiveDateTime;
use models::contact::{is_valid_email, is_valid_phone};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use models::status::ReservationStatus;
use uuid::Uuid;

use crate::entities::escaperoom::{reservation, user};
use crate::error::ServiceError;

pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub whatsapp: String,
}

/// Search result: the user plus partner summary and latest active booking.
pub struct UserProfile {
    pub user: user::Model,
    pub partner: Option<user::Model>,
    pub reservation: Option<reservation::Model>,
}

pub struct UserService;

impl UserService {
    fn validate(user: &NewUser) -> Result<(), ServiceError> {
        if user.first_name.chars().count() < 2 {
            return Err(ServiceError::BadRequest(
                "Nombre debe tener al menos 2 caracteres".into(),
            ));
        }
        if user.last_name.chars().count() < 2 {
            return Err(ServiceError::BadRequest(
                "Apellido debe tener al menos 2 caracteres".into(),
            ));
        }
        if !is_valid_email(&user.email) {
            return Err(ServiceError::BadRequest("Email inválido".into()));
        }
        if !is_valid_phone(&user.whatsapp) {
            return Err(ServiceError::BadRequest(
                "WhatsApp debe tener formato 09XXXXXXXX".into(),
            ));
        }
        Ok(())
    }

    /// Register the mandatory two-person group.
    ///
    /// Both rows and the mutual partner links are written in one
    /// transaction, so the symmetric-partner invariant can never be observed
    /// half-applied.
    pub async fn create_pair(
        db: &DatabaseConnection,
        users: [NewUser; 2],
        now: NaiveDateTime,
    ) -> Result<(user::Model, user::Model), ServiceError> {
        for user in &users {
            Self::validate(user)?;
        }
        if users[0].email == users[1].email {
            return Err(ServiceError::BadRequest(
                "Los emails deben ser diferentes".into(),
            ));
        }

        let existing = user::Entity::find()
            .filter(
                user::Column::Email.is_in([users[0].email.clone(), users[1].email.clone()]),
            )
            .all(db)
            .await?;
        if !existing.is_empty() {
            let with_partner: Vec<&user::Model> =
                existing.iter().filter(|u| u.partner_id.is_some()).collect();
            if !with_partner.is_empty() {
                let emails = with_partner
                    .iter()
                    .map(|u| u.email.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(ServiceError::Conflict(format!(
                    "Las siguientes personas ya participaron en un grupo: {emails}"
                )));
            }
            let emails = existing
                .iter()
                .map(|u| u.email.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ServiceError::Conflict(format!(
                "Los siguientes emails ya están registrados: {emails}"
            )));
        }

        let [first, second] = users;
        let txn = db.begin().await?;

        let user1 = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(first.first_name),
            last_name: Set(first.last_name),
            email: Set(first.email),
            whatsapp: Set(first.whatsapp),
            trivia_completed: Set(false),
            partner_id: Set(None),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let user2 = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(second.first_name),
            last_name: Set(second.last_name),
            email: Set(second.email),
            whatsapp: Set(second.whatsapp),
            trivia_completed: Set(false),
            partner_id: Set(Some(user1.id)),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let mut back_link: user::ActiveModel = user1.into();
        back_link.partner_id = Set(Some(user2.id));
        let user1 = back_link.update(&txn).await?;

        txn.commit().await?;
        log::info!("registered escape-room pair {} / {}", user1.id, user2.id);
        Ok((user1, user2))
    }

    pub async fn get_by_id(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find_by_id(id).one(db).await
    }

    pub async fn get_by_email(
        db: &DatabaseConnection,
        email: &str,
    ) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(db)
            .await
    }

    pub async fn get_partner(
        db: &DatabaseConnection,
        user: &user::Model,
    ) -> Result<Option<user::Model>, DbErr> {
        match user.partner_id {
            Some(partner_id) => Self::get_by_id(db, partner_id).await,
            None => Ok(None),
        }
    }

    /// Most recent non-cancelled reservation, if any.
    pub async fn latest_active_reservation(
        db: &DatabaseConnection,
        user_id: Uuid,
    ) -> Result<Option<reservation::Model>, DbErr> {
        reservation::Entity::find()
            .filter(reservation::Column::UserId.eq(user_id))
            .filter(reservation::Column::Status.ne(ReservationStatus::Cancelled.as_str()))
            .order_by_desc(reservation::Column::CreatedAt)
            .limit(1)
            .one(db)
            .await
    }

    pub async fn search(
        db: &DatabaseConnection,
        email: &str,
    ) -> Result<UserProfile, ServiceError> {
        let user = Self::get_by_email(db, email)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Usuario no encontrado".into()))?;
        let partner = Self::get_partner(db, &user).await?;
        let reservation = Self::latest_active_reservation(db, user.id).await?;
        Ok(UserProfile {
            user,
            partner,
            reservation,
        })
    }
}
