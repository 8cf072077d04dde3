use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::escaperoom::{answer, question, user};
use crate::error::ServiceError;

pub const QUESTION_COUNT: usize = 5;

pub struct AnswerSubmission {
    pub question_id: Uuid,
    pub answer_id: Uuid,
}

#[derive(Debug)]
pub struct TriviaResult {
    pub correct: bool,
    pub message: &'static str,
}

pub struct TriviaService;

impl TriviaService {
    /// The fixed quiz bank, ordered; the correct flag never leaves the
    /// service layer.
    pub async fn questions(
        db: &DatabaseConnection,
    ) -> Result<Vec<(question::Model, Vec<answer::Model>)>, DbErr> {
        let questions = question::Entity::find()
            .order_by_asc(question::Column::Position)
            .all(db)
            .await?;

        let question_ids: Vec<Uuid> = questions.iter().map(|q| q.id).collect();
        let answers = answer::Entity::find()
            .filter(answer::Column::QuestionId.is_in(question_ids))
            .all(db)
            .await?;

        Ok(questions
            .into_iter()
            .map(|q| {
                let own = answers
                    .iter()
                    .filter(|a| a.question_id == q.id)
                    .cloned()
                    .collect();
                (q, own)
            })
            .collect())
    }

    /// Grade a full attempt. No partial credit: one wrong pair fails the
    /// whole attempt. A fully correct attempt completes the trivia for the
    /// user and the linked partner in one transaction.
    pub async fn validate_answers(
        db: &DatabaseConnection,
        user_id: Uuid,
        answers: &[AnswerSubmission],
    ) -> Result<TriviaResult, ServiceError> {
        let user = user::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Usuario no encontrado".into()))?;

        if answers.len() != QUESTION_COUNT {
            return Err(ServiceError::BadRequest(
                "Debes responder las 5 preguntas".into(),
            ));
        }

        let mut all_correct = true;
        for submission in answers {
            let hit = answer::Entity::find_by_id(submission.answer_id)
                .filter(answer::Column::QuestionId.eq(submission.question_id))
                .filter(answer::Column::IsCorrect.eq(true))
                .one(db)
                .await?;
            if hit.is_none() {
                all_correct = false;
                break;
            }
        }

        if all_correct {
            let partner_id = user.partner_id;
            let txn = db.begin().await?;

            let mut active: user::ActiveModel = user.into();
            active.trivia_completed = Set(true);
            active.update(&txn).await?;

            if let Some(partner_id) = partner_id {
                if let Some(partner) = user::Entity::find_by_id(partner_id).one(&txn).await? {
                    let mut active: user::ActiveModel = partner.into();
                    active.trivia_completed = Set(true);
                    active.update(&txn).await?;
                }
            }
            txn.commit().await?;
            log::info!(
                "trivia completed for user {user_id}{}",
                partner_id
                    .map(|id| format!(" and partner {id}"))
                    .unwrap_or_default()
            );
        }

        Ok(TriviaResult {
            correct: all_correct,
            message: if all_correct {
                "Trivia completada correctamente. Ahora selecciona tu turno."
            } else {
                "Algunas respuestas son incorrectas"
            },
        })
    }
}
