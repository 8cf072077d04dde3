use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use database::services::escaperoom::trivia::{AnswerSubmission, TriviaService};
use serde_json::{Value, json};

use crate::dtos::common::ok;
use crate::dtos::escaperoom::ValidateTriviaRequest;
use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trivia/questions", get(questions))
        .route("/trivia/validate", post(validate))
}

/// The ordered quiz bank; the correct flag never reaches the client.
#[utoipa::path(
    get,
    path = "/escaperoom/trivia/questions",
    responses(
        (status = 200, description = "Questions with their answer options"),
        (status = 403, description = "Registration window closed")
    ),
    tag = "EscapeRoom"
)]
pub async fn questions(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let questions = TriviaService::questions(&state.escaperoom).await?;
    let payload: Vec<Value> = questions
        .into_iter()
        .map(|(question, answers)| {
            json!({
                "id": question.id,
                "text": question.text,
                "position": question.position,
                "answers": answers
                    .into_iter()
                    .map(|a| json!({"id": a.id, "text": a.text}))
                    .collect::<Vec<Value>>(),
            })
        })
        .collect();
    Ok(ok(payload))
}

/// Grade a full five-answer attempt; success unlocks booking for the whole
/// group.
#[utoipa::path(
    post,
    path = "/escaperoom/trivia/validate",
    request_body = ValidateTriviaRequest,
    responses(
        (status = 200, description = "Attempt graded"),
        (status = 400, description = "Wrong answer count"),
        (status = 403, description = "Registration window closed"),
        (status = 404, description = "User not found")
    ),
    tag = "EscapeRoom"
)]
pub async fn validate(
    State(state): State<AppState>,
    Json(body): Json<ValidateTriviaRequest>,
) -> Result<Json<Value>, ApiError> {
    let answers: Vec<AnswerSubmission> = body
        .answers
        .into_iter()
        .map(|a| AnswerSubmission {
            question_id: a.question_id,
            answer_id: a.answer_id,
        })
        .collect();

    let result = TriviaService::validate_answers(&state.escaperoom, body.user_id, &answers).await?;
    Ok(ok(json!({
        "correct": result.correct,
        "message": result.message,
    })))
}
