use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::{submit_feedback, FeedbackReceipt};
use crate::errors::AppError;
use crate::models::feedback::FeedbackDraft;
use crate::state::AppState;

/// POST /api/v1/feedback/:session
pub async fn handle_submit_feedback(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(draft): Json<FeedbackDraft>,
) -> Result<(StatusCode, Json<FeedbackReceipt>), AppError> {
    let receipt = submit_feedback(&state, session_id, draft).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}
