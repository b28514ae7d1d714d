use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use super::{list_feedback, list_users, overview, Listing, Overview};
use crate::auth::require_admin;
use crate::errors::AppError;
use crate::models::feedback::FeedbackRecord;
use crate::models::user::PublicUser;
use crate::state::AppState;

/// GET /api/v1/admin/:session/users
pub async fn handle_list_users(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Listing<PublicUser>>, AppError> {
    require_admin(&state, session_id).await?;
    Ok(Json(list_users(&state).await))
}

/// GET /api/v1/admin/:session/feedback
pub async fn handle_list_feedback(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Listing<FeedbackRecord>>, AppError> {
    require_admin(&state, session_id).await?;
    Ok(Json(list_feedback(&state).await))
}

/// GET /api/v1/admin/:session/overview
pub async fn handle_overview(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Overview>, AppError> {
    require_admin(&state, session_id).await?;
    Ok(Json(overview(&state).await))
}
