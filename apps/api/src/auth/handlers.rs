use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::{current_user, login, logout, register, AuthResponse, LoginRequest, RegisterRequest};
use crate::errors::AppError;
use crate::models::user::PublicUser;
use crate::state::AppState;

/// POST /api/v1/auth/:session/register
pub async fn handle_register(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let response = register(&state, session_id, req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/:session/login
pub async fn handle_login(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(login(&state, session_id, req).await?))
}

/// POST /api/v1/auth/:session/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> StatusCode {
    logout(&state, session_id).await;
    StatusCode::NO_CONTENT
}

/// GET /api/v1/auth/:session/me
pub async fn handle_me(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<PublicUser>, AppError> {
    current_user(&state, session_id)
        .await
        .map(Json)
        .ok_or(AppError::Unauthorized)
}
