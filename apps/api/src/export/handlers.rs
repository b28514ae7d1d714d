use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use chrono::Local;
use uuid::Uuid;

use super::preview::{render, render_markdown, PreviewDocument};
use super::{export_pdf, pdf::export_filename};
use crate::errors::AppError;
use crate::models::portfolio::AggregateRecord;
use crate::state::AppState;
use crate::storage::KEY_PORTFOLIO_DATA;

async fn load_record(state: &AppState, session_id: Uuid) -> AggregateRecord {
    state
        .session(session_id)
        .read_or_else(KEY_PORTFOLIO_DATA, AggregateRecord::default)
        .await
}

/// GET /api/v1/wizard/:session/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Json<PreviewDocument> {
    Json(render(&load_record(&state, session_id).await))
}

/// GET /api/v1/wizard/:session/preview/markdown
pub async fn handle_preview_markdown(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> impl IntoResponse {
    let record = load_record(&state, session_id).await;
    (
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        render_markdown(&render(&record)),
    )
}

/// GET /api/v1/wizard/:session/export
pub async fn handle_export(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let record = load_record(&state, session_id).await;
    let page_config = state.page_config.clone();
    let filename = export_filename(record.display_name(), Local::now().date_naive());

    let bytes = tokio::task::spawn_blocking(move || export_pdf(&record, &page_config))
        .await
        .map_err(anyhow::Error::from)??;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        Bytes::from(bytes),
    ))
}
