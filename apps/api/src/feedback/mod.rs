//! Feedback submission: the remote table is the primary target, the shared local
//! `feedback` list the fallback.

pub mod handlers;

use serde::Serialize;
use uuid::Uuid;

use crate::auth::current_user;
use crate::errors::AppError;
use crate::forms::{FeedbackForm, SectionForm};
use crate::models::feedback::{FeedbackDraft, FeedbackRecord};
use crate::state::AppState;
use crate::storage::KEY_FEEDBACK;
use crate::sync::{write_through, SyncOutcome};

pub const ANONYMOUS: &str = "anonymous";

#[derive(Debug, Serialize)]
pub struct FeedbackReceipt {
    pub feedback: FeedbackRecord,
    pub stored: SyncOutcome,
}

/// Stores an already validated draft. Never fails: remote errors fall back to the local list.
pub async fn record_feedback(
    state: &AppState,
    draft: &FeedbackDraft,
    submitted_by: &str,
) -> FeedbackReceipt {
    let feedback = FeedbackRecord::from_draft(draft, submitted_by);
    let stored = write_through(
        "feedback",
        state.remote().map(|remote| remote.insert_feedback(&feedback)),
        async {
            let _guard = state.lock_shared().await;
            let shared = state.shared();
            let mut list: Vec<FeedbackRecord> = shared.read(KEY_FEEDBACK, Vec::new()).await;
            list.push(feedback.clone());
            shared.write(KEY_FEEDBACK, &list).await;
        },
    )
    .await;
    FeedbackReceipt { feedback, stored }
}

/// Email of the session user, or `anonymous`.
pub async fn submitter(state: &AppState, session_id: Uuid) -> String {
    current_user(state, session_id)
        .await
        .map(|u| u.email)
        .unwrap_or_else(|| ANONYMOUS.to_string())
}

/// Validates the draft and stores it. An invalid draft never reaches any store.
pub async fn submit_feedback(
    state: &AppState,
    session_id: Uuid,
    draft: FeedbackDraft,
) -> Result<FeedbackReceipt, AppError> {
    let report = FeedbackForm { draft: draft.clone() }.validate();
    if !report.passed {
        return Err(AppError::InvalidSection(report));
    }
    let by = submitter(state, session_id).await;
    Ok(record_feedback(state, &draft, &by).await)
}
