use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Feedback as submitted from the wizard's last step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackDraft {
    /// 1–5; 0 means "not rated yet".
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub suggestion: String,
}

/// A stored feedback entry (remote `feedback` table or the local `feedback` list).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: Uuid,
    pub rating: u8,
    pub suggestion: String,
    /// Submitter email, or `anonymous`.
    pub submitted_by: String,
    pub created_at: DateTime<Utc>,
}

impl FeedbackRecord {
    pub fn from_draft(draft: &FeedbackDraft, submitted_by: &str) -> Self {
        FeedbackRecord {
            id: Uuid::new_v4(),
            rating: draft.rating,
            suggestion: draft.suggestion.trim().to_string(),
            submitted_by: submitted_by.to_string(),
            created_at: Utc::now(),
        }
    }
}
