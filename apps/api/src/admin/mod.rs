//! Admin dashboard reads. The remote store is preferred; when it is absent or
//! failing, the shared local lists are served instead.

pub mod handlers;

use serde::Serialize;
use tracing::warn;

use crate::models::feedback::FeedbackRecord;
use crate::models::user::{PublicUser, UserRecord};
use crate::remote::RemoteError;
use crate::state::AppState;
use crate::storage::{KEY_FEEDBACK, KEY_USERS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Remote,
    Local,
}

#[derive(Debug, Serialize)]
pub struct Listing<T> {
    pub source: DataSource,
    pub items: Vec<T>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Overview {
    pub user_count: usize,
    pub feedback_count: usize,
    /// `None` when no feedback has been given.
    pub average_rating: Option<f64>,
    pub users_source: DataSource,
    pub feedback_source: DataSource,
}

/// Uses the remote result when it succeeds, the local list otherwise.
fn prefer_remote<T>(
    what: &str,
    remote: Option<Result<Vec<T>, RemoteError>>,
    local: impl FnOnce() -> Vec<T>,
) -> Listing<T> {
    match remote {
        Some(Ok(items)) => Listing {
            source: DataSource::Remote,
            items,
        },
        Some(Err(e)) => {
            warn!(record = what, error = %e, "Remote read failed, serving local list");
            Listing {
                source: DataSource::Local,
                items: local(),
            }
        }
        None => Listing {
            source: DataSource::Local,
            items: local(),
        },
    }
}

pub async fn list_users(state: &AppState) -> Listing<PublicUser> {
    let remote = match state.remote() {
        Some(remote) => Some(remote.list_profiles().await),
        None => None,
    };
    let local: Vec<UserRecord> = state.shared().read(KEY_USERS, Vec::new()).await;
    prefer_remote("user profiles", remote, || {
        local.iter().map(PublicUser::from).collect()
    })
}

pub async fn list_feedback(state: &AppState) -> Listing<FeedbackRecord> {
    let remote = match state.remote() {
        Some(remote) => Some(remote.list_feedback().await),
        None => None,
    };
    let local: Vec<FeedbackRecord> = state.shared().read(KEY_FEEDBACK, Vec::new()).await;
    prefer_remote("feedback", remote, || local)
}

pub fn average_rating(feedback: &[FeedbackRecord]) -> Option<f64> {
    if feedback.is_empty() {
        return None;
    }
    let total: u32 = feedback.iter().map(|f| u32::from(f.rating)).sum();
    Some(f64::from(total) / feedback.len() as f64)
}

pub async fn overview(state: &AppState) -> Overview {
    let users = list_users(state).await;
    let feedback = list_feedback(state).await;
    Overview {
        user_count: users.items.len(),
        feedback_count: feedback.items.len(),
        average_rating: average_rating(&feedback.items),
        users_source: users.source,
        feedback_source: feedback.source,
    }
}
