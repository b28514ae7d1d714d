//! Optional hosted backend: a user-profile table (email-keyed, upsertable) and an
//! insert-only feedback table. Every caller treats it as best-effort; see `sync`.
//!
//! No reconciliation is attempted between local and remote copies; a profile removed
//! locally stays remote.

pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::feedback::FeedbackRecord;
use crate::models::user::PublicUser;

pub use postgres::PgRemoteStore;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Remote store unavailable: {0}")]
    Unavailable(String),
}

/// Carried in `AppState` as `Option<Arc<dyn RemoteStore>>`; `None` disables remote sync.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn upsert_profile(&self, profile: &PublicUser) -> Result<(), RemoteError>;
    async fn insert_feedback(&self, feedback: &FeedbackRecord) -> Result<(), RemoteError>;
    async fn list_profiles(&self) -> Result<Vec<PublicUser>, RemoteError>;
    async fn list_feedback(&self) -> Result<Vec<FeedbackRecord>, RemoteError>;
}

#[cfg(test)]
pub mod fake {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// In-memory remote that counts calls and can be switched to fail.
    #[derive(Default)]
    pub struct FakeRemote {
        pub failing: AtomicBool,
        pub calls: AtomicUsize,
        pub profiles: Mutex<Vec<PublicUser>>,
        pub feedback: Mutex<Vec<FeedbackRecord>>,
    }

    impl FakeRemote {
        pub fn failing() -> Self {
            let remote = Self::default();
            remote.failing.store(true, Ordering::SeqCst);
            remote
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn enter(&self) -> Result<(), RemoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                Err(RemoteError::Unavailable("fake remote is down".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl RemoteStore for FakeRemote {
        async fn upsert_profile(&self, profile: &PublicUser) -> Result<(), RemoteError> {
            self.enter()?;
            let mut profiles = self.profiles.lock().unwrap();
            profiles.retain(|p| !p.email.eq_ignore_ascii_case(&profile.email));
            profiles.push(profile.clone());
            Ok(())
        }

        async fn insert_feedback(&self, feedback: &FeedbackRecord) -> Result<(), RemoteError> {
            self.enter()?;
            self.feedback.lock().unwrap().push(feedback.clone());
            Ok(())
        }

        async fn list_profiles(&self) -> Result<Vec<PublicUser>, RemoteError> {
            self.enter()?;
            Ok(self.profiles.lock().unwrap().clone())
        }

        async fn list_feedback(&self) -> Result<Vec<FeedbackRecord>, RemoteError> {
            self.enter()?;
            Ok(self.feedback.lock().unwrap().clone())
        }
    }
}
