//! Durable key-value storage, the server-side stand-in for a browser's local storage.
//!
//! A *scope* is one browser session's storage (or the shared scope holding the
//! application-wide `users` and `feedback` lists). Keys inside a scope are plain strings,
//! values are JSON text.

pub mod memory;
pub mod redis_store;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

pub use memory::MemoryStoreProvider;
pub use redis_store::RedisStoreProvider;

// ────────────────────────────────────────────────────────────────────────────
// Storage keys
// ────────────────────────────────────────────────────────────────────────────

pub const KEY_CURRENT_STEP: &str = "portfolio_current_step";
pub const KEY_FURTHEST_STEP: &str = "portfolio_furthest_step";
pub const KEY_PORTFOLIO_DATA: &str = "portfolio_data";
pub const KEY_CLASSIFIER: &str = "portfolio_classifier";
pub const KEY_USERS: &str = "users";
pub const KEY_USER: &str = "user";
pub const KEY_FEEDBACK: &str = "feedback";

/// Scope name for application-wide lists.
pub const SHARED_SCOPE: &str = "shared";

/// Scope name for a single browser session.
pub fn session_scope(session_id: Uuid) -> String {
    format!("session:{session_id}")
}

// ────────────────────────────────────────────────────────────────────────────
// Backend traits
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage quota exceeded ({used} of {quota} bytes)")]
    QuotaExceeded { used: usize, quota: usize },

    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Raw string storage for one scope. Implementations must be cheap to share.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Hands out the store for a named scope. Carried in `AppState` as `Arc<dyn StoreProvider>`.
pub trait StoreProvider: Send + Sync {
    fn open(&self, scope: &str) -> Arc<dyn KvStore>;
}

// ────────────────────────────────────────────────────────────────────────────
// Persistence adapter
// ────────────────────────────────────────────────────────────────────────────

/// Typed JSON get/set over a `KvStore`.
///
/// Reads never fail: a missing key, a backend error, or a value that no longer parses all
/// yield the caller's fallback. Writes log and swallow failures so the caller's in-memory
/// value stays authoritative for the rest of the session.
#[derive(Clone)]
pub struct Persistence {
    store: Arc<dyn KvStore>,
}

impl Persistence {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub async fn read<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        self.read_or_else(key, || fallback).await
    }

    pub async fn read_or_else<T, F>(&self, key: &str, fallback: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return fallback(),
            Err(e) => {
                warn!(key, error = %e, "Storage read failed, using fallback");
                return fallback();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Stored value failed to parse, using fallback");
                fallback()
            }
        }
    }

    /// Serializes and stores `value`. Returns `false` when the write did not land.
    pub async fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "Failed to serialize value for storage");
                return false;
            }
        };

        match self.store.set(key, raw).await {
            Ok(()) => {
                debug!(key, "Stored value");
                true
            }
            Err(e) => {
                warn!(key, error = %e, "Storage write failed; keeping in-memory state");
                false
            }
        }
    }

    pub async fn remove(&self, key: &str) -> bool {
        match self.store.remove(key).await {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "Storage remove failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        tags: Vec<String>,
        score: Option<u32>,
    }

    fn sample() -> Sample {
        Sample {
            name: "Asha".to_string(),
            tags: vec!["rust".to_string(), "sql".to_string()],
            score: Some(7),
        }
    }

    #[tokio::test]
    async fn test_write_then_read_returns_equal_value() {
        let persistence = Persistence::new(Arc::new(MemoryStore::new()));
        assert!(persistence.write("sample", &sample()).await);
        let back: Option<Sample> = persistence.read("sample", None).await;
        assert_eq!(back, Some(sample()));
    }

    #[tokio::test]
    async fn test_read_missing_key_returns_fallback() {
        let persistence = Persistence::new(Arc::new(MemoryStore::new()));
        let value: Vec<String> = persistence.read("missing", vec!["x".to_string()]).await;
        assert_eq!(value, vec!["x".to_string()]);
    }

    #[tokio::test]
    async fn test_read_corrupt_value_returns_fallback() {
        let store = Arc::new(MemoryStore::new());
        store.set("broken", "{not json".to_string()).await.unwrap();
        let persistence = Persistence::new(store);
        let value: u32 = persistence.read("broken", 42).await;
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_write_failure_is_swallowed() {
        let persistence = Persistence::new(Arc::new(MemoryStore::with_quota(8)));
        assert!(!persistence.write("sample", &sample()).await);
        // Nothing landed, so the read falls back.
        let value: Option<Sample> = persistence.read("sample", None).await;
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_remove_clears_key() {
        let persistence = Persistence::new(Arc::new(MemoryStore::new()));
        persistence.write("step", "education").await;
        assert!(persistence.remove("step").await);
        let step: String = persistence.read("step", "personal".to_string()).await;
        assert_eq!(step, "personal");
    }

    #[test]
    fn test_session_scope_format() {
        let id = Uuid::nil();
        assert_eq!(
            session_scope(id),
            "session:00000000-0000-0000-0000-000000000000"
        );
    }
}
