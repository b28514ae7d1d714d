use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::config::Config;
use crate::export::layout::PageConfig;
use crate::remote::RemoteStore;
use crate::storage::{session_scope, Persistence, StoreProvider, SHARED_SCOPE};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Key-value scopes: one per browser session plus the shared scope.
    pub stores: Arc<dyn StoreProvider>,
    /// Optional hosted backend. `None` keeps every write local.
    pub remote: Option<Arc<dyn RemoteStore>>,
    pub config: Config,
    /// Page geometry for PDF export.
    pub page_config: PageConfig,
    /// Held across read-modify-write of the shared lists.
    pub shared_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Storage scope of one browser session.
    pub fn session(&self, session_id: Uuid) -> Persistence {
        Persistence::new(self.stores.open(&session_scope(session_id)))
    }

    /// Storage scope holding the `users` and `feedback` lists.
    pub fn shared(&self) -> Persistence {
        Persistence::new(self.stores.open(SHARED_SCOPE))
    }

    /// Serializes updates to the `users` and `feedback` lists within this process.
    pub async fn lock_shared(&self) -> MutexGuard<'_, ()> {
        self.shared_lock.lock().await
    }

    pub fn remote(&self) -> Option<&dyn RemoteStore> {
        self.remote.as_deref()
    }
}

#[cfg(test)]
impl AppState {
    /// Memory-backed state with an optional fake remote.
    pub fn for_tests(remote: Option<Arc<dyn RemoteStore>>, admin_emails: &[&str]) -> Self {
        AppState {
            stores: Arc::new(crate::storage::MemoryStoreProvider::new()),
            remote,
            config: Config::for_tests(admin_emails),
            page_config: PageConfig::default(),
            shared_lock: Arc::new(Mutex::new(())),
        }
    }
}
