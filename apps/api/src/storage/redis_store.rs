use std::sync::Arc;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client as RedisClient};
use tracing::info;

use super::{KvStore, StorageError, StoreProvider};

/// One Redis hash per scope: `HGET {namespace}:{scope} {key}`.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    hash: String,
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.hget(&self.hash, key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut conn = self.conn.clone();
        conn.hset::<_, _, _, ()>(&self.hash, key, value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut conn = self.conn.clone();
        conn.hdel::<_, _, ()>(&self.hash, key).await?;
        Ok(())
    }
}

/// Shares one reconnecting connection across every scope.
pub struct RedisStoreProvider {
    conn: ConnectionManager,
    namespace: String,
}

impl RedisStoreProvider {
    pub async fn connect(redis_url: &str, namespace: &str) -> Result<Self, StorageError> {
        let client = RedisClient::open(redis_url)?;
        let conn = client.get_connection_manager_with_backoff(2, 100, 1).await?;
        info!(namespace, "Redis store connected");
        Ok(Self {
            conn,
            namespace: namespace.to_string(),
        })
    }
}

fn hash_name(namespace: &str, scope: &str) -> String {
    format!("{namespace}:{scope}")
}

impl StoreProvider for RedisStoreProvider {
    fn open(&self, scope: &str) -> Arc<dyn KvStore> {
        Arc::new(RedisStore {
            conn: self.conn.clone(),
            hash: hash_name(&self.namespace, scope),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_name_joins_namespace_and_scope() {
        assert_eq!(hash_name("portfolio", "shared"), "portfolio:shared");
        assert_eq!(
            hash_name("portfolio", "session:1f0c"),
            "portfolio:session:1f0c"
        );
    }

    #[tokio::test]
    async fn test_connect_reports_unreachable_server() {
        // Port 1 is never a Redis server.
        let result = RedisStoreProvider::connect("redis://127.0.0.1:1/", "portfolio").await;
        assert!(matches!(result, Err(StorageError::Redis(_))));
    }
}
