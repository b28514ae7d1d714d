use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::remote::PgRemoteStore;

/// Connects to PostgreSQL and prepares the remote profile and feedback tables.
pub async fn connect_remote(database_url: &str) -> Result<PgRemoteStore> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");

    let store = PgRemoteStore::new(pool);
    store.ensure_schema().await?;
    Ok(store)
}
