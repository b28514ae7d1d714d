use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use super::{RemoteError, RemoteStore};
use crate::models::feedback::FeedbackRecord;
use crate::models::user::PublicUser;

#[derive(Debug, FromRow)]
struct ProfileRow {
    email: String,
    name: String,
    user_type: String,
    is_admin: bool,
    created_at: DateTime<Utc>,
}

impl From<ProfileRow> for PublicUser {
    fn from(row: ProfileRow) -> Self {
        PublicUser {
            name: row.name,
            email: row.email,
            user_type: row.user_type,
            is_admin: row.is_admin,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct FeedbackRow {
    id: Uuid,
    rating: i16,
    suggestion: String,
    submitted_by: String,
    created_at: DateTime<Utc>,
}

impl From<FeedbackRow> for FeedbackRecord {
    fn from(row: FeedbackRow) -> Self {
        FeedbackRecord {
            id: row.id,
            rating: row.rating.clamp(0, u8::MAX as i16) as u8,
            suggestion: row.suggestion,
            submitted_by: row.submitted_by,
            created_at: row.created_at,
        }
    }
}

/// Postgres-backed remote store.
#[derive(Clone)]
pub struct PgRemoteStore {
    pool: PgPool,
}

impl PgRemoteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates both tables if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), RemoteError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_profiles (
                email       TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                user_type   TEXT NOT NULL,
                is_admin    BOOLEAN NOT NULL DEFAULT FALSE,
                created_at  TIMESTAMPTZ NOT NULL,
                updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS feedback (
                id            UUID PRIMARY KEY,
                rating        SMALLINT NOT NULL CHECK (rating BETWEEN 1 AND 5),
                suggestion    TEXT NOT NULL DEFAULT '',
                submitted_by  TEXT NOT NULL,
                created_at    TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Remote tables ready (user_profiles, feedback)");
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for PgRemoteStore {
    async fn upsert_profile(&self, profile: &PublicUser) -> Result<(), RemoteError> {
        sqlx::query(
            r#"
            INSERT INTO user_profiles (email, name, user_type, is_admin, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO UPDATE
            SET name = EXCLUDED.name,
                user_type = EXCLUDED.user_type,
                is_admin = EXCLUDED.is_admin,
                updated_at = now()
            "#,
        )
        .bind(profile.email.to_lowercase())
        .bind(&profile.name)
        .bind(&profile.user_type)
        .bind(profile.is_admin)
        .bind(profile.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_feedback(&self, feedback: &FeedbackRecord) -> Result<(), RemoteError> {
        sqlx::query(
            r#"
            INSERT INTO feedback (id, rating, suggestion, submitted_by, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(feedback.id)
        .bind(feedback.rating as i16)
        .bind(&feedback.suggestion)
        .bind(&feedback.submitted_by)
        .bind(feedback.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_profiles(&self) -> Result<Vec<PublicUser>, RemoteError> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            "SELECT email, name, user_type, is_admin, created_at FROM user_profiles ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(PublicUser::from).collect())
    }

    async fn list_feedback(&self) -> Result<Vec<FeedbackRecord>, RemoteError> {
        let rows = sqlx::query_as::<_, FeedbackRow>(
            "SELECT id, rating, suggestion, submitted_by, created_at FROM feedback ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(FeedbackRecord::from).collect())
    }
}
