//! Session repository
//!
//! Only a keyed digest of each session token is stored; the token itself
//! lives in the client's cookie or header.

use std::time::Duration;

use sqlx::{FromRow, PgPool};

use crate::db::DbError;

/// The user behind a live session
#[derive(Debug, Clone, FromRow)]
pub struct SessionUser {
    pub user_id: i32,
    pub username: String,
    pub email: String,
}

/// Session repository
pub struct SessionRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> SessionRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a session that expires after `ttl`.
    pub async fn create(&self, token_hash: &str, user_id: i32, ttl: Duration) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO user_session (token_hash, user_id, expires_at)
            VALUES ($1, $2, NOW() + ($3::bigint * INTERVAL '1 second'))
            "#,
        )
        .bind(token_hash)
        .bind(user_id)
        .bind(ttl.as_secs() as i64)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Resolve an unexpired session belonging to an active user.
    pub async fn lookup(&self, token_hash: &str) -> Result<Option<SessionUser>, DbError> {
        let user = sqlx::query_as::<_, SessionUser>(
            r#"
            SELECT u.id AS user_id, u.username, u.email
            FROM user_session s
            JOIN "user" u ON u.id = s.user_id
            WHERE s.token_hash = $1
              AND s.expires_at > NOW()
              AND u.active
            "#,
        )
        .bind(token_hash)
        .fetch_optional(self.pool)
        .await?;
        Ok(user)
    }

    /// Remove one session. Returns false if it didn't exist.
    pub async fn delete(&self, token_hash: &str) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM user_session WHERE token_hash = $1")
            .bind(token_hash)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove every session of a user, returning how many were dropped.
    pub async fn delete_for_user(&self, user_id: i32) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM user_session WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Drop expired sessions.
    pub async fn purge_expired(&self) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM user_session WHERE expires_at <= NOW()")
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
