//! Role repository
//!
//! - find_or_create: INSERT with ON CONFLICT (idempotent)
//! - list: LEFT JOIN with member count (no N+1)

use sqlx::{FromRow, PgPool, Row};

use crate::db::DbError;
use crate::models::RoleName;

/// Role record from database
#[derive(Debug, Clone, FromRow)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

/// Role with member count for list display
#[derive(Debug, Clone)]
pub struct RoleWithCount {
    pub name: String,
    pub description: Option<String>,
    pub member_count: i64,
}

/// Role repository
pub struct RoleRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> RoleRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a role, returning the existing one on conflict.
    ///
    /// A description given for an existing role replaces the stored one.
    pub async fn find_or_create(
        &self,
        name: &RoleName,
        description: Option<&str>,
    ) -> Result<Role, DbError> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO role (name, description) VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE
                SET description = COALESCE(EXCLUDED.description, role.description)
            RETURNING id, name, description
            "#,
        )
        .bind(name.as_str())
        .bind(description)
        .fetch_one(self.pool)
        .await?;
        Ok(role)
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Role, DbError> {
        sqlx::query_as::<_, Role>("SELECT id, name, description FROM role WHERE name = $1")
            .bind(name)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("role", name))
    }

    /// Grant a role. Returns false if the user already had it.
    pub async fn add_to_user(&self, user_id: i32, role_id: i32) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO roles_users (user_id, role_id) VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(role_id)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke a role. Returns false if the user didn't have it.
    pub async fn remove_from_user(&self, user_id: i32, role_id: i32) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM roles_users WHERE user_id = $1 AND role_id = $2")
            .bind(user_id)
            .bind(role_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All roles with member counts, by name.
    pub async fn list(&self) -> Result<Vec<RoleWithCount>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT
                r.name,
                r.description,
                COUNT(ru.user_id) AS member_count
            FROM role r
            LEFT JOIN roles_users ru ON ru.role_id = r.id
            GROUP BY r.id, r.name, r.description
            ORDER BY r.name
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| RoleWithCount {
                name: r.get("name"),
                description: r.get("description"),
                member_count: r.get("member_count"),
            })
            .collect())
    }
}
