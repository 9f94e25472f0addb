//! User repository
//!
//! - create: plain INSERT, unique violations surface as `DbError::Conflict`
//! - lookups by login accept a username or an email address

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::db::DbError;
use crate::models::{Email, Username};

/// User record from database
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string
    pub password: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    /// Stable per-user identifier; rotated on password change.
    pub fs_uniquifier: String,
}

/// Input for [`UserRepo::create`]
#[derive(Debug)]
pub struct NewUser {
    pub username: Username,
    pub email: Email,
    pub password_hash: String,
    pub active: bool,
}

const USER_COLUMNS: &str =
    "id, username, email, password, active, created_at, confirmed_at, fs_uniquifier";

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user with a fresh uniquifier.
    pub async fn create(&self, new: NewUser) -> Result<User, DbError> {
        let sql = format!(
            r#"
            INSERT INTO "user" (username, email, password, active, fs_uniquifier)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(new.username.as_str())
            .bind(new.email.as_str())
            .bind(&new.password_hash)
            .bind(new.active)
            .bind(new_uniquifier())
            .fetch_one(self.pool)
            .await
            .map_err(|e| DbError::from_insert("user", e))
    }

    /// Find a user by username or (case-insensitive) email.
    pub async fn find_by_login(&self, login: &str) -> Result<Option<User>, DbError> {
        let sql = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM "user"
            WHERE username = $1 OR email = lower($1)
            ORDER BY (username = $1) DESC
            LIMIT 1
            "#
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(login.trim())
            .fetch_optional(self.pool)
            .await?;
        Ok(user)
    }

    /// Like [`find_by_login`](Self::find_by_login) but missing users are an error.
    pub async fn get_by_login(&self, login: &str) -> Result<User, DbError> {
        self.find_by_login(login)
            .await?
            .ok_or_else(|| DbError::not_found("user", login))
    }

    pub async fn get(&self, id: i32) -> Result<User, DbError> {
        let sql = format!(r#"SELECT {USER_COLUMNS} FROM "user" WHERE id = $1"#);
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("user", id.to_string()))
    }

    /// Role names held by a user, sorted.
    pub async fn roles(&self, user_id: i32) -> Result<Vec<String>, DbError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT r.name
            FROM role r
            JOIN roles_users ru ON ru.role_id = r.id
            WHERE ru.user_id = $1
            ORDER BY r.name
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    /// Replace the password hash and rotate the uniquifier.
    ///
    /// Returns the new uniquifier.
    pub async fn set_password(&self, user_id: i32, password_hash: &str) -> Result<String, DbError> {
        let uniquifier = new_uniquifier();
        let result = sqlx::query(
            r#"UPDATE "user" SET password = $2, fs_uniquifier = $3 WHERE id = $1"#,
        )
        .bind(user_id)
        .bind(password_hash)
        .bind(&uniquifier)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("user", user_id.to_string()));
        }
        Ok(uniquifier)
    }

    /// Activate or deactivate a user by login.
    pub async fn set_active(&self, login: &str, active: bool) -> Result<User, DbError> {
        let user = self.get_by_login(login).await?;
        let sql = format!(
            r#"UPDATE "user" SET active = $2 WHERE id = $1 RETURNING {USER_COLUMNS}"#
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(active)
            .fetch_one(self.pool)
            .await?;
        Ok(user)
    }
}

fn new_uniquifier() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniquifiers_are_distinct() {
        let a = new_uniquifier();
        let b = new_uniquifier();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_username_is_conflict() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPool::connect(&url).await.expect("connect");
        crate::db::migrations::run(&pool).await.expect("migrate");

        let name = format!("dup{}", &new_uniquifier()[..8]);
        let make = |email: &str| NewUser {
            username: Username::new(&name).unwrap(),
            email: Email::new(email).unwrap(),
            password_hash: "x".into(),
            active: true,
        };

        let repo = UserRepo::new(&pool);
        repo.create(make(&format!("{}@one.test", name))).await.expect("first insert");
        let err = repo
            .create(make(&format!("{}@two.test", name)))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict { resource: "user", .. }));

        let found = repo.find_by_login(&format!("{}@ONE.test", name)).await.unwrap();
        assert_eq!(found.map(|u| u.username), Some(name));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn password_change_rotates_uniquifier() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPool::connect(&url).await.expect("connect");
        crate::db::migrations::run(&pool).await.expect("migrate");

        let name = format!("rot{}", &new_uniquifier()[..8]);
        let repo = UserRepo::new(&pool);
        let user = repo
            .create(NewUser {
                username: Username::new(&name).unwrap(),
                email: Email::new(&format!("{}@rotate.test", name)).unwrap(),
                password_hash: "old".into(),
                active: true,
            })
            .await
            .unwrap();

        let rotated = repo.set_password(user.id, "new").await.unwrap();
        assert_ne!(rotated, user.fs_uniquifier);

        let reloaded = repo.get(user.id).await.unwrap();
        assert_eq!(reloaded.fs_uniquifier, rotated);
        assert_eq!(reloaded.password, "new");
    }
}
