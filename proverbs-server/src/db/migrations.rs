//! Schema setup for accounts, roles and sessions
//!
//! Every statement is idempotent, so this runs on each startup after the
//! readiness check.

use sqlx::PgPool;

/// DDL in dependency order.
const STATEMENTS: &[(&str, &str)] = &[
    (
        "role",
        r#"
        CREATE TABLE IF NOT EXISTS role (
            id SERIAL PRIMARY KEY,
            name VARCHAR(50) NOT NULL UNIQUE,
            description TEXT
        )
        "#,
    ),
    (
        "user",
        r#"
        CREATE TABLE IF NOT EXISTS "user" (
            id SERIAL PRIMARY KEY,
            username VARCHAR(255) NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL,
            active BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            confirmed_at TIMESTAMPTZ,
            fs_uniquifier VARCHAR(255) NOT NULL UNIQUE
        )
        "#,
    ),
    (
        "roles_users",
        r#"
        CREATE TABLE IF NOT EXISTS roles_users (
            user_id INTEGER NOT NULL REFERENCES "user"(id) ON DELETE CASCADE,
            role_id INTEGER NOT NULL REFERENCES role(id) ON DELETE CASCADE,
            PRIMARY KEY (user_id, role_id)
        )
        "#,
    ),
    (
        "user_session",
        r#"
        CREATE TABLE IF NOT EXISTS user_session (
            token_hash TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES "user"(id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            expires_at TIMESTAMPTZ NOT NULL
        )
        "#,
    ),
    (
        "idx_user_session_user",
        "CREATE INDEX IF NOT EXISTS idx_user_session_user ON user_session(user_id)",
    ),
];

/// Run all migrations
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running migrations...");

    for (name, sql) in STATEMENTS {
        tracing::debug!(object = *name, "ensuring schema object");
        sqlx::query(*sql).execute(pool).await?;
    }

    tracing::info!("Migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_precede_their_references() {
        let position = |name: &str| STATEMENTS.iter().position(|(n, _)| *n == name).unwrap();
        assert!(position("user") < position("roles_users"));
        assert!(position("role") < position("roles_users"));
        assert!(position("user") < position("user_session"));
    }

    #[test]
    fn statements_are_idempotent() {
        for (name, sql) in STATEMENTS {
            assert!(sql.contains("IF NOT EXISTS"), "{} is not idempotent", name);
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn migrations_run_twice() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPool::connect(&url).await.expect("connect");
        run(&pool).await.expect("first run");
        run(&pool).await.expect("second run");
    }
}
