//! Repository error type

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {resource} already exists ({constraint})")]
    Conflict {
        resource: &'static str,
        constraint: String,
    },
}

impl DbError {
    /// Map a unique-constraint violation to [`DbError::Conflict`], anything
    /// else to [`DbError::Sqlx`].
    pub fn from_insert(resource: &'static str, err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::Conflict {
                resource,
                constraint: db.constraint().unwrap_or("unique").to_owned(),
            },
            _ => Self::Sqlx(err),
        }
    }

    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }
}
