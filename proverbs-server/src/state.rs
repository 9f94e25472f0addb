//! Application state shared across handlers

use std::sync::Arc;

use sqlx::PgPool;
use tera::Tera;

use crate::auth::{Passwords, SessionTokens};
use crate::config::AppConfig;
use crate::http::templates;
use crate::mail::{mailer_for, Mailer};

/// Shared application state
pub struct AppState {
    pub pool: PgPool,
    pub config: AppConfig,
    pub passwords: Passwords,
    pub tokens: SessionTokens,
    pub templates: Tera,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig) -> Result<Self, tera::Error> {
        let security = &config.security;
        let passwords = Passwords::new(&security.password_salt);
        let tokens = SessionTokens::new(
            &security.secret_key,
            security.session_ttl,
            security.secure_cookies,
        );
        let mailer = mailer_for(&config.mail);

        Ok(Self {
            pool,
            passwords,
            tokens,
            templates: templates::load()?,
            mailer,
            config,
        })
    }
}
