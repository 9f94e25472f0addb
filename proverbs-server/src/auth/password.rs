//! Password hashing
//!
//! Argon2id PHC strings. The configured password salt is applied as the
//! Argon2 secret (a pepper shared by every hash); each hash still gets its own
//! random salt.

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use once_cell::sync::Lazy;

use super::AuthError;

/// Stands in for the stored hash when a login names no account, so unknown
/// and known logins both cost one full verification. Same parameters as
/// [`Passwords::hash`]; no password matches it.
pub(crate) static DUMMY_HASH: Lazy<String> = Lazy::new(|| {
    format!(
        "$argon2id$v=19$m={},t={},p={}$c29tZXNhbHRzb21lc2FsdA${}",
        Params::DEFAULT_M_COST,
        Params::DEFAULT_T_COST,
        Params::DEFAULT_P_COST,
        "A".repeat(43)
    )
});

/// Hashes and verifies passwords with a fixed pepper
#[derive(Clone)]
pub struct Passwords {
    pepper: Arc<[u8]>,
}

impl Passwords {
    pub fn new(pepper: &str) -> Self {
        Self {
            pepper: Arc::from(pepper.as_bytes()),
        }
    }

    fn argon2(&self) -> Result<Argon2<'_>, AuthError> {
        if self.pepper.is_empty() {
            return Ok(Argon2::default());
        }
        Argon2::new_with_secret(
            &self.pepper,
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| AuthError::Hash(e.to_string()))
    }

    /// Hash a password into a PHC string.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hash(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Check a password against a stored PHC string.
    ///
    /// A wrong password is `Ok(false)`; a malformed hash is an error.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Hash(e.to_string()))?;
        match self.argon2()?.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::Hash(e.to_string())),
        }
    }

    /// [`hash`](Self::hash) on the blocking pool.
    pub async fn hash_blocking(&self, password: String) -> Result<String, AuthError> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.hash(&password))
            .await
            .map_err(|e| AuthError::Hash(e.to_string()))?
    }

    /// [`verify`](Self::verify) on the blocking pool.
    pub async fn verify_blocking(&self, password: String, hash: String) -> Result<bool, AuthError> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Hash(e.to_string()))?
    }
}

impl std::fmt::Debug for Passwords {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Passwords").finish_non_exhaustive()
    }
}
