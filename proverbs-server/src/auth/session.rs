//! Session tokens and their transport
//!
//! A token is 32 random bytes, base64url encoded, handed to the client once.
//! The database only ever sees `sha256(secret_key || ':' || token)`.
//!
//! Clients present the token as:
//! - `session` cookie (browsers)
//! - `Authentication-Token` header
//! - `Authorization: Bearer <token>`

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderMap};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Session cookie name
pub const SESSION_COOKIE: &str = "session";

/// Header carrying a token for API clients
pub const TOKEN_HEADER: &str = "authentication-token";

const TOKEN_BYTES: usize = 32;

/// Issues tokens and computes their stored digests
#[derive(Clone)]
pub struct SessionTokens {
    secret: Arc<[u8]>,
    ttl: Duration,
    secure: bool,
}

impl SessionTokens {
    pub fn new(secret: &str, ttl: Duration, secure: bool) -> Self {
        Self {
            secret: Arc::from(secret.as_bytes()),
            ttl,
            secure,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// A fresh token and its digest.
    pub fn issue(&self) -> (String, String) {
        let token = generate_token();
        let digest = self.digest(&token);
        (token, digest)
    }

    /// Digest stored in place of `token`.
    pub fn digest(&self, token: &str) -> String {
        let hash = Sha256::new()
            .chain_update(&self.secret)
            .chain_update(b":")
            .chain_update(token.as_bytes())
            .finalize();
        hex::encode(hash)
    }

    /// `Set-Cookie` value carrying `token`.
    pub fn cookie(&self, token: &str) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            SESSION_COOKIE,
            token,
            self.ttl.as_secs()
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// `Set-Cookie` value that removes the session cookie.
    pub fn clear_cookie(&self) -> String {
        let mut cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE);
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens")
            .field("ttl", &self.ttl)
            .field("secure", &self.secure)
            .finish_non_exhaustive()
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Pull a session token out of request headers.
///
/// Explicit token headers win over the cookie.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return Some(token.to_owned());
    }

    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return Some(token.to_owned());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(session_cookie_value)
}

fn session_cookie_value(cookies: &str) -> Option<String> {
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn tokens() -> SessionTokens {
        SessionTokens::new("secret", Duration::from_secs(60), false)
    }

    #[test]
    fn tokens_are_url_safe_and_unique() {
        let (a, _) = tokens().issue();
        let (b, _) = tokens().issue();
        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn digest_depends_on_secret() {
        let other = SessionTokens::new("other", Duration::from_secs(60), false);
        assert_eq!(tokens().digest("abc"), tokens().digest("abc"));
        assert_ne!(tokens().digest("abc"), other.digest("abc"));
        assert_eq!(tokens().digest("abc").len(), 64);
    }

    #[test]
    fn cookie_attributes() {
        let cookie = tokens().cookie("tok");
        assert_eq!(cookie, "session=tok; Path=/; HttpOnly; SameSite=Lax; Max-Age=60");

        let secure = SessionTokens::new("secret", Duration::from_secs(60), true);
        assert!(secure.cookie("tok").ends_with("; Secure"));
        assert!(secure.clear_cookie().contains("Max-Age=0"));
    }

    #[test]
    fn token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; session=abc123"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session=from-cookie"));
        headers.insert(TOKEN_HEADER, HeaderValue::from_static("from-header"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("from-header"));
    }

    #[test]
    fn bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn empty_or_missing_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(token_from_headers(&headers), None);

        headers.insert(header::COOKIE, HeaderValue::from_static("session="));
        assert_eq!(token_from_headers(&headers), None);
    }
}
