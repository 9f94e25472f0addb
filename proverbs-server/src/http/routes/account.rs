//! Account endpoints - login, registration, logout and password change

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::auth::{end_session, start_session, verify_credentials, AuthError, CurrentUser};
use crate::db::{DbError, NewUser, SessionRepo, UserRepo};
use crate::http::error::ApiError;
use crate::http::extractors::MaybeToken;
use crate::http::templates::{base_context, render};
use crate::mail::{password_changed_message, welcome_message};
use crate::models::{Email, Password, Username, ValidationError};
use crate::state::AppState;

/// Where a successful login lands without a `next` parameter.
const DEFAULT_NEXT: &str = "/home";

const INVALID_LOGIN: &str = "Invalid username or password.";

/// Login page query parameters
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub registered: Option<String>,
}

/// Login form data
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// JSON login request
#[derive(Debug, Deserialize)]
pub struct ApiLoginRequest {
    #[serde(alias = "email", alias = "username")]
    pub login: String,
    pub password: String,
}

/// JSON login response
#[derive(Debug, Serialize)]
pub struct ApiLoginResponse {
    pub authentication_token: String,
    pub user: CurrentUser,
}

/// Registration form data
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

/// Password change form data
#[derive(Debug, Default, Deserialize)]
pub struct ChangePasswordForm {
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub new_password_confirm: String,
}

/// Accept only local absolute paths as post-login targets.
fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.starts_with("/\\"))
}

fn with_cookie(cookie: String, to: &str) -> Response {
    ([(header::SET_COOKIE, cookie)], Redirect::to(to)).into_response()
}

fn login_page(
    state: &AppState,
    next: &str,
    login: &str,
    error: Option<&str>,
    notice: Option<&str>,
) -> Result<Html<String>, ApiError> {
    let mut ctx = base_context(&state.config.security, None);
    ctx.insert("next", next);
    ctx.insert("login", login);
    ctx.insert("error", &error);
    ctx.insert("notice", &notice);
    render(&state.templates, "login.html", &ctx)
}

/// GET /login
async fn login_form(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LoginQuery>,
) -> Result<Html<String>, ApiError> {
    let next = safe_next(query.next.as_deref()).unwrap_or("");
    let error = query.error.is_some().then_some(INVALID_LOGIN);
    let notice = query
        .registered
        .is_some()
        .then_some("Registration complete. You can log in now.");
    login_page(&state, next, "", error, notice)
}

/// POST /login
async fn login_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let next = safe_next(form.next.as_deref());

    match verify_credentials(&state.pool, &state.passwords, &form.login, &form.password).await {
        Ok(user) => {
            let token = start_session(&state.pool, &state.tokens, user.id).await?;
            tracing::info!(user = %user.username, "user logged in");
            Ok(with_cookie(
                state.tokens.cookie(&token),
                next.unwrap_or(DEFAULT_NEXT),
            ))
        }
        Err(AuthError::InvalidCredentials) => {
            let page = login_page(
                &state,
                next.unwrap_or(""),
                &form.login,
                Some(INVALID_LOGIN),
                None,
            )?;
            Ok(page.into_response())
        }
        Err(e) => Err(e.into()),
    }
}

fn validate_api_login(req: &ApiLoginRequest) -> Result<(), ValidationError> {
    if req.login.trim().is_empty() {
        return Err(ValidationError::Empty { field: "login" });
    }
    if req.password.is_empty() {
        return Err(ValidationError::Empty { field: "password" });
    }
    Ok(())
}

/// POST /api/login
async fn api_login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ApiLoginRequest>,
) -> Result<Json<ApiLoginResponse>, ApiError> {
    validate_api_login(&req)?;
    let user = verify_credentials(&state.pool, &state.passwords, &req.login, &req.password).await?;
    let token = start_session(&state.pool, &state.tokens, user.id).await?;
    let roles = UserRepo::new(&state.pool).roles(user.id).await?;
    tracing::info!(user = %user.username, "token issued");

    Ok(Json(ApiLoginResponse {
        authentication_token: token,
        user: CurrentUser {
            id: user.id,
            username: user.username,
            email: user.email,
            roles,
        },
    }))
}

fn ensure_registerable(state: &AppState) -> Result<(), ApiError> {
    if !state.config.security.registerable {
        return Err(ApiError::NotFound {
            resource: "page",
            id: "/register".into(),
        });
    }
    Ok(())
}

fn register_page(
    state: &AppState,
    username: &str,
    email: &str,
    error: Option<&str>,
    invalid: Option<&str>,
) -> Result<Html<String>, ApiError> {
    let mut ctx = base_context(&state.config.security, None);
    ctx.insert("username", username);
    ctx.insert("email", email);
    ctx.insert("error", &error);
    ctx.insert("invalid", &invalid);
    render(&state.templates, "register.html", &ctx)
}

/// Registration form input a validation error belongs to.
fn register_input(err: &ValidationError) -> &'static str {
    match err.field() {
        "password confirmation" => "password_confirm",
        field => field,
    }
}

fn validate_registration(form: &RegisterForm) -> Result<(Username, Email, Password), ValidationError> {
    Ok((
        Username::new(&form.username)?,
        Email::new(&form.email)?,
        Password::confirmed(&form.password, &form.password_confirm)?,
    ))
}

/// GET /register
async fn register_form(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    ensure_registerable(&state)?;
    register_page(&state, "", "", None, None)
}

/// POST /register
async fn register_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, ApiError> {
    ensure_registerable(&state)?;

    let (username, email, password) = match validate_registration(&form) {
        Ok(valid) => valid,
        Err(e) => {
            let page = register_page(
                &state,
                &form.username,
                &form.email,
                Some(&e.to_string()),
                Some(register_input(&e)),
            )?;
            return Ok((StatusCode::BAD_REQUEST, page).into_response());
        }
    };

    let password_hash = state
        .passwords
        .hash_blocking(password.expose().to_owned())
        .await?;
    let new = NewUser {
        username,
        email,
        password_hash,
        active: true,
    };
    let user = match UserRepo::new(&state.pool).create(new).await {
        Ok(user) => user,
        Err(DbError::Conflict { constraint, .. }) => {
            tracing::debug!(constraint = %constraint, "registration conflict");
            let page = register_page(
                &state,
                &form.username,
                &form.email,
                Some("That username or email is already registered."),
                None,
            )?;
            return Ok((StatusCode::CONFLICT, page).into_response());
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(user = %user.username, "user registered");

    if state.config.security.send_register_email {
        let message = welcome_message(&state.config.mail.default_sender, &user.username, &user.email);
        if let Err(e) = state.mailer.send(&message).await {
            tracing::warn!(error = %e, user = %user.username, "welcome mail not sent");
        }
    }

    Ok(Redirect::to("/login?registered=1").into_response())
}

/// GET|POST /logout
async fn logout(State(state): State<Arc<AppState>>, MaybeToken(token): MaybeToken) -> Response {
    if let Some(token) = token {
        if let Err(e) = end_session(&state.pool, &state.tokens, &token).await {
            tracing::warn!(error = %e, "failed to delete session on logout");
        }
    }
    with_cookie(state.tokens.clear_cookie(), "/login")
}

fn ensure_changeable(state: &AppState) -> Result<(), ApiError> {
    if !state.config.security.changeable {
        return Err(ApiError::NotFound {
            resource: "page",
            id: "/change".into(),
        });
    }
    Ok(())
}

fn change_page(
    state: &AppState,
    user: &CurrentUser,
    error: Option<&str>,
    invalid: Option<&str>,
) -> Result<Html<String>, ApiError> {
    let mut ctx = base_context(&state.config.security, Some(user));
    ctx.insert("error", &error);
    ctx.insert("invalid", &invalid);
    render(&state.templates, "change_password.html", &ctx)
}

/// Password change input a validation error belongs to. Only the new
/// password is validated; the current one is checked against the hash.
fn change_input(err: &ValidationError) -> &'static str {
    match err.field() {
        "password confirmation" => "new_password_confirm",
        _ => "new_password",
    }
}

fn validate_new_password(form: &ChangePasswordForm) -> Result<Password, ValidationError> {
    let password = Password::confirmed(&form.new_password, &form.new_password_confirm)?;
    if password.expose() == form.password {
        return Err(ValidationError::InvalidFormat {
            field: "new password",
            reason: "must differ from the current password",
        });
    }
    Ok(password)
}

/// GET /change
async fn change_form(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<Html<String>, ApiError> {
    ensure_changeable(&state)?;
    change_page(&state, &user, None, None)
}

/// POST /change
///
/// Every existing session of the user is revoked; the browser making the
/// change gets a fresh one.
async fn change_submit(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Form(form): Form<ChangePasswordForm>,
) -> Result<Response, ApiError> {
    ensure_changeable(&state)?;

    let users = UserRepo::new(&state.pool);
    let stored = users.get(user.id).await?;
    let current_ok = state
        .passwords
        .verify_blocking(form.password.clone(), stored.password)
        .await?;
    if !current_ok {
        let page = change_page(&state, &user, Some("Invalid password."), Some("password"))?;
        return Ok((StatusCode::BAD_REQUEST, page).into_response());
    }

    let new_password = match validate_new_password(&form) {
        Ok(password) => password,
        Err(e) => {
            let page = change_page(&state, &user, Some(&e.to_string()), Some(change_input(&e)))?;
            return Ok((StatusCode::BAD_REQUEST, page).into_response());
        }
    };

    let hash = state
        .passwords
        .hash_blocking(new_password.expose().to_owned())
        .await?;
    users.set_password(user.id, &hash).await?;
    let revoked = SessionRepo::new(&state.pool).delete_for_user(user.id).await?;
    let token = start_session(&state.pool, &state.tokens, user.id).await?;
    tracing::info!(user = %user.username, revoked, "password changed");

    let message = password_changed_message(&state.config.mail.default_sender, &user.username, &user.email);
    if let Err(e) = state.mailer.send(&message).await {
        tracing::warn!(error = %e, user = %user.username, "password change notice not sent");
    }

    Ok(with_cookie(state.tokens.cookie(&token), DEFAULT_NEXT))
}

/// Routes reachable without a session
pub fn public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(login_form).post(login_submit))
        .route("/api/login", post(api_login))
        .route("/register", get(register_form).post(register_submit))
        .route("/logout", get(logout).post(logout))
}

/// Routes that need a session (gated by the caller)
pub fn session_router() -> Router<Arc<AppState>> {
    Router::new().route("/change", get(change_form).post(change_submit))
}
