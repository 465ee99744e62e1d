//! Authentication route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::middleware::auth::{OptionalAuth, clear_current_user, set_current_user};
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `POST /api/auth/register` - create a new account.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    AuthService::new(state.pool())
        .register(&request.username, &request.email, &request.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Registration successful" })),
    ))
}

/// `POST /api/auth/login` - verify credentials and establish a session.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>> {
    let user = AuthService::new(state.pool())
        .login(&request.username, &request.password)
        .await?;

    let current = CurrentUser::from(&user);
    set_current_user(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    Ok(Json(json!({
        "message": "Login successful",
        "user": { "username": user.username, "is_admin": user.is_admin }
    })))
}

/// `POST /api/auth/logout` - clear the session.
pub async fn logout(session: Session) -> Result<Json<Value>> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    Ok(Json(json!({ "message": "Logout successful" })))
}

/// `GET /api/auth/status` - report the current session.
pub async fn status(OptionalAuth(user): OptionalAuth) -> Json<Value> {
    match user {
        Some(user) => Json(json!({
            "logged_in": true,
            "username": user.username,
            "is_admin": user.is_admin
        })),
        None => Json(json!({ "logged_in": false })),
    }
}
