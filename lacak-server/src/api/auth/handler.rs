//! Authentication Handlers
//!
//! Login, session introspection and logout. Credentials are compared as-is
//! against the user table; the session itself is a signed JWT.

use std::time::Duration;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::UserResponse;
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult};

/// Fixed delay for authentication to blunt timing probes
const AUTH_FIXED_DELAY_MS: u64 = 300;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Login handler
///
/// Failures are reported with one uniform message so usernames cannot be
/// enumerated.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::validation("username and password are required"));
    }

    let repo = UserRepository::new(state.get_pool());
    let user = repo.find_by_username(&req.username).await?;

    // Fixed delay before acting on the result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(user) if user.password == req.password => user,
        _ => {
            tracing::warn!(username = %req.username, "Login failed - invalid credentials");
            return Err(AppError::invalid_credentials());
        }
    };

    let token = state
        .get_jwt_service()
        .generate_token(&user)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    tracing::info!(username = %user.username, role = %user.role, "Login successful");

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// Current session info, read fresh from the database
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<UserResponse>> {
    let repo = UserRepository::new(state.get_pool());
    let user = repo
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", user.id)))?;
    Ok(Json(user.into()))
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Logout is a client-side token discard; the endpoint just acknowledges
pub async fn logout(_user: CurrentUser) -> Json<LogoutResponse> {
    Json(LogoutResponse { success: true })
}
