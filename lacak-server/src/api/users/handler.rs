//! User API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{UserCreate, UserResponse, UserUpdate};
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult};

/// List all users
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<UserResponse>>> {
    let repo = UserRepository::new(state.get_pool());
    let users = repo.find_all().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Create a new user
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<UserResponse>> {
    let repo = UserRepository::new(state.get_pool());
    let user = repo.create(payload).await?;
    Ok(Json(user.into()))
}

/// Update a user
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserResponse>> {
    let repo = UserRepository::new(state.get_pool());
    let user = repo.update(id, payload).await?;
    Ok(Json(user.into()))
}

/// Delete a user. Deleting the account you are logged in with is refused.
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if id == user.id {
        return Err(AppError::validation("Cannot delete your own account"));
    }

    let repo = UserRepository::new(state.get_pool());
    let result = repo.delete(id).await?;
    Ok(Json(result))
}
