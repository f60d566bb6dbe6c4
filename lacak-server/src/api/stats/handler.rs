//! Stats API Handlers

use axum::{Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::stats::{self, StatsSummary};
use crate::utils::AppResult;

/// Dashboard summary numbers
pub async fn summary(
    State(state): State<ServerState>,
    _user: CurrentUser,
) -> AppResult<Json<StatsSummary>> {
    let summary = stats::summary(&state.pool).await?;
    Ok(Json(summary))
}
