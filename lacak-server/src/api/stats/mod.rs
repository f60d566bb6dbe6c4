//! Stats API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Stats router
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/stats", get(handler::summary))
}
