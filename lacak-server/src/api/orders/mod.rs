//! Order API Module

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    // Reads and status changes: any authenticated staff. The PATCH handler
    // routes status changes through the transition engine and enforces
    // admin itself for the full-edit branch.
    let staff_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id).patch(handler::update));

    // Creation: admin only
    let admin_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_admin));

    staff_routes.merge(admin_routes)
}
