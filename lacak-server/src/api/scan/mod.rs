//! Scan API Module
//!
//! Entry points for the physical scan surfaces: the receipt barcode
//! (warehouse/packing staff) and the carrier tracking number (admin).

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Scan router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/scan", routes())
}

fn routes() -> Router<ServerState> {
    // Tracking-number flow is admin-only; the service checks the role as
    // well, the middleware just rejects earlier.
    let resi_routes = Router::new()
        .route(
            "/resi/{resi}",
            get(handler::inspect_by_resi).post(handler::process_by_resi),
        )
        .layer(middleware::from_fn(require_admin));

    let token_routes = Router::new().route(
        "/{token}",
        get(handler::inspect_token).post(handler::process_token),
    );

    resi_routes.merge(token_routes)
}
