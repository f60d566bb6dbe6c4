//! Scan API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::OrderWithItems;
use crate::db::repository::OrderRepository;
use crate::orders::{ScanInspection, ScanService};
use crate::utils::AppResult;

fn scan_service(state: &ServerState) -> ScanService<OrderRepository> {
    ScanService::new(OrderRepository::new(state.get_pool()))
}

/// Inspect the order behind a scanned barcode token (read only)
pub async fn inspect_token(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(token): Path<String>,
) -> AppResult<Json<ScanInspection>> {
    let inspection = scan_service(&state).inspect(&token, user.role).await?;
    Ok(Json(inspection))
}

/// Advance the order behind a scanned barcode token by one step
pub async fn process_token(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(token): Path<String>,
) -> AppResult<Json<OrderWithItems>> {
    let order = scan_service(&state).process(&token, user.role).await?;

    tracing::info!(
        order_id = order.order.id,
        status = %order.order.status,
        actor = %user.username,
        "Order processed via barcode scan"
    );

    Ok(Json(order))
}

/// Inspect the order behind a tracking number (read only, admin)
pub async fn inspect_by_resi(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(resi): Path<String>,
) -> AppResult<Json<ScanInspection>> {
    let inspection = scan_service(&state)
        .inspect_by_tracking_number(&resi, user.role)
        .await?;
    Ok(Json(inspection))
}

/// Force the order behind a tracking number to PACKING (admin)
pub async fn process_by_resi(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(resi): Path<String>,
) -> AppResult<Json<OrderWithItems>> {
    let order = scan_service(&state)
        .process_by_tracking_number(&resi, user.role)
        .await?;

    tracing::info!(
        order_id = order.order.id,
        status = %order.order.status,
        actor = %user.username,
        "Order forced to packing via tracking number"
    );

    Ok(Json(order))
}
