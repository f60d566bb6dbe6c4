//! Order API Handlers
//!
//! Thin glue: deserialize, hand off to the order core, relay the result.
//! No transition decisions are made here.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    DateSort, OrderCreate, OrderItemInput, OrderListFilter, OrderStatus, OrderUpdate,
    OrderWithItems, Platform, StatusChange,
};
use crate::db::repository::OrderRepository;
use crate::orders::{OrderStore, TransitionEngine};
use crate::utils::{AppError, AppResult};

/// Query params for listing orders
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    #[serde(default)]
    pub sort: DateSort,
}

/// List orders with optional filters
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<OrderWithItems>>> {
    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            OrderStatus::parse(raw)
                .ok_or_else(|| AppError::validation(format!("Unknown status: {raw}")))?,
        ),
        None => None,
    };

    let repo = OrderRepository::new(state.get_pool());
    let orders = repo
        .list_orders(OrderListFilter {
            status,
            search: query.search,
            date_from: query.date_from,
            date_to: query.date_to,
            sort: query.sort,
        })
        .await?;
    Ok(Json(orders))
}

/// Get order by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderWithItems>> {
    let repo = OrderRepository::new(state.get_pool());
    let order = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    Ok(Json(order))
}

/// Create a new order (admin route)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<OrderWithItems>> {
    let repo = OrderRepository::new(state.get_pool());
    let order = repo.create_order(payload, user.id).await?;

    tracing::info!(
        order_id = order.order.id,
        marketplace_order_id = %order.order.marketplace_order_id,
        "Order created"
    );

    Ok(Json(order))
}

/// PATCH body: either a status change (goes through the transition engine)
/// or an admin full edit.
#[derive(Debug, Deserialize)]
pub struct OrderPatchRequest {
    pub status: Option<OrderStatus>,
    pub marketplace_order_id: Option<String>,
    pub buyer_name: Option<String>,
    pub platform: Option<Platform>,
    pub order_date: Option<String>,
    pub total_price: Option<i64>,
    pub note: Option<String>,
    pub carrier: Option<String>,
    pub tracking_number: Option<String>,
    pub items: Option<Vec<OrderItemInput>>,
}

/// Update an order
///
/// A body carrying `status` is a transition request for any staff role:
/// admin sets the status directly, warehouse/packing must match the
/// computed next step. Everything else is an admin-only full edit.
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<OrderPatchRequest>,
) -> AppResult<Json<OrderWithItems>> {
    let repo = OrderRepository::new(state.get_pool());

    if let Some(status) = payload.status {
        let engine = TransitionEngine::new(repo);
        let extra = StatusChange {
            carrier: payload.carrier,
            note: payload.note,
        };
        let order = engine.advance(id, user.role, Some(status), extra).await?;

        tracing::info!(
            order_id = id,
            status = %order.order.status,
            actor = %user.username,
            "Order status changed"
        );

        return Ok(Json(order));
    }

    if !user.is_admin() {
        return Err(AppError::forbidden("Admin role required".to_string()));
    }

    let order = repo
        .update_order(
            id,
            OrderUpdate {
                marketplace_order_id: payload.marketplace_order_id,
                buyer_name: payload.buyer_name,
                platform: payload.platform,
                order_date: payload.order_date,
                total_price: payload.total_price,
                note: payload.note,
                carrier: payload.carrier,
                tracking_number: payload.tracking_number,
                items: payload.items,
            },
        )
        .await?;

    Ok(Json(order))
}
