//! Order Store interface
//!
//! The storage contract the transition engine and scan gateway run against.
//! One concrete backend (SQLite, `db::repository::OrderRepository`) exists
//! today; the trait keeps that choice swappable without touching the engine.

use crate::db::models::{
    OrderCreate, OrderListFilter, OrderStatus, OrderUpdate, OrderWithItems, StatusChange,
};

use super::error::OrderResult;

/// Durable storage and uniqueness enforcement for orders and their items.
///
/// Mutating operations must run their check-then-write sequence atomically:
/// the store is the synchronization point, there are no in-process locks.
#[allow(async_fn_in_trait)]
pub trait OrderStore {
    /// Create an order with its line items, atomically. Assigns a fresh
    /// scan token and the initial `CREATED` status; derives `total_price`
    /// from the items when not supplied (or supplied as zero).
    async fn create_order(&self, data: OrderCreate, created_by: i64)
    -> OrderResult<OrderWithItems>;

    async fn find_by_id(&self, id: i64) -> OrderResult<Option<OrderWithItems>>;

    /// Exact, case-sensitive scan-token lookup
    async fn find_by_token(&self, token: &str) -> OrderResult<Option<OrderWithItems>>;

    /// Tracking-number lookup; the input is trimmed before matching
    async fn find_by_tracking_number(
        &self,
        tracking_number: &str,
    ) -> OrderResult<Option<OrderWithItems>>;

    /// Set `status` unconditionally (admin corrective path) and stamp
    /// `updated_at`; `extra` may update carrier/note in the same write
    async fn update_status(
        &self,
        id: i64,
        status: OrderStatus,
        extra: StatusChange,
    ) -> OrderResult<OrderWithItems>;

    /// Compare-and-swap transition: moves `from → to` only if the order is
    /// still at `from`. Returns `None` when another writer got there first;
    /// two simultaneous scans can never both advance the same order.
    async fn advance_status(
        &self,
        id: i64,
        from: OrderStatus,
        to: OrderStatus,
        extra: StatusChange,
    ) -> OrderResult<Option<OrderWithItems>>;

    /// Full admin edit. Re-checks uniqueness (excluding self) when the
    /// marketplace order id or tracking number changes; when `items` are
    /// present the whole line-item set is replaced and the total recomputed.
    async fn update_order(&self, id: i64, patch: OrderUpdate) -> OrderResult<OrderWithItems>;

    async fn list_orders(&self, filter: OrderListFilter) -> OrderResult<Vec<OrderWithItems>>;
}
