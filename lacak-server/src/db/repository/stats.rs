//! Dashboard statistics
//!
//! Read-only aggregates for the overview widgets. Weak isolation is fine
//! here, nothing is mutated.

use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::SqlitePool;

use super::RepoResult;
use crate::db::models::OrderStatus;

/// Dashboard summary numbers
#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
    pub total_orders: i64,
    pub total_users: i64,
    pub total_order_items: i64,
    /// Revenue across all non-cancelled orders, in rupiah
    pub total_revenue: i64,
    pub orders_by_status: BTreeMap<String, i64>,
}

pub async fn summary(pool: &SqlitePool) -> RepoResult<StatsSummary> {
    let total_orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(pool)
        .await?;

    let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let total_order_items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items")
        .fetch_one(pool)
        .await?;

    let total_revenue: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(total_price), 0) FROM orders WHERE status != ?",
    )
    .bind(OrderStatus::Cancelled)
    .fetch_one(pool)
    .await?;

    let rows: Vec<(OrderStatus, i64)> =
        sqlx::query_as("SELECT status, COUNT(*) FROM orders GROUP BY status")
            .fetch_all(pool)
            .await?;

    let orders_by_status = rows
        .into_iter()
        .map(|(status, count)| (status.to_string(), count))
        .collect();

    Ok(StatsSummary {
        total_orders,
        total_users,
        total_order_items,
        total_revenue,
        orders_by_status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{OrderCreate, OrderItemInput, Platform, StatusChange};
    use crate::db::repository::OrderRepository;
    use crate::orders::OrderStore;
    use sqlx::sqlite::SqlitePoolOptions;

    #[tokio::test]
    async fn revenue_excludes_cancelled_orders() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();

        let repo = OrderRepository::new(pool.clone());
        let make = |mid: &str| OrderCreate {
            marketplace_order_id: mid.to_string(),
            buyer_name: "Budi".to_string(),
            platform: Platform::Tokopedia,
            order_date: "2024-05-10".to_string(),
            total_price: None,
            note: None,
            carrier: "Reguler".to_string(),
            items: vec![OrderItemInput {
                product_name: "Kabel Data".to_string(),
                qty: 1,
                unit_price: 4000,
            }],
        };

        repo.create_order(make("TKP-1"), 1).await.unwrap();
        let cancelled = repo.create_order(make("TKP-2"), 1).await.unwrap();
        repo.update_status(
            cancelled.order.id,
            OrderStatus::Cancelled,
            StatusChange::default(),
        )
        .await
        .unwrap();

        let stats = summary(&pool).await.unwrap();
        assert_eq!(stats.total_orders, 2);
        assert_eq!(stats.total_order_items, 2);
        assert_eq!(stats.total_revenue, 4000);
        assert_eq!(stats.orders_by_status.get("CREATED"), Some(&1));
        assert_eq!(stats.orders_by_status.get("CANCELLED"), Some(&1));
    }
}
