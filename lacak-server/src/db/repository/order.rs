//! Order Repository
//!
//! SQLite implementation of the core's [`OrderStore`] interface. Every
//! check-then-write sequence runs inside one transaction, and the UNIQUE
//! constraints on `marketplace_order_id` / `tracking_number` back-stop the
//! application-level checks, so a race between two writers still surfaces
//! as the corresponding `Duplicate*` error.

use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::db::models::{
    DateSort, Order, OrderCreate, OrderItem, OrderItemInput, OrderListFilter, OrderStatus,
    OrderUpdate, OrderWithItems, StatusChange, UserSummary,
};
use crate::orders::error::{OrderError, OrderResult};
use crate::orders::store::OrderStore;
use crate::orders::token::generate_scan_token;
use crate::utils::time::{now_millis, parse_date};
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN};

#[derive(Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Attach line items and creator info to a batch of order rows
    async fn attach_details(&self, orders: Vec<Order>) -> OrderResult<Vec<OrderWithItems>> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT * FROM order_items WHERE order_id IN (");
        let mut sep = qb.separated(", ");
        for id in &ids {
            sep.push_bind(*id);
        }
        sep.push_unseparated(") ORDER BY order_id, id");
        let items: Vec<OrderItem> = qb.build_query_as().fetch_all(&self.pool).await?;

        let mut items_by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
        for item in items {
            items_by_order.entry(item.order_id).or_default().push(item);
        }

        let mut user_ids: Vec<i64> = orders.iter().map(|o| o.created_by).collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT id, name, username FROM users WHERE id IN (");
        let mut sep = qb.separated(", ");
        for id in &user_ids {
            sep.push_bind(*id);
        }
        sep.push_unseparated(")");
        let users: Vec<UserSummary> = qb.build_query_as().fetch_all(&self.pool).await?;
        let users_by_id: HashMap<i64, UserSummary> =
            users.into_iter().map(|u| (u.id, u)).collect();

        Ok(orders
            .into_iter()
            .map(|order| OrderWithItems {
                items: items_by_order.remove(&order.id).unwrap_or_default(),
                created_by_user: users_by_id.get(&order.created_by).cloned(),
                order,
            })
            .collect())
    }

    async fn load_one(&self, order: Option<Order>) -> OrderResult<Option<OrderWithItems>> {
        match order {
            Some(order) => Ok(self.attach_details(vec![order]).await?.into_iter().next()),
            None => Ok(None),
        }
    }
}

impl OrderStore for OrderRepository {
    async fn create_order(
        &self,
        data: OrderCreate,
        created_by: i64,
    ) -> OrderResult<OrderWithItems> {
        validate_create(&data)?;

        let total_price = data
            .total_price
            .filter(|t| *t > 0)
            .unwrap_or_else(|| items_total(&data.items));
        let scan_token = generate_scan_token();
        let now = now_millis();

        let mut tx = self.pool.begin().await?;

        // Duplicate check first so the error can name the conflicting order;
        // the UNIQUE constraint catches the race this check cannot see.
        let existing: Option<(String, OrderStatus)> = sqlx::query_as(
            "SELECT buyer_name, status FROM orders WHERE marketplace_order_id = ?",
        )
        .bind(&data.marketplace_order_id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some((buyer_name, status)) = existing {
            return Err(OrderError::DuplicateMarketplaceOrderId {
                marketplace_order_id: data.marketplace_order_id,
                buyer_name: Some(buyer_name),
                status: Some(status),
            });
        }

        let result = sqlx::query(
            "INSERT INTO orders (marketplace_order_id, buyer_name, platform, status, \
             order_date, total_price, note, carrier, scan_token, created_by, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&data.marketplace_order_id)
        .bind(&data.buyer_name)
        .bind(data.platform)
        .bind(OrderStatus::Created)
        .bind(&data.order_date)
        .bind(total_price)
        .bind(&data.note)
        .bind(&data.carrier)
        .bind(&scan_token)
        .bind(created_by)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, &data.marketplace_order_id, None))?;

        let order_id = result.last_insert_rowid();

        for item in &data.items {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_name, qty, unit_price) \
                 VALUES (?, ?, ?, ?)",
            )
            .bind(order_id)
            .bind(&item.product_name)
            .bind(item.qty)
            .bind(item.unit_price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.find_by_id(order_id)
            .await?
            .ok_or_else(|| OrderError::Database("Order vanished after insert".to_string()))
    }

    async fn find_by_id(&self, id: i64) -> OrderResult<Option<OrderWithItems>> {
        let order: Option<Order> = sqlx::query_as("SELECT * FROM orders WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        self.load_one(order).await
    }

    async fn find_by_token(&self, token: &str) -> OrderResult<Option<OrderWithItems>> {
        let order: Option<Order> = sqlx::query_as("SELECT * FROM orders WHERE scan_token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        self.load_one(order).await
    }

    async fn find_by_tracking_number(
        &self,
        tracking_number: &str,
    ) -> OrderResult<Option<OrderWithItems>> {
        let order: Option<Order> = sqlx::query_as("SELECT * FROM orders WHERE tracking_number = ?")
            .bind(tracking_number.trim())
            .fetch_optional(&self.pool)
            .await?;
        self.load_one(order).await
    }

    async fn update_status(
        &self,
        id: i64,
        status: OrderStatus,
        extra: StatusChange,
    ) -> OrderResult<OrderWithItems> {
        let result = sqlx::query(
            "UPDATE orders SET status = ?, carrier = COALESCE(?, carrier), \
             note = COALESCE(?, note), updated_at = ? WHERE id = ?",
        )
        .bind(status)
        .bind(&extra.carrier)
        .bind(&extra.note)
        .bind(now_millis())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(OrderError::NotFound(format!("Order {id} not found")));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("Order {id} not found")))
    }

    async fn advance_status(
        &self,
        id: i64,
        from: OrderStatus,
        to: OrderStatus,
        extra: StatusChange,
    ) -> OrderResult<Option<OrderWithItems>> {
        // Compare-and-swap on (id, status): of two concurrent scans, exactly
        // one matches the WHERE clause and wins.
        let result = sqlx::query(
            "UPDATE orders SET status = ?, carrier = COALESCE(?, carrier), \
             note = COALESCE(?, note), updated_at = ? WHERE id = ? AND status = ?",
        )
        .bind(to)
        .bind(&extra.carrier)
        .bind(&extra.note)
        .bind(now_millis())
        .bind(id)
        .bind(from)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    async fn update_order(&self, id: i64, patch: OrderUpdate) -> OrderResult<OrderWithItems> {
        validate_update(&patch)?;

        let mut tx = self.pool.begin().await?;

        let current: Option<Order> = sqlx::query_as("SELECT * FROM orders WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let current = current.ok_or_else(|| OrderError::NotFound(format!("Order {id} not found")))?;

        if let Some(new_mid) = &patch.marketplace_order_id
            && *new_mid != current.marketplace_order_id
        {
            let existing: Option<(String, OrderStatus)> = sqlx::query_as(
                "SELECT buyer_name, status FROM orders WHERE marketplace_order_id = ? AND id != ?",
            )
            .bind(new_mid)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some((buyer_name, status)) = existing {
                return Err(OrderError::DuplicateMarketplaceOrderId {
                    marketplace_order_id: new_mid.clone(),
                    buyer_name: Some(buyer_name),
                    status: Some(status),
                });
            }
        }

        // Empty input clears the tracking number back to NULL
        let tracking_update: Option<Option<String>> = patch.tracking_number.as_ref().map(|raw| {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        });

        if let Some(Some(resi)) = &tracking_update
            && current.tracking_number.as_deref() != Some(resi.as_str())
        {
            let existing: Option<i64> =
                sqlx::query_scalar("SELECT id FROM orders WHERE tracking_number = ? AND id != ?")
                    .bind(resi)
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?;

            if existing.is_some() {
                return Err(OrderError::DuplicateTrackingNumber {
                    tracking_number: resi.clone(),
                });
            }
        }

        // Explicit total wins; a replaced item set otherwise recomputes it
        let new_total: Option<i64> = if let Some(items) = &patch.items {
            Some(
                patch
                    .total_price
                    .filter(|t| *t > 0)
                    .unwrap_or_else(|| items_total(items)),
            )
        } else {
            patch.total_price.filter(|t| *t > 0)
        };

        let new_mid = patch.marketplace_order_id.clone();
        sqlx::query(
            "UPDATE orders SET \
             marketplace_order_id = COALESCE(?, marketplace_order_id), \
             buyer_name = COALESCE(?, buyer_name), \
             platform = COALESCE(?, platform), \
             order_date = COALESCE(?, order_date), \
             total_price = COALESCE(?, total_price), \
             note = COALESCE(?, note), \
             carrier = COALESCE(?, carrier), \
             tracking_number = CASE WHEN ? THEN ? ELSE tracking_number END, \
             updated_at = ? \
             WHERE id = ?",
        )
        .bind(&patch.marketplace_order_id)
        .bind(&patch.buyer_name)
        .bind(patch.platform)
        .bind(&patch.order_date)
        .bind(new_total)
        .bind(&patch.note)
        .bind(&patch.carrier)
        .bind(tracking_update.is_some())
        .bind(tracking_update.clone().flatten())
        .bind(now_millis())
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            map_unique_violation(
                e,
                new_mid.as_deref().unwrap_or(&current.marketplace_order_id),
                tracking_update.as_ref().and_then(|t| t.as_deref()),
            )
        })?;

        if let Some(items) = &patch.items {
            // Replace the whole line-item set: delete-then-insert
            sqlx::query("DELETE FROM order_items WHERE order_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            for item in items {
                sqlx::query(
                    "INSERT INTO order_items (order_id, product_name, qty, unit_price) \
                     VALUES (?, ?, ?, ?)",
                )
                .bind(id)
                .bind(&item.product_name)
                .bind(item.qty)
                .bind(item.unit_price)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("Order {id} not found")))
    }

    async fn list_orders(&self, filter: OrderListFilter) -> OrderResult<Vec<OrderWithItems>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM orders WHERE 1 = 1");

        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status);
        }

        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{search}%");
            qb.push(" AND (marketplace_order_id LIKE ")
                .push_bind(pattern.clone())
                .push(" OR buyer_name LIKE ")
                .push_bind(pattern)
                .push(")");
        }

        if let Some(from) = &filter.date_from {
            qb.push(" AND order_date >= ").push_bind(from.clone());
        }

        if let Some(to) = &filter.date_to {
            qb.push(" AND order_date <= ").push_bind(to.clone());
        }

        qb.push(match filter.sort {
            DateSort::Asc => " ORDER BY order_date ASC, id ASC",
            DateSort::Desc => " ORDER BY order_date DESC, id DESC",
        });

        let orders: Vec<Order> = qb.build_query_as().fetch_all(&self.pool).await?;
        self.attach_details(orders).await
    }
}

fn items_total(items: &[OrderItemInput]) -> i64 {
    items.iter().map(|item| item.qty * item.unit_price).sum()
}

fn validate_item(item: &OrderItemInput) -> OrderResult<()> {
    if item.product_name.trim().is_empty() {
        return Err(OrderError::Validation(
            "item product_name must not be empty".to_string(),
        ));
    }
    if item.product_name.len() > MAX_NAME_LEN {
        return Err(OrderError::Validation(format!(
            "item product_name is too long (max {MAX_NAME_LEN})"
        )));
    }
    if item.qty <= 0 {
        return Err(OrderError::Validation("item qty must be positive".to_string()));
    }
    if item.unit_price < 0 {
        return Err(OrderError::Validation(
            "item unit_price must not be negative".to_string(),
        ));
    }
    Ok(())
}

fn validate_items(items: &[OrderItemInput]) -> OrderResult<()> {
    if items.is_empty() {
        return Err(OrderError::Validation(
            "an order needs at least one line item".to_string(),
        ));
    }
    items.iter().try_for_each(validate_item)
}

fn validate_text(value: &str, field: &str, max_len: usize) -> OrderResult<()> {
    if value.trim().is_empty() {
        return Err(OrderError::Validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(OrderError::Validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

fn validate_create(data: &OrderCreate) -> OrderResult<()> {
    validate_text(&data.marketplace_order_id, "marketplace_order_id", MAX_SHORT_TEXT_LEN)?;
    validate_text(&data.buyer_name, "buyer_name", MAX_NAME_LEN)?;
    validate_text(&data.carrier, "carrier", MAX_SHORT_TEXT_LEN)?;
    parse_date(&data.order_date)
        .map_err(|_| OrderError::Validation(format!("Invalid order_date: {}", data.order_date)))?;
    if let Some(note) = &data.note
        && note.len() > MAX_NOTE_LEN
    {
        return Err(OrderError::Validation(format!(
            "note is too long (max {MAX_NOTE_LEN})"
        )));
    }
    if let Some(total) = data.total_price
        && total < 0
    {
        return Err(OrderError::Validation(
            "total_price must not be negative".to_string(),
        ));
    }
    validate_items(&data.items)
}

fn validate_update(patch: &OrderUpdate) -> OrderResult<()> {
    if let Some(mid) = &patch.marketplace_order_id {
        validate_text(mid, "marketplace_order_id", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(buyer) = &patch.buyer_name {
        validate_text(buyer, "buyer_name", MAX_NAME_LEN)?;
    }
    if let Some(carrier) = &patch.carrier {
        validate_text(carrier, "carrier", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(date) = &patch.order_date {
        parse_date(date).map_err(|_| OrderError::Validation(format!("Invalid order_date: {date}")))?;
    }
    if let Some(note) = &patch.note
        && note.len() > MAX_NOTE_LEN
    {
        return Err(OrderError::Validation(format!(
            "note is too long (max {MAX_NOTE_LEN})"
        )));
    }
    if let Some(total) = patch.total_price
        && total < 0
    {
        return Err(OrderError::Validation(
            "total_price must not be negative".to_string(),
        ));
    }
    if let Some(items) = &patch.items {
        validate_items(items)?;
    }
    Ok(())
}

/// Map a UNIQUE-constraint race slipping past the in-transaction checks onto
/// the matching typed error instead of a generic database failure.
fn map_unique_violation(
    err: sqlx::Error,
    marketplace_order_id: &str,
    tracking_number: Option<&str>,
) -> OrderError {
    if let sqlx::Error::Database(db) = &err
        && db.is_unique_violation()
    {
        let msg = db.message().to_string();
        if msg.contains("orders.marketplace_order_id") {
            return OrderError::DuplicateMarketplaceOrderId {
                marketplace_order_id: marketplace_order_id.to_string(),
                buyer_name: None,
                status: None,
            };
        }
        if msg.contains("orders.tracking_number") {
            return OrderError::DuplicateTrackingNumber {
                tracking_number: tracking_number.unwrap_or_default().to_string(),
            };
        }
    }
    err.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Platform;
    use sqlx::sqlite::SqlitePoolOptions;

    /// Seeded by the initial migration
    const ADMIN_ID: i64 = 1;

    /// In-memory pool running the real migrations. A single connection so
    /// every query sees the same in-memory database.
    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query("PRAGMA foreign_keys = ON;")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    fn sample_order(marketplace_order_id: &str) -> OrderCreate {
        OrderCreate {
            marketplace_order_id: marketplace_order_id.to_string(),
            buyer_name: "Budi Santoso".to_string(),
            platform: Platform::Shopee,
            order_date: "2024-05-10".to_string(),
            total_price: None,
            note: None,
            carrier: "Reguler".to_string(),
            items: vec![
                OrderItemInput {
                    product_name: "Casing HP".to_string(),
                    qty: 2,
                    unit_price: 1000,
                },
                OrderItemInput {
                    product_name: "Tempered Glass".to_string(),
                    qty: 1,
                    unit_price: 500,
                },
            ],
        }
    }

    #[tokio::test]
    async fn create_derives_total_and_initial_state() {
        let repo = OrderRepository::new(test_pool().await);

        let order = repo.create_order(sample_order("SHP-1001"), ADMIN_ID).await.unwrap();

        assert_eq!(order.order.status, OrderStatus::Created);
        assert_eq!(order.order.total_price, 2500);
        assert_eq!(order.order.scan_token.len(), 25);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].subtotal(), 2000);
        assert_eq!(order.items[1].subtotal(), 500);
        assert_eq!(
            order.created_by_user.as_ref().map(|u| u.username.as_str()),
            Some("admin")
        );
    }

    #[tokio::test]
    async fn create_keeps_explicit_total() {
        let repo = OrderRepository::new(test_pool().await);

        let mut data = sample_order("SHP-1002");
        data.total_price = Some(9999);
        let order = repo.create_order(data, ADMIN_ID).await.unwrap();

        assert_eq!(order.order.total_price, 9999);
    }

    #[tokio::test]
    async fn create_rejects_duplicate_marketplace_order_id() {
        let repo = OrderRepository::new(test_pool().await);

        repo.create_order(sample_order("SHP-1003"), ADMIN_ID).await.unwrap();
        let err = repo
            .create_order(sample_order("SHP-1003"), ADMIN_ID)
            .await
            .unwrap_err();

        match err {
            OrderError::DuplicateMarketplaceOrderId {
                marketplace_order_id,
                buyer_name,
                status,
            } => {
                assert_eq!(marketplace_order_id, "SHP-1003");
                assert_eq!(buyer_name.as_deref(), Some("Budi Santoso"));
                assert_eq!(status, Some(OrderStatus::Created));
            }
            other => panic!("expected DuplicateMarketplaceOrderId, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_rejects_empty_items() {
        let repo = OrderRepository::new(test_pool().await);

        let mut data = sample_order("SHP-1004");
        data.items.clear();

        assert!(matches!(
            repo.create_order(data, ADMIN_ID).await,
            Err(OrderError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn update_replaces_items_and_recomputes_total() {
        let repo = OrderRepository::new(test_pool().await);

        let order = repo.create_order(sample_order("SHP-1005"), ADMIN_ID).await.unwrap();
        assert_eq!(order.order.total_price, 2500);

        let patch = OrderUpdate {
            items: Some(vec![OrderItemInput {
                product_name: "Powerbank".to_string(),
                qty: 3,
                unit_price: 100,
            }]),
            ..Default::default()
        };
        let updated = repo.update_order(order.order.id, patch).await.unwrap();

        // Old items fully replaced, not merged
        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.items[0].product_name, "Powerbank");
        assert_eq!(updated.order.total_price, 300);
    }

    #[tokio::test]
    async fn update_rejects_duplicate_tracking_number() {
        let repo = OrderRepository::new(test_pool().await);

        let first = repo.create_order(sample_order("SHP-1006"), ADMIN_ID).await.unwrap();
        let second = repo.create_order(sample_order("SHP-1007"), ADMIN_ID).await.unwrap();

        let patch = OrderUpdate {
            tracking_number: Some("JNE123456".to_string()),
            ..Default::default()
        };
        repo.update_order(first.order.id, patch).await.unwrap();

        let patch = OrderUpdate {
            tracking_number: Some("JNE123456".to_string()),
            ..Default::default()
        };
        let err = repo.update_order(second.order.id, patch).await.unwrap_err();

        assert!(matches!(
            err,
            OrderError::DuplicateTrackingNumber { tracking_number } if tracking_number == "JNE123456"
        ));
    }

    #[tokio::test]
    async fn update_clears_tracking_number_with_empty_input() {
        let repo = OrderRepository::new(test_pool().await);

        let order = repo.create_order(sample_order("SHP-1008"), ADMIN_ID).await.unwrap();

        let patch = OrderUpdate {
            tracking_number: Some("  SPX9000  ".to_string()),
            ..Default::default()
        };
        let updated = repo.update_order(order.order.id, patch).await.unwrap();
        assert_eq!(updated.order.tracking_number.as_deref(), Some("SPX9000"));

        let patch = OrderUpdate {
            tracking_number: Some("".to_string()),
            ..Default::default()
        };
        let cleared = repo.update_order(order.order.id, patch).await.unwrap();
        assert_eq!(cleared.order.tracking_number, None);
    }

    #[tokio::test]
    async fn token_and_tracking_lookups() {
        let repo = OrderRepository::new(test_pool().await);

        let order = repo.create_order(sample_order("SHP-1009"), ADMIN_ID).await.unwrap();
        let token = order.order.scan_token.clone();

        let found = repo.find_by_token(&token).await.unwrap().unwrap();
        assert_eq!(found.order.id, order.order.id);

        // Token match is exact and case-sensitive
        assert!(repo.find_by_token(&token.to_lowercase()).await.unwrap().is_none());

        let patch = OrderUpdate {
            tracking_number: Some("JNT555".to_string()),
            ..Default::default()
        };
        repo.update_order(order.order.id, patch).await.unwrap();

        // Tracking-number match trims the scanned input
        let found = repo.find_by_tracking_number("  JNT555 ").await.unwrap().unwrap();
        assert_eq!(found.order.id, order.order.id);
    }

    #[tokio::test]
    async fn advance_status_is_compare_and_swap() {
        let repo = OrderRepository::new(test_pool().await);

        let order = repo.create_order(sample_order("SHP-1010"), ADMIN_ID).await.unwrap();

        let first = repo
            .advance_status(
                order.order.id,
                OrderStatus::Created,
                OrderStatus::ReceivedByWarehouse,
                StatusChange::default(),
            )
            .await
            .unwrap();
        assert_eq!(
            first.unwrap().order.status,
            OrderStatus::ReceivedByWarehouse
        );

        // Same CAS again: the order is no longer CREATED, nobody wins twice
        let second = repo
            .advance_status(
                order.order.id,
                OrderStatus::Created,
                OrderStatus::ReceivedByWarehouse,
                StatusChange::default(),
            )
            .await
            .unwrap();
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn list_orders_filters_and_sorts() {
        let repo = OrderRepository::new(test_pool().await);

        let mut early = sample_order("SHP-2001");
        early.order_date = "2024-01-05".to_string();
        early.buyer_name = "Ani Wijaya".to_string();
        let early = repo.create_order(early, ADMIN_ID).await.unwrap();

        let mut late = sample_order("SHP-2002");
        late.order_date = "2024-03-20".to_string();
        repo.create_order(late, ADMIN_ID).await.unwrap();

        repo.update_status(
            early.order.id,
            OrderStatus::ReceivedByWarehouse,
            StatusChange::default(),
        )
        .await
        .unwrap();

        let by_status = repo
            .list_orders(OrderListFilter {
                status: Some(OrderStatus::ReceivedByWarehouse),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_status.len(), 1);
        assert_eq!(by_status[0].order.marketplace_order_id, "SHP-2001");

        let by_search = repo
            .list_orders(OrderListFilter {
                search: Some("ani".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_search.len(), 1);

        let in_range = repo
            .list_orders(OrderListFilter {
                date_from: Some("2024-02-01".to_string()),
                date_to: Some("2024-12-31".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(in_range.len(), 1);
        assert_eq!(in_range[0].order.marketplace_order_id, "SHP-2002");

        let ascending = repo
            .list_orders(OrderListFilter {
                sort: DateSort::Asc,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(ascending[0].order.marketplace_order_id, "SHP-2001");
        assert_eq!(ascending[1].order.marketplace_order_id, "SHP-2002");
    }
}
