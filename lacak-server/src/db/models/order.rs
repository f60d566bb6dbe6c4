//! Order Model
//!
//! One row per marketplace sale, plus owned line items. Money columns are
//! integer rupiah; `order_date` is an ISO `YYYY-MM-DD` string so date-range
//! filters can compare lexicographically.

use serde::{Deserialize, Serialize};

use super::UserSummary;

/// Fulfillment status of an order
///
/// The staff flow is linear and forward-only:
/// `CREATED → RECEIVED_BY_WAREHOUSE → PACKING → SHIPPED → DONE`.
/// `CANCELLED` is a terminal state reachable only through an admin override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Created,
    ReceivedByWarehouse,
    Packing,
    Shipped,
    Done,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "CREATED",
            OrderStatus::ReceivedByWarehouse => "RECEIVED_BY_WAREHOUSE",
            OrderStatus::Packing => "PACKING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Done => "DONE",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CREATED" => Some(OrderStatus::Created),
            "RECEIVED_BY_WAREHOUSE" => Some(OrderStatus::ReceivedByWarehouse),
            "PACKING" => Some(OrderStatus::Packing),
            "SHIPPED" => Some(OrderStatus::Shipped),
            "DONE" => Some(OrderStatus::Done),
            "CANCELLED" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marketplace the sale came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "PascalCase")]
pub enum Platform {
    Shopee,
    Tokopedia,
    Blibli,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Platform::Shopee => "Shopee",
            Platform::Tokopedia => "Tokopedia",
            Platform::Blibli => "Blibli",
        };
        f.write_str(s)
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    /// Externally supplied id from the marketplace, unique across orders
    pub marketplace_order_id: String,
    pub buyer_name: String,
    pub platform: Platform,
    pub status: OrderStatus,
    pub order_date: String,
    pub total_price: i64,
    pub note: Option<String>,
    pub carrier: String,
    /// Carrier tracking number ("resi"); NULL until packing, unique when set
    pub tracking_number: Option<String>,
    /// Opaque token printed as a barcode on the receipt; assigned once,
    /// never regenerated
    pub scan_token: String,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line item (owned by exactly one order)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_name: String,
    pub qty: i64,
    pub unit_price: i64,
}

impl OrderItem {
    /// Line subtotal, always derived
    pub fn subtotal(&self) -> i64 {
        self.qty * self.unit_price
    }
}

/// Line item input for create/update payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub product_name: String,
    pub qty: i64,
    pub unit_price: i64,
}

/// Create order payload
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreate {
    pub marketplace_order_id: String,
    pub buyer_name: String,
    pub platform: Platform,
    pub order_date: String,
    /// When absent or zero, derived as Σ qty × unit_price over `items`
    pub total_price: Option<i64>,
    pub note: Option<String>,
    pub carrier: String,
    pub items: Vec<OrderItemInput>,
}

/// Full admin edit payload; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderUpdate {
    pub marketplace_order_id: Option<String>,
    pub buyer_name: Option<String>,
    pub platform: Option<Platform>,
    pub order_date: Option<String>,
    pub total_price: Option<i64>,
    pub note: Option<String>,
    pub carrier: Option<String>,
    /// `Some("")` clears the tracking number back to NULL
    pub tracking_number: Option<String>,
    /// When present, replaces the entire line-item set (delete-then-insert)
    pub items: Option<Vec<OrderItemInput>>,
}

/// Optional side fields applied together with a status change
#[derive(Debug, Clone, Default)]
pub struct StatusChange {
    pub carrier: Option<String>,
    pub note: Option<String>,
}

/// Order with its line items and creator info (for detail views)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by_user: Option<UserSummary>,
}

/// Sort direction for order listings (by order date)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateSort {
    Asc,
    #[default]
    Desc,
}

/// Filters for listing orders
#[derive(Debug, Clone, Default)]
pub struct OrderListFilter {
    pub status: Option<OrderStatus>,
    /// Free-text match on marketplace order id or buyer name
    pub search: Option<String>,
    /// Inclusive `order_date` lower bound (YYYY-MM-DD)
    pub date_from: Option<String>,
    /// Inclusive `order_date` upper bound (YYYY-MM-DD)
    pub date_to: Option<String>,
    pub sort: DateSort,
}
