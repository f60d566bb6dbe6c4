//! Order error taxonomy
//!
//! Every failure the order core can produce, as typed values. The core never
//! logs and never retries; callers map these onto HTTP responses.

use thiserror::Error;

use crate::db::models::{OrderStatus, UserRole};

/// Result type for order store / engine / scan operations
pub type OrderResult<T> = Result<T, OrderError>;

/// Order core errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The marketplace order id is already taken. Carries the conflicting
    /// order's buyer and status when the conflict was seen before insert;
    /// a constraint race detected by the store arrives without them.
    #[error(
        "Marketplace order id '{marketplace_order_id}' is already registered{}",
        conflict_detail(.buyer_name, .status)
    )]
    DuplicateMarketplaceOrderId {
        marketplace_order_id: String,
        buyer_name: Option<String>,
        status: Option<OrderStatus>,
    },

    #[error("Tracking number '{tracking_number}' is already registered to another order")]
    DuplicateTrackingNumber { tracking_number: String },

    /// The actor's role cannot act on the order's current status
    #[error(
        "Role '{role}' cannot process an order with status {status}{}",
        advisory_detail(.advisory)
    )]
    Forbidden {
        role: UserRole,
        status: OrderStatus,
        advisory: Option<String>,
    },

    /// Tracking-number flow is restricted to admins
    #[error("Only an admin may process orders by tracking number")]
    AdminOnly,

    /// Caller-requested status does not match the computed next step
    #[error("Requested status {requested} is not the next step ({expected}) for this order")]
    InvalidTransition {
        requested: OrderStatus,
        expected: OrderStatus,
    },

    /// Terminal or bypassed-state rule violation (tracking-number flow)
    #[error("{0}")]
    InvalidState(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::Database(err.to_string())
    }
}

fn conflict_detail(buyer_name: &Option<String>, status: &Option<OrderStatus>) -> String {
    match (buyer_name, status) {
        (Some(buyer), Some(status)) => format!(" to buyer '{buyer}' (status {status})"),
        (Some(buyer), None) => format!(" to buyer '{buyer}'"),
        _ => String::new(),
    }
}

fn advisory_detail(advisory: &Option<String>) -> String {
    match advisory {
        Some(msg) => format!(" ({msg})"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_message_carries_conflict_detail() {
        let err = OrderError::DuplicateMarketplaceOrderId {
            marketplace_order_id: "INV-123".into(),
            buyer_name: Some("Budi".into()),
            status: Some(OrderStatus::Packing),
        };
        let msg = err.to_string();
        assert!(msg.contains("INV-123"));
        assert!(msg.contains("Budi"));
        assert!(msg.contains("PACKING"));
    }

    #[test]
    fn forbidden_message_includes_advisory() {
        let err = OrderError::Forbidden {
            role: UserRole::Warehouse,
            status: OrderStatus::Shipped,
            advisory: Some("This order has already been processed by the warehouse".into()),
        };
        let msg = err.to_string();
        assert!(msg.contains("warehouse"));
        assert!(msg.contains("SHIPPED"));
        assert!(msg.contains("already been processed"));
    }
}
