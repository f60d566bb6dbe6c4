//! Status Policy
//!
//! Single source of truth for "who can push this order forward". Pure
//! functions only - no storage access, no side effects. Both the transition
//! engine and the scan gateway consult this module, so the role rules live
//! in exactly one place.

use crate::db::models::{OrderStatus, UserRole};

/// The forward-only staff flow, in order. `CANCELLED` is not part of the
/// flow; it is only reachable through an admin override.
pub const STATUS_FLOW: [OrderStatus; 5] = [
    OrderStatus::Created,
    OrderStatus::ReceivedByWarehouse,
    OrderStatus::Packing,
    OrderStatus::Shipped,
    OrderStatus::Done,
];

/// Whether `role` may advance an order currently at `status` by one step.
///
/// Admin is deliberately not governed here: admins assign statuses directly
/// through the engine's corrective path and never take the one-step flow.
pub fn can_advance(role: UserRole, status: OrderStatus) -> bool {
    if status == OrderStatus::Cancelled {
        return false;
    }

    match role {
        UserRole::Warehouse => status == OrderStatus::Created,
        UserRole::Packing => status == OrderStatus::ReceivedByWarehouse,
        UserRole::Admin => false,
    }
}

/// The status immediately following `status` in the flow, or `None` when
/// the order is at the last flow step or cancelled.
pub fn next_status(status: OrderStatus) -> Option<OrderStatus> {
    let idx = STATUS_FLOW.iter().position(|s| *s == status)?;
    STATUS_FLOW.get(idx + 1).copied()
}

/// Advisory for a warehouse actor looking at an order that has moved past
/// them. Purely informational: it distinguishes "not found" from "found but
/// no longer yours to touch" on the scan screen.
pub fn warehouse_advisory(role: UserRole, status: OrderStatus) -> Option<String> {
    if role == UserRole::Warehouse && status != OrderStatus::Created {
        Some("This order has already been processed by the warehouse".to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROLES: [UserRole; 3] = [UserRole::Admin, UserRole::Warehouse, UserRole::Packing];

    const STATUSES: [OrderStatus; 6] = [
        OrderStatus::Created,
        OrderStatus::ReceivedByWarehouse,
        OrderStatus::Packing,
        OrderStatus::Shipped,
        OrderStatus::Done,
        OrderStatus::Cancelled,
    ];

    #[test]
    fn can_advance_matches_table_for_all_role_status_pairs() {
        // Full 3 roles × 6 statuses table; warehouse acts only on CREATED,
        // packing only on RECEIVED_BY_WAREHOUSE, admin never via this path.
        for role in ROLES {
            for status in STATUSES {
                let expected = match (role, status) {
                    (UserRole::Warehouse, OrderStatus::Created) => true,
                    (UserRole::Packing, OrderStatus::ReceivedByWarehouse) => true,
                    _ => false,
                };
                assert_eq!(
                    can_advance(role, status),
                    expected,
                    "can_advance({role}, {status})"
                );
            }
        }
    }

    #[test]
    fn next_status_walks_the_full_flow() {
        assert_eq!(
            next_status(OrderStatus::Created),
            Some(OrderStatus::ReceivedByWarehouse)
        );
        assert_eq!(
            next_status(OrderStatus::ReceivedByWarehouse),
            Some(OrderStatus::Packing)
        );
        assert_eq!(next_status(OrderStatus::Packing), Some(OrderStatus::Shipped));
        assert_eq!(next_status(OrderStatus::Shipped), Some(OrderStatus::Done));
        assert_eq!(next_status(OrderStatus::Done), None);
        assert_eq!(next_status(OrderStatus::Cancelled), None);
    }

    #[test]
    fn warehouse_advisory_only_past_created() {
        assert!(warehouse_advisory(UserRole::Warehouse, OrderStatus::Created).is_none());
        assert!(
            warehouse_advisory(UserRole::Warehouse, OrderStatus::ReceivedByWarehouse).is_some()
        );
        assert!(warehouse_advisory(UserRole::Warehouse, OrderStatus::Cancelled).is_some());
        assert!(warehouse_advisory(UserRole::Packing, OrderStatus::Shipped).is_none());
        assert!(warehouse_advisory(UserRole::Admin, OrderStatus::Shipped).is_none());
    }
}
