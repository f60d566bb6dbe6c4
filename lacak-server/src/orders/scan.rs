//! Lookup Gateway - barcode and tracking-number entry points
//!
//! The read path (`inspect*`) resolves a scanned code into an order plus an
//! actionable decision without mutating anything; the mutate path
//! (`process*`) performs the gated transition.
//!
//! The tracking-number variant is an admin-only shortcut for orders whose
//! warehouse-receipt scan was skipped: it forces the order to PACKING from
//! either CREATED or RECEIVED_BY_WAREHOUSE instead of following the
//! one-step flow. That bypass is intentional and confined to this module.

use serde::Serialize;

use crate::db::models::{OrderStatus, OrderWithItems, StatusChange, UserRole};

use super::engine::TransitionEngine;
use super::error::{OrderError, OrderResult};
use super::policy;
use super::store::OrderStore;

/// Result of inspecting a scanned code: the order, whether the acting role
/// may process it, what the next status would be, and an optional advisory.
#[derive(Debug, Clone, Serialize)]
pub struct ScanInspection {
    #[serde(flatten)]
    pub order: OrderWithItems,
    pub can_process: bool,
    pub next_status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<String>,
}

/// Scan-driven lookup and processing over an [`OrderStore`]
#[derive(Clone)]
pub struct ScanService<S> {
    engine: TransitionEngine<S>,
}

impl<S: OrderStore> ScanService<S> {
    pub fn new(store: S) -> Self {
        Self {
            engine: TransitionEngine::new(store),
        }
    }

    /// Resolve a scan token without mutating. The advisory tells a
    /// warehouse actor that the order has already moved past them.
    pub async fn inspect(&self, token: &str, role: UserRole) -> OrderResult<ScanInspection> {
        let order = self
            .engine
            .store()
            .find_by_token(token)
            .await?
            .ok_or_else(|| OrderError::NotFound("Order not found".to_string()))?;

        let can_process = policy::can_advance(role, order.order.status);
        let next_status = if can_process {
            policy::next_status(order.order.status)
        } else {
            None
        };
        let advisory = policy::warehouse_advisory(role, order.order.status);

        Ok(ScanInspection {
            can_process,
            next_status,
            advisory,
            order,
        })
    }

    /// Advance the order behind `token` exactly one step. The canonical
    /// scan-to-process action for warehouse and packing staff.
    pub async fn process(&self, token: &str, role: UserRole) -> OrderResult<OrderWithItems> {
        self.engine.advance_by_token(token, role).await
    }

    /// Resolve an order by tracking number (admin only), read path.
    pub async fn inspect_by_tracking_number(
        &self,
        tracking_number: &str,
        role: UserRole,
    ) -> OrderResult<ScanInspection> {
        let order = self.find_for_tracking_flow(tracking_number, role).await?;
        check_packing_allowed(order.order.status)?;

        Ok(ScanInspection {
            can_process: true,
            next_status: Some(OrderStatus::Packing),
            advisory: None,
            order,
        })
    }

    /// Force the order behind `tracking_number` to PACKING (admin only).
    pub async fn process_by_tracking_number(
        &self,
        tracking_number: &str,
        role: UserRole,
    ) -> OrderResult<OrderWithItems> {
        let order = self.find_for_tracking_flow(tracking_number, role).await?;
        check_packing_allowed(order.order.status)?;

        match self
            .engine
            .store()
            .advance_status(
                order.order.id,
                order.order.status,
                OrderStatus::Packing,
                StatusChange::default(),
            )
            .await?
        {
            Some(updated) => Ok(updated),
            // A concurrent writer changed the status between read and write.
            // At-most-one-attempt semantics: report, let the admin rescan.
            None => {
                let current = self
                    .engine
                    .store()
                    .find_by_id(order.order.id)
                    .await?
                    .ok_or_else(|| OrderError::NotFound("Order not found".to_string()))?;
                check_packing_allowed(current.order.status)?;
                Err(OrderError::InvalidState(
                    "Order status changed while processing; scan the tracking number again"
                        .to_string(),
                ))
            }
        }
    }

    async fn find_for_tracking_flow(
        &self,
        tracking_number: &str,
        role: UserRole,
    ) -> OrderResult<OrderWithItems> {
        if role != UserRole::Admin {
            return Err(OrderError::AdminOnly);
        }

        let tracking_number = tracking_number.trim();
        if tracking_number.is_empty() {
            return Err(OrderError::Validation(
                "tracking number must not be empty".to_string(),
            ));
        }

        self.engine
            .store()
            .find_by_tracking_number(tracking_number)
            .await?
            .ok_or_else(|| {
                OrderError::NotFound(format!("Tracking number '{tracking_number}' not found"))
            })
    }
}

/// Business rule for the tracking-number flow: cancelled orders are never
/// processed, and packing cannot be re-entered from a later status.
fn check_packing_allowed(status: OrderStatus) -> OrderResult<()> {
    match status {
        OrderStatus::Cancelled => Err(OrderError::InvalidState(
            "Cannot process a cancelled order".to_string(),
        )),
        OrderStatus::Packing | OrderStatus::Shipped | OrderStatus::Done => {
            Err(OrderError::InvalidState(format!(
                "Cannot re-enter packing from status {status}"
            )))
        }
        OrderStatus::Created | OrderStatus::ReceivedByWarehouse => Ok(()),
    }
}
