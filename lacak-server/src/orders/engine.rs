//! Transition Engine
//!
//! The only entry point for changing an order's status. Staff roles follow
//! the one-step policy; admin assigns statuses directly and is the trust
//! boundary of the whole system, so that path is deliberately unrestricted
//! (including reviving a cancelled order).

use crate::db::models::{Order, OrderStatus, OrderWithItems, StatusChange, UserRole};

use super::error::{OrderError, OrderResult};
use super::policy;
use super::store::OrderStore;

/// Role-gated status transition engine over an [`OrderStore`]
#[derive(Clone)]
pub struct TransitionEngine<S> {
    store: S,
}

impl<S: OrderStore> TransitionEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Change an order's status on behalf of `role`.
    ///
    /// Admin: `requested` is applied as-is, from any state. Other roles:
    /// the order must be at the one status the role may act on, and
    /// `requested` (when supplied) must equal the computed next step.
    pub async fn advance(
        &self,
        order_id: i64,
        role: UserRole,
        requested: Option<OrderStatus>,
        extra: StatusChange,
    ) -> OrderResult<OrderWithItems> {
        let order = self
            .store
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("Order {order_id} not found")))?;

        if role == UserRole::Admin {
            let target = requested
                .ok_or_else(|| OrderError::Validation("status is required".to_string()))?;
            return self.store.update_status(order.order.id, target, extra).await;
        }

        self.advance_one_step(order.order, role, requested, extra)
            .await
    }

    /// Scan-driven advance: resolve by token, then move exactly one step.
    /// No caller-supplied target status is accepted on this path.
    pub async fn advance_by_token(
        &self,
        token: &str,
        role: UserRole,
    ) -> OrderResult<OrderWithItems> {
        let order = self
            .store
            .find_by_token(token)
            .await?
            .ok_or_else(|| OrderError::NotFound("Order not found".to_string()))?;

        self.advance_one_step(order.order, role, None, StatusChange::default())
            .await
    }

    async fn advance_one_step(
        &self,
        order: Order,
        role: UserRole,
        requested: Option<OrderStatus>,
        extra: StatusChange,
    ) -> OrderResult<OrderWithItems> {
        if !policy::can_advance(role, order.status) {
            return Err(OrderError::Forbidden {
                role,
                status: order.status,
                advisory: policy::warehouse_advisory(role, order.status),
            });
        }

        // can_advance never passes for a status without a successor
        let next = policy::next_status(order.status).ok_or_else(|| {
            OrderError::InvalidState(format!("Order status {} is final", order.status))
        })?;

        if let Some(req) = requested
            && req != next
        {
            return Err(OrderError::InvalidTransition {
                requested: req,
                expected: next,
            });
        }

        match self
            .store
            .advance_status(order.id, order.status, next, extra)
            .await?
        {
            Some(updated) => Ok(updated),
            // Lost the race against a concurrent scan; report against the
            // status that actually won.
            None => {
                let current = self
                    .store
                    .find_by_id(order.id)
                    .await?
                    .ok_or_else(|| OrderError::NotFound(format!("Order {} not found", order.id)))?;
                Err(OrderError::Forbidden {
                    role,
                    status: current.order.status,
                    advisory: policy::warehouse_advisory(role, current.order.status),
                })
            }
        }
    }
}
