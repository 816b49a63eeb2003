//! Role-gated order actions
//!
//! Every mutation goes through the same sequence: the permission projector
//! and state machine are consulted locally, and only a permitted, legal
//! request is handed to the repository.

use crate::ClientResult;
use crate::repository::OrderRepository;
use shared::order::{DraftOrder, Order, OrderStatus, PaymentReceipt, PaymentRequest};
use shared::role::{Role, View, authorize_transition};
use std::sync::Arc;

pub struct OrderActions<R> {
    repo: Arc<R>,
}

impl<R> Clone for OrderActions<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<R: OrderRepository> OrderActions<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &Arc<R> {
        &self.repo
    }

    /// Submit a draft from the order-taking view
    pub async fn submit_draft(&self, role: Role, draft: &DraftOrder) -> ClientResult<Order> {
        role.ensure_can_open(View::OrderTaking)?;
        self.repo.create_order(draft).await
    }

    /// Request `order → to` from `view`
    ///
    /// Nothing is sent when the transition is illegal or the view/role
    /// cannot request it.
    pub async fn request_transition(
        &self,
        role: Role,
        view: View,
        order: &Order,
        to: OrderStatus,
    ) -> ClientResult<Order> {
        if let Err(e) = authorize_transition(role, view, order.status, to) {
            tracing::debug!(
                order_id = %order.id,
                from = %order.status,
                to = %to,
                role = %role,
                view = %view,
                error = %e,
                "Transition rejected locally"
            );
            return Err(e.into());
        }
        let updated = self.repo.update_order_status(&order.id, to).await?;
        tracing::info!(order_id = %order.id, from = %order.status, to = %updated.status, "Order transitioned");
        Ok(updated)
    }

    /// Take payment for a ready order from the payments view
    pub async fn pay_order(
        &self,
        role: Role,
        order: &Order,
        payment: &PaymentRequest,
    ) -> ClientResult<PaymentReceipt> {
        role.ensure_can_open(View::Payments)?;
        payment.validate(order)?;
        authorize_transition(role, View::Payments, order.status, OrderStatus::Delivered)?;
        self.repo.pay_order(order, payment).await
    }
}
