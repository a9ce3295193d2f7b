//! Chat orchestrator - classify, dispatch, assemble the reply.
//!
//! Exactly two steps and no state retained across turns: the session
//! identifier is generated when absent, echoed back, and never read
//! server-side. Every action branch catches its own failure and
//! degrades to an apologetic message, so a chat request that passed
//! body validation always succeeds.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    DealResponse, Intent, OrderFilters, OrderResponse, PaymentRecord, PriceRange,
};
use crate::services::shop_service::{plan_orders_from_message, OrderLookupPlan};
use crate::services::{DealService, NlpService, OrderService, PaymentService};

/// Structured chat payload alongside the reply text
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatData {
    pub intent: Intent,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deals: Option<Vec<DealResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orders: Option<Vec<OrderResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_filters: Option<OrderFilters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payments: Option<Vec<PaymentRecord>>,
}

impl ChatData {
    fn new(intent: Intent, session_id: String) -> Self {
        Self {
            intent,
            session_id,
            deals: None,
            price_range: None,
            orders: None,
            order_filters: None,
            payments: None,
        }
    }
}

/// Assembled chat turn
#[derive(Debug)]
pub struct ChatReply {
    pub message: String,
    pub data: ChatData,
}

/// Chat service trait for dependency injection.
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Handle one chat turn for an authenticated user
    async fn respond(&self, user_id: Uuid, message: &str, session_id: Option<String>)
        -> ChatReply;
}

/// Concrete implementation of [`ChatService`].
pub struct ChatOrchestrator {
    nlp: Arc<dyn NlpService>,
    deals: Arc<dyn DealService>,
    orders: Arc<dyn OrderService>,
    payments: Arc<dyn PaymentService>,
}

impl ChatOrchestrator {
    pub fn new(
        nlp: Arc<dyn NlpService>,
        deals: Arc<dyn DealService>,
        orders: Arc<dyn OrderService>,
        payments: Arc<dyn PaymentService>,
    ) -> Self {
        Self {
            nlp,
            deals,
            orders,
            payments,
        }
    }

    async fn deals_branch(&self, message: &str, data: &mut ChatData) -> String {
        let range = self.nlp.extract_price_range(message).await;

        match self.deals.find_deals(range.unwrap_or_default()).await {
            Ok(lookup) => {
                data.deals = Some(lookup.deals);
                data.price_range = range;
                lookup.message
            }
            Err(e) => {
                tracing::error!("deals lookup failed in chat: {}", e);
                data.deals = Some(Vec::new());
                "Sorry, I couldn't fetch the deals right now. Please try again later.".to_string()
            }
        }
    }

    async fn orders_branch(&self, user_id: Uuid, message: &str, data: &mut ChatData) -> String {
        let plan: OrderLookupPlan = plan_orders_from_message(self.nlp.as_ref(), message).await;

        match self.orders.find_orders(user_id, &plan).await {
            Ok(lookup) => {
                data.orders = Some(lookup.orders);
                data.order_filters = plan.filters;
                lookup.message
            }
            Err(e) => {
                tracing::error!("orders lookup failed in chat: {}", e);
                data.orders = Some(Vec::new());
                "Sorry, I couldn't fetch your orders. Please try again later.".to_string()
            }
        }
    }

    async fn payments_branch(&self, user_id: Uuid, data: &mut ChatData) -> String {
        match self.payments.find_payments(user_id).await {
            Ok(payments) => {
                let message = render_payments_message(&payments);
                data.payments = Some(payments);
                message
            }
            Err(e) => {
                tracing::error!("payments lookup failed in chat: {}", e);
                "Sorry, I couldn't fetch your payment status. Please try again later.".to_string()
            }
        }
    }
}

#[async_trait]
impl ChatService for ChatOrchestrator {
    async fn respond(
        &self,
        user_id: Uuid,
        message: &str,
        session_id: Option<String>,
    ) -> ChatReply {
        let intent = self.nlp.classify(message).await;
        let session_id = session_id.unwrap_or_else(generate_session_id);
        tracing::debug!(%intent, %session_id, "chat turn classified");

        let mut data = ChatData::new(intent, session_id);

        let reply = match intent {
            Intent::Deals => self.deals_branch(message, &mut data).await,
            Intent::Orders => self.orders_branch(user_id, message, &mut data).await,
            Intent::Payment => self.payments_branch(user_id, &mut data).await,
            Intent::Support
            | Intent::Thanks
            | Intent::Greeting
            | Intent::Others
            | Intent::Unknown => intent.canned_reply().to_string(),
        };

        ChatReply {
            message: reply,
            data,
        }
    }
}

/// Opaque session identifier: `session_<millis>_<random>`
fn generate_session_id() -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!(
        "session_{}_{}",
        Utc::now().timestamp_millis(),
        &random[..9]
    )
}

/// Reply text for a payments lookup
fn render_payments_message(payments: &[PaymentRecord]) -> String {
    if payments.is_empty() {
        return "You don't have any payment records yet.".to_string();
    }

    let items = payments
        .iter()
        .enumerate()
        .map(|(index, payment)| {
            format!(
                "{}. Amount Paid: ${}\n  Pending Amount: ${}\n  Status: {}",
                index + 1,
                payment.amount_paid,
                payment.pending_amount,
                payment.status
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("Here are all your payment statuses:\n\n{}", items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PaymentStatus;

    #[test]
    fn session_ids_follow_the_expected_shape() {
        let id = generate_session_id();
        assert!(id.starts_with("session_"));
        assert_eq!(id.split('_').count(), 3);

        // Two consecutive ids never collide
        assert_ne!(generate_session_id(), generate_session_id());
    }

    #[test]
    fn payments_message_lists_each_record() {
        let record = PaymentRecord {
            payment_id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            order_details: None,
            amount_paid: 300.0,
            pending_amount: 200.0,
            status: PaymentStatus::Pending,
            created_at: Utc::now(),
        };

        let message = render_payments_message(&[record]);
        assert!(message.contains("1. Amount Paid: $300"));
        assert!(message.contains("Pending Amount: $200"));
        assert!(message.contains("Status: pending"));
    }

    #[test]
    fn empty_payments_message() {
        assert_eq!(
            render_payments_message(&[]),
            "You don't have any payment records yet."
        );
    }
}
