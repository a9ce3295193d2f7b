//! Payment domain entity.
//!
//! Payments reference an order and carry paid/pending amounts; the
//! status is derived, never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::order::{Order, OrderStatus};

/// A payment against an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub order_id: Uuid,
    /// Always ≥ 0
    pub amount_paid: f64,
    /// Always ≥ 0
    pub pending_amount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Derived status: completed once nothing is left pending
    pub fn derived_status(&self) -> PaymentStatus {
        if self.pending_amount > 0.0 {
            PaymentStatus::Pending
        } else {
            PaymentStatus::Completed
        }
    }

    /// Total order value
    pub fn total(&self) -> f64 {
        self.amount_paid + self.pending_amount
    }
}

/// Derived payment state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Order fields embedded in a payment record
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrderDetails {
    pub product_name: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    pub status: OrderStatus,
}

/// Payment card payload joined with its order
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub payment_id: Uuid,
    pub order_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_details: Option<PaymentOrderDetails>,
    pub amount_paid: f64,
    pub pending_amount: f64,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl PaymentRecord {
    /// Assemble the wire record from a payment and its (optional) order
    pub fn from_join(payment: Payment, order: Option<Order>) -> Self {
        let status = payment.derived_status();
        Self {
            payment_id: payment.id,
            order_id: payment.order_id,
            order_details: order.map(|o| PaymentOrderDetails {
                product_name: o.product_name,
                image_url: o.image_url,
                status: o.status,
            }),
            amount_paid: payment.amount_paid,
            pending_amount: payment.pending_amount,
            status,
            created_at: payment.created_at,
        }
    }
}
