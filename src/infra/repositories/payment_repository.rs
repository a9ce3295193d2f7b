//! Payment repository - read-only, always joined to the owning order.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::entities::{order, payment};
use crate::domain::{Order, Payment};
use crate::errors::{AppError, AppResult};

/// Payment repository trait for dependency injection.
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Payments for the given user's orders, newest first, each with
    /// its order attached when the reference resolves.
    async fn find_for_user(&self, user_id: Uuid) -> AppResult<Vec<(Payment, Option<Order>)>>;
}

/// SeaORM-backed implementation of [`PaymentRepository`]
pub struct PaymentStore {
    db: DatabaseConnection,
}

impl PaymentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PaymentRepository for PaymentStore {
    async fn find_for_user(&self, user_id: Uuid) -> AppResult<Vec<(Payment, Option<Order>)>> {
        let rows = payment::Entity::find()
            .find_also_related(order::Entity)
            .filter(order::Column::UserId.eq(user_id))
            .order_by_desc(payment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .into_iter()
            .map(|(p, o)| (Payment::from(p), o.map(Order::from)))
            .collect())
    }
}
