//! Order repository - read-only order history access.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use super::entities::order::{self, Entity as OrderEntity};
use crate::domain::{Order, OrderStatus};
use crate::errors::{AppError, AppResult};

/// Resolved order query: always scoped to one user, with optional
/// status and an inclusive creation-time window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderQuery {
    pub user_id: Uuid,
    pub status: Option<OrderStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Cap the result at the single most recent order
    pub recent_only: bool,
}

impl OrderQuery {
    /// Unfiltered history for a user
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id,
            status: None,
            start_date: None,
            end_date: None,
            recent_only: false,
        }
    }
}

/// Order repository trait for dependency injection.
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Orders matching the query, newest first
    async fn find_filtered(&self, query: OrderQuery) -> AppResult<Vec<Order>>;
}

/// SeaORM-backed implementation of [`OrderRepository`]
pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn find_filtered(&self, query: OrderQuery) -> AppResult<Vec<Order>> {
        let mut select = OrderEntity::find().filter(order::Column::UserId.eq(query.user_id));

        if let Some(status) = query.status {
            select = select.filter(order::Column::Status.eq(status.as_str()));
        }
        if let Some(start) = query.start_date {
            select = select.filter(order::Column::CreatedAt.gte(start));
        }
        if let Some(end) = query.end_date {
            select = select.filter(order::Column::CreatedAt.lte(end));
        }

        select = select.order_by_desc(order::Column::CreatedAt);
        if query.recent_only {
            select = select.limit(1);
        }

        let models = select.all(&self.db).await.map_err(AppError::from)?;

        Ok(models.into_iter().map(Order::from).collect())
    }
}
