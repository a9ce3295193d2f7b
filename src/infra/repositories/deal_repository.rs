//! Deal repository - read-only catalog access.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use super::entities::deal::{self, Entity as DealEntity};
use crate::domain::{Deal, PriceRange};
use crate::errors::{AppError, AppResult};

/// Deal repository trait for dependency injection.
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait DealRepository: Send + Sync {
    /// Deals within the (inclusive) price bounds, newest first.
    /// An empty range returns the whole catalog.
    async fn find_in_range(&self, range: PriceRange) -> AppResult<Vec<Deal>>;
}

/// SeaORM-backed implementation of [`DealRepository`]
pub struct DealStore {
    db: DatabaseConnection,
}

impl DealStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DealRepository for DealStore {
    async fn find_in_range(&self, range: PriceRange) -> AppResult<Vec<Deal>> {
        let mut query = DealEntity::find();

        if let Some(min) = range.min_price {
            query = query.filter(deal::Column::Price.gte(min));
        }
        if let Some(max) = range.max_price {
            query = query.filter(deal::Column::Price.lte(max));
        }

        let models = query
            .order_by_desc(deal::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Deal::from).collect())
    }
}
