//! Deal domain entity.
//!
//! Deals are created out-of-band and are read-only to this system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A catalog deal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deal {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Always ≥ 0
    pub price: f64,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Deal card payload for the UI carousel
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DealResponse {
    pub deal_id: Uuid,
    #[schema(example = "Wireless earbuds")]
    pub title: String,
    pub description: String,
    #[schema(example = 1499.0)]
    pub price: f64,
    #[serde(rename = "imageURL")]
    pub image_url: String,
}

impl From<Deal> for DealResponse {
    fn from(deal: Deal) -> Self {
        Self {
            deal_id: deal.id,
            title: deal.title,
            description: deal.description,
            price: deal.price,
            image_url: deal.image_url,
        }
    }
}

/// Inclusive price bounds extracted from a message or query parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
}

impl PriceRange {
    pub fn is_empty(&self) -> bool {
        self.min_price.is_none() && self.max_price.is_none()
    }
}
