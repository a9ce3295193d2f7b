//! Deals lookup handler.

use axum::{extract::Query, extract::State, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::AppState;
use crate::domain::{DealResponse, PriceRange};
use crate::errors::{AppError, AppResult};
use crate::types::ApiResponse;

/// Query parameters: free text or explicit bounds
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DealsParams {
    /// Free-text message to extract a price range from
    pub message: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<String>,
    /// Inclusive upper price bound
    pub max_price: Option<String>,
}

/// Deals payload
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DealsData {
    pub deals: Vec<DealResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
}

/// List deals, optionally filtered by a price range taken from the
/// message (LLM extraction) or from explicit query parameters.
#[utoipa::path(
    get,
    path = "/api/app/deals",
    tag = "Shopping",
    params(DealsParams),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Deals retrieved", body = DealsData),
        (status = 400, description = "Invalid price parameter"),
        (status = 401, description = "Missing bearer token")
    )
)]
pub async fn get_deals(
    State(state): State<AppState>,
    Query(params): Query<DealsParams>,
) -> AppResult<Json<ApiResponse<DealsData>>> {
    let (range, extracted) = match params.message.as_deref() {
        Some(message) => {
            let extracted = state.nlp_service.extract_price_range(message).await;
            (extracted.unwrap_or_default(), extracted)
        }
        None => {
            let range = PriceRange {
                min_price: parse_price(params.min_price.as_deref(), "minPrice")?,
                max_price: parse_price(params.max_price.as_deref(), "maxPrice")?,
            };
            (range, None)
        }
    };

    let lookup = state.deal_service.find_deals(range).await.map_err(|e| {
        tracing::error!("get deals failed: {}", e);
        AppError::retrieval("Failed to retrieve deals")
    })?;

    Ok(Json(ApiResponse::success(
        lookup.message,
        DealsData {
            deals: lookup.deals,
            price_range: extracted,
        },
    )))
}

/// Parse a price query parameter; rejects non-numeric and negative values
fn parse_price(raw: Option<&str>, name: &str) -> AppResult<Option<f64>> {
    match raw {
        None => Ok(None),
        Some(value) => {
            let parsed: f64 = value.parse().map_err(|_| {
                AppError::validation(format!("Invalid {}. Must be a valid positive number.", name))
            })?;
            if parsed < 0.0 {
                return Err(AppError::validation(format!(
                    "Invalid {}. Must be a valid positive number.",
                    name
                )));
            }
            Ok(Some(parsed))
        }
    }
}
