//! Orders lookup handler.

use axum::{extract::Query, extract::State, response::Json, Extension};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{OrderFilters, OrderResponse, OrderStatus};
use crate::errors::{AppError, AppResult};
use crate::services::shop_service::{day_end, day_start, plan_orders_from_message};
use crate::services::OrderLookupPlan;
use crate::types::ApiResponse;

/// Query parameters: free text or explicit filters
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct OrdersParams {
    /// Free-text message to extract filters from
    pub message: Option<String>,
    /// Status filter; values outside the vocabulary are ignored
    pub status: Option<String>,
    /// Inclusive window start, `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// Inclusive window end, `YYYY-MM-DD`
    pub end_date: Option<String>,
}

/// Orders payload
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrdersData {
    pub orders: Vec<OrderResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_filters: Option<OrderFilters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_only: Option<bool>,
}

/// List the caller's orders, filtered by status and/or an inclusive
/// date window taken from the message (LLM extraction plus keyword
/// fallback) or from explicit query parameters.
#[utoipa::path(
    get,
    path = "/api/app/orders",
    tag = "Shopping",
    params(OrdersParams),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Orders retrieved", body = OrdersData),
        (status = 400, description = "Invalid date parameter"),
        (status = 401, description = "Missing bearer token")
    )
)]
pub async fn get_orders(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<OrdersParams>,
) -> AppResult<Json<ApiResponse<OrdersData>>> {
    let plan = match params.message.as_deref() {
        Some(message) => plan_orders_from_message(state.nlp_service.as_ref(), message).await,
        None => OrderLookupPlan {
            filters: None,
            // Out-of-vocabulary statuses are treated as no filter
            status: params.status.as_deref().and_then(OrderStatus::parse),
            start_date: parse_day(params.start_date.as_deref(), "startDate")?.map(day_start),
            end_date: parse_day(params.end_date.as_deref(), "endDate")?.map(day_end),
            recent_only: false,
        },
    };

    let lookup = state
        .order_service
        .find_orders(user.id, &plan)
        .await
        .map_err(|e| {
            tracing::error!("get orders failed: {}", e);
            AppError::retrieval("Failed to retrieve orders")
        })?;

    Ok(Json(ApiResponse::success(
        lookup.message,
        OrdersData {
            orders: lookup.orders,
            order_filters: plan.filters,
            recent_only: plan.recent_only.then_some(true),
        },
    )))
}

/// Parse a `YYYY-MM-DD` date query parameter
fn parse_day(raw: Option<&str>, name: &str) -> AppResult<Option<NaiveDate>> {
    match raw {
        None => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                AppError::validation(format!("Invalid {} format. Use YYYY-MM-DD", name))
            }),
    }
}
