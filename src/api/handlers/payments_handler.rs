//! Payments lookup handler.

use axum::{extract::State, response::Json, Extension};

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::PaymentRecord;
use crate::errors::{AppError, AppResult};
use crate::types::ApiResponse;

/// List the caller's payments, each joined with its order's product
/// name, image and status, newest first.
#[utoipa::path(
    get,
    path = "/api/app/payments",
    tag = "Shopping",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Payment status retrieved", body = [PaymentRecord]),
        (status = 401, description = "Missing bearer token")
    )
)]
pub async fn get_payments(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Vec<PaymentRecord>>>> {
    let payments = state
        .payment_service
        .find_payments(user.id)
        .await
        .map_err(|e| {
            tracing::error!("get payments failed: {}", e);
            AppError::retrieval("Failed to retrieve payment status")
        })?;

    Ok(Json(ApiResponse::success(
        "Payment status retrieved successfully",
        payments,
    )))
}
