//! Authentication handlers.

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::AppResult;
use crate::services::{AuthSession, RegisterUser};
use crate::types::ApiResponse;

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// User display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Asha Rao")]
    pub name: String,
    /// Phone number (unique)
    #[validate(length(min = 1, message = "Phone is required"))]
    #[schema(example = "+91-9876543210")]
    pub phone: String,
    /// Delivery address
    #[validate(length(min = 1, message = "Address is required"))]
    #[schema(example = "12 MG Road, Bengaluru")]
    pub address: String,
    /// Email address (unique)
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "asha@example.com")]
    pub email: String,
    /// Password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "asha@example.com")]
    pub email: String,
    /// Password
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Create authentication routes. Register and login are public;
/// `/me` requires a bearer token.
pub fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(
            Router::new()
                .route("/me", get(me))
                .route_layer(middleware::from_fn_with_state(state, auth_middleware)),
        )
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthSession),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Phone or email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthSession>>)> {
    let session = state
        .auth_service
        .register(RegisterUser {
            name: payload.name,
            phone: payload.phone,
            address: payload.address,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("User registered successfully", session)),
    ))
}

/// Login and open a session
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthSession),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid password"),
        (status = 404, description = "No account for this email")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthSession>>> {
    let session = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(ApiResponse::success("Login successful", session)))
}

/// Get the authenticated user's record
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User data retrieved successfully", body = UserResponse),
        (status = 401, description = "Missing bearer token"),
        (status = 403, description = "Invalid or expired token")
    )
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let record = state.auth_service.current_user(user.id).await?;

    Ok(Json(ApiResponse::success(
        "User data retrieved successfully",
        record,
    )))
}
