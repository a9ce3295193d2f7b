//! Application route configuration.

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    auth_routes, chat_handler::chat, deals_handler::get_deals, orders_handler::get_orders,
    payments_handler::get_payments,
};
use super::middleware::auth_middleware;
use super::openapi::ApiDoc;
use super::AppState;
use crate::types::ApiResponse;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    // Everything under /api/app requires a bearer token
    let app_routes = Router::new()
        .route("/chat", post(chat))
        .route("/deals", get(get_deals))
        .route("/orders", get(get_orders))
        .route("/payments", get(get_payments))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/auth", auth_routes(state.clone()))
        .nest("/api/app", app_routes)
        // Global middleware: request tracing + permissive CORS for the
        // browser front end
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Root endpoint - service banner
async fn root() -> Json<ApiResponse<()>> {
    Json(ApiResponse::message("Chatbot API Server is running"))
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: DatabaseHealth,
}

#[derive(Serialize)]
struct DatabaseHealth {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint with database connectivity probe
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (database, status_code, status) = match state.database.ping().await {
        Ok(_) => (
            DatabaseHealth {
                status: "healthy",
                error: None,
            },
            StatusCode::OK,
            "healthy",
        ),
        Err(e) => (
            DatabaseHealth {
                status: "unhealthy",
                error: Some(e.to_string()),
            },
            StatusCode::SERVICE_UNAVAILABLE,
            "degraded",
        ),
    };

    (status_code, Json(HealthResponse { status, database }))
}
