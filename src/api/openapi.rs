//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, chat_handler, deals_handler, orders_handler, payments_handler,
};
use crate::domain::{
    DealResponse, Intent, OrderFilters, OrderResponse, OrderStatus, PaymentOrderDetails,
    PaymentRecord, PaymentStatus, PriceRange, UserResponse,
};
use crate::services::{AuthSession, ChatData};

/// OpenAPI documentation for the shopping-assistant chat API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shopbot API",
        version = "0.1.0",
        description = "Shopping-assistant chat API: LLM intent detection over a deals, orders and payments catalog",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::me,
        // Chat + shopping endpoints
        chat_handler::chat,
        deals_handler::get_deals,
        orders_handler::get_orders,
        payments_handler::get_payments,
    ),
    components(
        schemas(
            // Domain types
            UserResponse,
            DealResponse,
            PriceRange,
            OrderResponse,
            OrderStatus,
            OrderFilters,
            PaymentRecord,
            PaymentOrderDetails,
            PaymentStatus,
            Intent,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            AuthSession,
            // Chat + shopping types
            chat_handler::ChatRequest,
            ChatData,
            deals_handler::DealsData,
            orders_handler::OrdersData,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Chat", description = "Conversational entry point"),
        (name = "Shopping", description = "Deals, orders and payment lookups")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
