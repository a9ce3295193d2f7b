//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services from axum
//! handlers and middleware.

use std::sync::Arc;

use crate::infra::Database;
use crate::services::{
    AuthService, ChatService, DealService, NlpService, OrderService, PaymentService, Services,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub nlp_service: Arc<dyn NlpService>,
    pub deal_service: Arc<dyn DealService>,
    pub order_service: Arc<dyn OrderService>,
    pub payment_service: Arc<dyn PaymentService>,
    pub chat_service: Arc<dyn ChatService>,
    /// Database handle, kept for the health probe
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from a database connection and config.
    pub fn from_config(database: Arc<Database>, config: crate::config::Config) -> Self {
        let services = Services::from_connection(database.get_connection(), config);

        Self {
            auth_service: services.auth(),
            nlp_service: services.nlp(),
            deal_service: services.deals(),
            order_service: services.orders(),
            payment_service: services.payments(),
            chat_service: services.chat(),
            database,
        }
    }

    /// Create application state with manually injected services (tests).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        nlp_service: Arc<dyn NlpService>,
        deal_service: Arc<dyn DealService>,
        order_service: Arc<dyn OrderService>,
        payment_service: Arc<dyn PaymentService>,
        chat_service: Arc<dyn ChatService>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service,
            nlp_service,
            deal_service,
            order_service,
            payment_service,
            chat_service,
            database,
        }
    }
}
