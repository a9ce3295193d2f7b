//! Service container - wires repositories, the LLM client and services.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{
    AuthService, Authenticator, ChatOrchestrator, ChatService, DealFinder, DealService, GroqNlp,
    NlpService, OrderFinder, OrderService, PaymentFinder, PaymentService,
};
use crate::config::Config;
use crate::infra::{DealStore, GroqClient, OrderStore, PaymentStore, UserStore};

/// All application services, constructed once at startup.
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    nlp_service: Arc<dyn NlpService>,
    deal_service: Arc<dyn DealService>,
    order_service: Arc<dyn OrderService>,
    payment_service: Arc<dyn PaymentService>,
    chat_service: Arc<dyn ChatService>,
}

impl Services {
    /// Build the full service graph from a database connection and config.
    pub fn from_connection(db: DatabaseConnection, config: Config) -> Self {
        let users = Arc::new(UserStore::new(db.clone()));
        let deals = Arc::new(DealStore::new(db.clone()));
        let orders = Arc::new(OrderStore::new(db.clone()));
        let payments = Arc::new(PaymentStore::new(db));

        let llm = Arc::new(GroqClient::from_config(&config));

        let auth_service: Arc<dyn AuthService> = Arc::new(Authenticator::new(users, config));
        let nlp_service: Arc<dyn NlpService> = Arc::new(GroqNlp::new(llm));
        let deal_service: Arc<dyn DealService> = Arc::new(DealFinder::new(deals));
        let order_service: Arc<dyn OrderService> = Arc::new(OrderFinder::new(orders));
        let payment_service: Arc<dyn PaymentService> = Arc::new(PaymentFinder::new(payments));
        let chat_service: Arc<dyn ChatService> = Arc::new(ChatOrchestrator::new(
            nlp_service.clone(),
            deal_service.clone(),
            order_service.clone(),
            payment_service.clone(),
        ));

        Self {
            auth_service,
            nlp_service,
            deal_service,
            order_service,
            payment_service,
            chat_service,
        }
    }

    pub fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    pub fn nlp(&self) -> Arc<dyn NlpService> {
        self.nlp_service.clone()
    }

    pub fn deals(&self) -> Arc<dyn DealService> {
        self.deal_service.clone()
    }

    pub fn orders(&self) -> Arc<dyn OrderService> {
        self.order_service.clone()
    }

    pub fn payments(&self) -> Arc<dyn PaymentService> {
        self.payment_service.clone()
    }

    pub fn chat(&self) -> Arc<dyn ChatService> {
        self.chat_service.clone()
    }
}
