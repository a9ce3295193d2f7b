//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connection and repositories
//! - The Groq completion client

pub mod db;
pub mod llm;
pub mod repositories;

pub use db::{Database, Migrator};
pub use llm::{ChatPrompt, GroqClient, LlmClient, LlmError};
pub use repositories::{
    DealRepository, DealStore, NewUser, OrderQuery, OrderRepository, OrderStore,
    PaymentRepository, PaymentStore, UserRepository, UserStore,
};

#[cfg(feature = "test-utils")]
pub use llm::MockLlmClient;
#[cfg(feature = "test-utils")]
pub use repositories::{
    MockDealRepository, MockOrderRepository, MockPaymentRepository, MockUserRepository,
};
