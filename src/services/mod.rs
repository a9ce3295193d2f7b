//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod auth_service;
mod chat_service;
pub mod container;
mod nlp_service;
pub mod shop_service;

pub use auth_service::{AuthService, AuthSession, Authenticator, Claims, RegisterUser};
pub use chat_service::{ChatData, ChatOrchestrator, ChatReply, ChatService};
pub use container::Services;
pub use nlp_service::{GroqNlp, NlpService};
pub use shop_service::{
    plan_orders_from_message, DealFinder, DealService, DealsLookup, OrderFinder, OrderLookupPlan,
    OrderService, OrdersLookup, PaymentFinder, PaymentService,
};
