//! HTTP request handlers.

pub mod auth_handler;
pub mod chat_handler;
pub mod deals_handler;
pub mod orders_handler;
pub mod payments_handler;

pub use auth_handler::auth_routes;
