//! Shopbot API - shopping-assistant chat backend
//!
//! A REST API that classifies free-text chat messages via an external
//! LLM call and answers from a deals/orders/payments catalog, with
//! JWT session auth.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and vocabularies
//! - **services**: Application use cases (auth, NLP, lookups, chat)
//! - **infra**: Infrastructure concerns (database, Groq client)
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response envelope
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Intent, OrderStatus, Password, User};
pub use errors::{AppError, AppResult};
