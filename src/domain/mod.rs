//! Domain layer - Core business entities and logic
//!
//! Contains the entities, value objects and vocabularies the rest of
//! the application is built around, independent of infrastructure.

pub mod deal;
pub mod intent;
pub mod order;
pub mod password;
pub mod payment;
pub mod user;

pub use deal::{Deal, DealResponse, PriceRange};
pub use intent::Intent;
pub use order::{Order, OrderFilters, OrderResponse, OrderStatus};
pub use password::Password;
pub use payment::{Payment, PaymentOrderDetails, PaymentRecord, PaymentStatus};
pub use user::{User, UserResponse};
