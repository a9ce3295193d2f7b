//! Repository layer - Data access abstraction
//!
//! One repository per collection, each behind a trait so services can
//! be tested against mocks.

pub(crate) mod entities;

mod deal_repository;
mod order_repository;
mod payment_repository;
mod user_repository;

pub use deal_repository::{DealRepository, DealStore};
pub use order_repository::{OrderQuery, OrderRepository, OrderStore};
pub use payment_repository::{PaymentRepository, PaymentStore};
pub use user_repository::{NewUser, UserRepository, UserStore};

// Export mocks for tests
#[cfg(feature = "test-utils")]
pub use deal_repository::MockDealRepository;
#[cfg(feature = "test-utils")]
pub use order_repository::MockOrderRepository;
#[cfg(feature = "test-utils")]
pub use payment_repository::MockPaymentRepository;
#[cfg(feature = "test-utils")]
pub use user_repository::MockUserRepository;
