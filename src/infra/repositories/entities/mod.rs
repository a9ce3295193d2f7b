//! SeaORM entity definitions
//!
//! These are database-specific models separate from domain types.

pub mod deal;
pub mod order;
pub mod payment;
pub mod user;
