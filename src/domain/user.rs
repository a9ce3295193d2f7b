//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// User domain entity.
///
/// The only entity this system mutates, and only via registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Unique across all users
    pub phone: String,
    pub address: String,
    /// Unique across all users
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user record
    pub fn new(
        id: Uuid,
        name: String,
        phone: String,
        address: String,
        email: String,
        password_hash: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            phone,
            address,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Public user record (safe to return to client, password omitted)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub user_id: Uuid,
    /// User display name
    #[schema(example = "Asha Rao")]
    pub name: String,
    /// Phone number
    #[schema(example = "+91-9876543210")]
    pub phone: String,
    /// Delivery address
    #[schema(example = "12 MG Road, Bengaluru")]
    pub address: String,
    /// Email address
    #[schema(example = "asha@example.com")]
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            name: user.name,
            phone: user.phone,
            address: user.address,
            email: user.email,
        }
    }
}
