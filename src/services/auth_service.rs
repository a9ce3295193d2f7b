//! Authentication service - registration, login and token handling.
//!
//! Sessions are stateless: a signed JWT carrying the user identity,
//! valid for the configured number of days. Passwords go through the
//! domain [`Password`] value object.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{Password, User, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::infra::{NewUser, UserRepository};

/// JWT claims payload: user identity plus standard expiry fields
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    pub phone: String,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Registration input, already validated at the HTTP boundary
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub email: String,
    pub password: String,
}

/// Session returned after successful register/login
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthSession {
    pub user: UserResponse,
    /// Signed bearer token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user and open a session
    async fn register(&self, request: RegisterUser) -> AppResult<AuthSession>;

    /// Login and open a session
    async fn login(&self, email: String, password: String) -> AppResult<AuthSession>;

    /// Fetch the public record for an authenticated user
    async fn current_user(&self, user_id: Uuid) -> AppResult<UserResponse>;

    /// Verify a JWT and extract its claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Generate a signed session token for a user
fn generate_token(user: &User, config: &Config) -> AppResult<String> {
    let now = Utc::now();
    let expires_at = now + Duration::days(config.jwt_expiration_days);

    let claims = Claims {
        sub: user.id,
        phone: user.phone.clone(),
        email: user.email.clone(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?)
}

/// Concrete implementation of [`AuthService`].
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    config: Config,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserRepository>, config: Config) -> Self {
        Self { users, config }
    }

    fn session_for(&self, user: User) -> AppResult<AuthSession> {
        let token = generate_token(&user, &self.config)?;
        Ok(AuthSession {
            user: UserResponse::from(user),
            token,
        })
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, request: RegisterUser) -> AppResult<AuthSession> {
        // Uniqueness pre-check; the store's unique indexes back this up
        if self
            .users
            .find_by_phone_or_email(&request.phone, &request.email)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "User already exists with this phone or email",
            ));
        }

        let password_hash = Password::new(&request.password)?.into_string();
        let user = self
            .users
            .create(NewUser {
                name: request.name,
                phone: request.phone,
                address: request.address,
                email: request.email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "user registered");
        self.session_for(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<AuthSession> {
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::not_found("User not found. Please register first."))?;

        let stored = Password::from_hash(user.password_hash.clone());
        if !stored.verify(&password) {
            return Err(AppError::InvalidCredentials);
        }

        self.session_for(user)
    }

    async fn current_user(&self, user_id: Uuid) -> AppResult<UserResponse> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        Ok(UserResponse::from(user))
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Forbidden)?;

        Ok(token_data.claims)
    }
}
