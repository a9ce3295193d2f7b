//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppError;

/// Authenticated identity extracted from the session token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub phone: String,
    pub email: String,
}

/// JWT authentication middleware.
///
/// No bearer token at all is Unauthorized (401); a token that is
/// present but malformed or expired is Forbidden (403). On success the
/// decoded identity is injected into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let claims = state
        .auth_service
        .verify_token(token)
        .map_err(|_| AppError::Forbidden)?;

    let current_user = CurrentUser {
        id: claims.sub,
        phone: claims.phone,
        email: claims.email,
    };

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}
