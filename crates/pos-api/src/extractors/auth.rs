//! `AuthUser` extractor: pulls the bearer token from the Authorization
//! header and validates it through the auth service.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use pos_auth::AuthenticatedUser;
use pos_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated identity available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthenticatedUser);

impl std::ops::Deref for AuthUser {
    type Target = AuthenticatedUser;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let ctx = state.request_context();
        let authenticated = state.auth.validate_token(&ctx, token).await?;
        Ok(Self(authenticated))
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::token_malformed("Missing Authorization header"))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::token_malformed("Invalid Authorization header format"))
}
