//! Accounts: password hashing, signed access tokens and the bearer extractor.

pub mod handlers;
pub mod password;
pub mod token;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// The caller's user id, taken from an `Authorization: Bearer <token>` header.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;
        let token = bearer_token(header)
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;
        Ok(AuthUser(state.tokens.verify(token)?))
    }
}

fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
