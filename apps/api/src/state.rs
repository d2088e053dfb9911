use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::token::TokenIssuer;
use crate::chat::service::ChatResponder;
use crate::errors::AppError;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no database is configured or it was unreachable at startup.
    pub db: Option<PgPool>,
    pub tokens: TokenIssuer,
    /// Live pipeline or keyword fallback, chosen from `CHAT_MODE`.
    pub chat: Arc<dyn ChatResponder>,
}

impl AppState {
    /// The pool, or a 503 for routes that cannot work without one.
    pub fn pool(&self) -> Result<&PgPool, AppError> {
        self.db.as_ref().ok_or_else(AppError::database_unavailable)
    }
}
