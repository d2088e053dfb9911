pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::chat::handlers as chat;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Accounts API
        .route("/api/auth/register", post(auth::handle_register))
        .route("/api/auth/login", post(auth::handle_login))
        .route(
            "/api/auth/profile",
            get(auth::handle_get_profile).put(auth::handle_update_profile),
        )
        .route("/api/auth/test-db", get(auth::handle_test_db))
        // Chat API
        .route("/api/chat/message", post(chat::handle_message))
        .route("/api/chat/test", get(chat::handle_test))
        .route("/api/chat/suggestions", get(chat::handle_suggestions))
        .with_state(state)
}
