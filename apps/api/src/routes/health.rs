use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::state::AppState;

/// GET /health
/// Pings the database. 503 when it is missing or unreachable.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let Some(pool) = state.db.as_ref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unhealthy", "database": "not configured" })),
        );
    };

    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "connected",
                "version": env!("CARGO_PKG_VERSION"),
            })),
        ),
        Err(e) => {
            warn!("Health check ping failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy", "database": "unreachable" })),
            )
        }
    }
}

/// GET /
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "Career Compass API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "auth": "/api/auth",
            "chat": "/api/chat",
        },
    }))
}
