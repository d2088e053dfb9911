//! Axum route handlers for the Chat API.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::chat::envelope::ResponseEnvelope;
use crate::errors::AppError;
use crate::state::AppState;

/// Both fields are optional at the JSON layer: a missing or null message is
/// rejected by the pipeline, and a user id of any other shape is anonymous.
#[derive(Debug, Deserialize)]
pub struct ChatMessageRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_id: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ChatMessageResponse {
    pub response: ResponseEnvelope,
    pub timestamp: DateTime<Utc>,
}

const STARTER_QUERIES: [&str; 5] = [
    "Find software engineer jobs in Bangalore",
    "How to prepare for a technical interview",
    "Companies with good maternity leave policies in India",
    "Salary negotiation tips for women in tech",
    "Remote work opportunities for Indian companies",
];

/// Parses the optional caller id. Anything that is not a UUID string is anonymous.
fn parse_user_id(raw: Option<&Value>) -> Option<Uuid> {
    raw.and_then(Value::as_str)
        .and_then(|id| Uuid::parse_str(id.trim()).ok())
}

/// POST /api/chat/message
pub async fn handle_message(
    State(state): State<AppState>,
    Json(request): Json<ChatMessageRequest>,
) -> Result<Json<ChatMessageResponse>, AppError> {
    let message = request.message.unwrap_or_default();
    info!("Received chat message ({} chars)", message.len());

    let user_id = parse_user_id(request.user_id.as_ref());
    let response = state.chat.process_message(&message, user_id).await?;

    Ok(Json(ChatMessageResponse {
        response,
        timestamp: Utc::now(),
    }))
}

/// GET /api/chat/test
pub async fn handle_test(State(state): State<AppState>) -> Json<Value> {
    let database_status = if state.db.is_some() {
        "connected"
    } else {
        "disconnected"
    };
    Json(json!({
        "message": "Chat service is working!",
        "mode": state.chat.mode(),
        "database_status": database_status,
        "timestamp": Utc::now(),
    }))
}

/// GET /api/chat/suggestions
pub async fn handle_suggestions() -> Json<Value> {
    Json(json!({ "suggestions": STARTER_QUERIES }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_id_accepts_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_user_id(Some(&json!(id.to_string()))), Some(id));
    }

    #[test]
    fn test_parse_user_id_treats_garbage_as_anonymous() {
        assert_eq!(parse_user_id(Some(&json!("anonymous"))), None);
        assert_eq!(parse_user_id(Some(&json!(""))), None);
        assert_eq!(parse_user_id(Some(&json!(42))), None);
        assert_eq!(parse_user_id(Some(&json!({ "id": "x" }))), None);
        assert_eq!(parse_user_id(Some(&Value::Null)), None);
        assert_eq!(parse_user_id(None), None);
    }
}
