//! Chat pipeline: normalise → classify → extract → dispatch → assemble.

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::chat::collaborators::Collaborators;
use crate::chat::envelope::ResponseEnvelope;
use crate::chat::extract::extract_context;
use crate::chat::intent::classify;
use crate::chat::intents::{handler_for, HandlerInput};
use crate::errors::AppError;

/// A strategy that turns one user message into a response envelope.
///
/// Carried in `AppState` as `Arc<dyn ChatResponder>`; the implementation is
/// picked once at startup from `Config::chat_mode`.
#[async_trait]
pub trait ChatResponder: Send + Sync {
    async fn process_message(
        &self,
        message: &str,
        user_id: Option<Uuid>,
    ) -> Result<ResponseEnvelope, AppError>;

    /// Short label for logs and the status endpoints.
    fn mode(&self) -> &'static str;
}

/// Rejects empty input and returns the lowercased, trimmed message.
pub fn normalize_message(message: &str) -> Result<String, AppError> {
    let normalized = message.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(AppError::Validation("Message is required".to_string()));
    }
    Ok(normalized)
}

/// The database-backed assistant.
pub struct ChatService {
    collaborators: Collaborators,
}

impl ChatService {
    pub fn new(collaborators: Collaborators) -> Self {
        Self { collaborators }
    }
}

#[async_trait]
impl ChatResponder for ChatService {
    async fn process_message(
        &self,
        message: &str,
        user_id: Option<Uuid>,
    ) -> Result<ResponseEnvelope, AppError> {
        let message = normalize_message(message)?;

        let intent = classify(&message);
        let context = extract_context(&message, self.collaborators.vocabulary.as_ref()).await;
        debug!("Classified message as {intent} with context {context:?}");

        let input = HandlerInput {
            message: &message,
            context: &context,
            user_id,
            collaborators: &self.collaborators,
        };
        let reply = handler_for(intent).handle(&input).await;

        if let Some(error) = &reply.error {
            info!("Degraded {intent} reply: {error}");
        }

        Ok(ResponseEnvelope::assemble(intent, context, reply))
    }

    fn mode(&self) -> &'static str {
        "live"
    }
}
