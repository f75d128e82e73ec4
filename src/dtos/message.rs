//! Message DTOs - Data Transfer Objects per messaggi

use crate::entities::{MessageId, UiMessage};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Messaggio dello storico restituito da `GET /chats/{roomId}/messages`
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MessageDTO {
    pub message_id: Option<i64>,
    pub sender_user_id: Option<i64>,
    pub sender_name: Option<String>,
    pub content: String,
    pub created_at: Option<String>,
}

impl MessageDTO {
    /// Normalizza il messaggio per la UI marcandolo come proprio se il mittente
    /// coincide con l'identità locale
    pub fn into_ui_message(self, identity: Option<i64>) -> UiMessage {
        UiMessage::new(
            MessageId::from_server(self.message_id),
            self.sender_user_id,
            self.sender_name.unwrap_or_default(),
            self.content,
            self.created_at.as_deref(),
            identity,
        )
    }
}

/// Body di `POST /chats/{roomId}/messages`
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct SendMessageDTO {
    #[validate(length(min = 1, max = 5000, message = "Message content must be between 1 and 5000 characters"))]
    pub content: String,
}
