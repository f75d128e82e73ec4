//! MessageRepository - Repository REST per lo storico e l'invio di fallback

use super::HttpClient;
use crate::core::AppError;
use crate::dtos::{MessageDTO, MessagesQuery, SendMessageDTO};
use reqwest::Method;
use tracing::{debug, info, instrument};
use validator::Validate;

// MESSAGE REPO
#[derive(Clone, Debug)]
pub struct MessageRepository {
    http: HttpClient,
}

impl MessageRepository {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Get the most recent messages of a room
    ///
    /// # Arguments
    /// * `room_id` - The room ID
    /// * `limit` - Maximum number of messages to return
    ///
    /// # Returns
    /// Messages in the order provided by the server (chronological)
    #[instrument(skip(self))]
    pub async fn recent_messages(&self, room_id: i64, limit: u32) -> Result<Vec<MessageDTO>, AppError> {
        let messages: Vec<MessageDTO> = self
            .http
            .get_json(&format!("/chats/{room_id}/messages"), &MessagesQuery { limit })
            .await?;
        debug!(count = messages.len(), "History fetched");
        Ok(messages)
    }

    /// Fallback send over plain HTTP, used when the real-time channel is not available
    #[instrument(skip(self, content))]
    pub async fn send_message(&self, room_id: i64, content: &str) -> Result<Option<MessageDTO>, AppError> {
        let body = SendMessageDTO {
            content: content.to_string(),
        };
        body.validate()?;

        let created = self
            .http
            .send_json(Method::POST, &format!("/chats/{room_id}/messages"), &body)
            .await?;
        info!("Message sent over HTTP");
        Ok(created)
    }
}
