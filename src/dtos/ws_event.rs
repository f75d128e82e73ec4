//! WebSocket Event DTOs - Frame scambiati sul canale real-time
//!
//! Tagged union sul campo `type`. L'unico tipo definito è `CHAT`:
//! { "type": "CHAT", "roomId": 1, "messageId": 10, "senderUserId": 3, ... }
//! Qualsiasi altro valore di `type` viene decodificato come `Unknown` e scartato.

use crate::entities::{MessageId, UiMessage};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Frame in arrivo dal server
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum InboundFrame {
    #[serde(rename = "CHAT")]
    Chat(ChatFrame),
    #[serde(other)]
    Unknown,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatFrame {
    pub room_id: Option<i64>,
    pub message_id: Option<i64>,
    pub sender_user_id: Option<i64>,
    pub sender_name: Option<String>,
    pub content: String,
    pub created_at: Option<String>,
}

impl ChatFrame {
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

/// Frame inviato dal client: `{ "type": "CHAT", "content": "..." }`
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum OutboundFrame {
    #[serde(rename = "CHAT")]
    Chat { content: String },
}

/// Motivo per cui un frame in arrivo non produce un messaggio
#[derive(Debug)]
pub enum FrameRejection {
    /// Testo non JSON o campi obbligatori mancanti
    Malformed(serde_json::Error),
    /// Discriminante `type` diverso da `CHAT`
    UnknownKind,
    /// Frame `CHAT` indirizzato ad un'altra stanza
    ForeignRoom { expected: i64, actual: i64 },
}

impl fmt::Display for FrameRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameRejection::Malformed(e) => write!(f, "malformed frame: {e}"),
            FrameRejection::UnknownKind => f.write_str("unknown frame kind"),
            FrameRejection::ForeignRoom { expected, actual } => {
                write!(f, "frame for room {actual} received on room {expected}")
            }
        }
    }
}

/// Decodifica e valida un frame testuale ricevuto sulla connessione della stanza `room_id`
pub fn decode_chat_frame(text: &str, room_id: i64) -> Result<ChatFrame, FrameRejection> {
    match serde_json::from_str::<InboundFrame>(text).map_err(FrameRejection::Malformed)? {
        InboundFrame::Chat(frame) => match frame.room_id {
            Some(actual) if actual != room_id => Err(FrameRejection::ForeignRoom {
                expected: room_id,
                actual,
            }),
            _ => Ok(frame),
        },
        InboundFrame::Unknown => Err(FrameRejection::UnknownKind),
    }
}
