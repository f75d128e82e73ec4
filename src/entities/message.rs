//! Message entity - Riga di chat normalizzata per la visualizzazione

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use std::fmt;
use uuid::Uuid;

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Identificativo del messaggio: assegnato dal server oppure sintetizzato
/// localmente quando il frame real-time ne è privo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageId {
    Server(i64),
    Local(Uuid),
}

impl MessageId {
    pub fn from_server(id: Option<i64>) -> Self {
        match id {
            Some(id) => MessageId::Server(id),
            None => MessageId::Local(Uuid::new_v4()),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, MessageId::Local(_))
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageId::Server(id) => write!(f, "{id}"),
            MessageId::Local(id) => write!(f, "local-{id}"),
        }
    }
}

/// Messaggio pronto per la UI. Non viene mai modificato dopo la creazione.
#[derive(Debug, Clone, PartialEq)]
pub struct UiMessage {
    pub id: MessageId,
    pub sender_user_id: Option<i64>,
    pub sender_name: String,
    pub content: String,
    pub sent_at: Option<NaiveDateTime>,
    pub display_time: String,
    pub is_mine: bool,
}

impl UiMessage {
    pub fn new(
        id: MessageId,
        sender_user_id: Option<i64>,
        sender_name: String,
        content: String,
        created_at: Option<&str>,
        identity: Option<i64>,
    ) -> Self {
        let sent_at = created_at.and_then(parse_timestamp);
        let display_time = match (sent_at, created_at) {
            (Some(ts), _) => ts.format(DISPLAY_FORMAT).to_string(),
            (None, Some(raw)) => raw.to_string(),
            (None, None) => String::new(),
        };
        // senza identità locale nessun messaggio è "mio"
        let is_mine = matches!((identity, sender_user_id), (Some(me), Some(sender)) if me == sender);

        Self {
            id,
            sender_user_id,
            sender_name,
            content,
            sent_at,
            display_time,
            is_mine,
        }
    }
}

/// Accetta sia timestamp RFC 3339 (convertiti nell'ora locale) sia timestamp
/// senza fuso orario, già espressi nell'ora di visualizzazione
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc).with_timezone(&Local).naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}
