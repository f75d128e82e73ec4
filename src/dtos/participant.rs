//! Participant DTOs - Data Transfer Objects per partecipanti e conferma

use crate::entities::Participant;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDTO {
    pub user_id: i64,
    #[serde(alias = "nickname")]
    pub name: Option<String>,
    #[serde(default)]
    pub owner: bool,
}

impl From<ParticipantDTO> for Participant {
    fn from(value: ParticipantDTO) -> Self {
        Self {
            user_id: value.user_id,
            name: value.name.unwrap_or_default(),
            is_owner: value.owner,
        }
    }
}

/// Risposta di `GET /chat/rooms/{chatId}/participants`: lista dei membri e
/// stato di conferma dei partecipanti reali
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantsDTO {
    #[serde(default)]
    pub participants: Vec<ParticipantDTO>,
    #[serde(default)]
    pub confirmed: bool,
    /// Presenti confermati; assente nelle risposte dei server più vecchi
    #[serde(default)]
    pub confirmed_user_ids: Option<Vec<i64>>,
}

/// Body di `PUT /clubs/{clubId}/events/chats/{chatId}/participants/confirm`
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmParticipantsDTO {
    #[validate(length(min = 1, message = "Select at least one participant"))]
    pub user_ids: Vec<i64>,
}
