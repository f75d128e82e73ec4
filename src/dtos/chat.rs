//! Chat DTOs - Data Transfer Objects per le stanze

use crate::entities::{Channel, ChannelKind};
use serde::{Deserialize, Serialize};

/// Stanza così come restituita da `GET /chat/rooms`
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RoomDTO {
    pub id: i64,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub room_type: ChannelKind,
    pub target_id: Option<i64>,
    #[serde(default)]
    pub member_count: Option<u32>,
    pub created_by: Option<i64>,
}

impl From<RoomDTO> for Channel {
    fn from(value: RoomDTO) -> Self {
        Self {
            id: value.id,
            name: value.name.unwrap_or_default(),
            kind: value.room_type,
            target_id: value.target_id,
            member_count: value.member_count.unwrap_or(0),
            owner_user_id: value.created_by,
        }
    }
}
