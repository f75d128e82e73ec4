//! Query DTOs - Query parameters delle chiamate REST

use serde::{Deserialize, Serialize};

/// Query parameters di `GET /chat/rooms`
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RoomsQuery {
    pub club_id: i64,
}

/// Query parameters per lo storico messaggi
#[derive(Serialize, Deserialize, Debug)]
pub struct MessagesQuery {
    pub limit: u32,
}

