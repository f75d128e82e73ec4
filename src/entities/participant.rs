//! Participant entity - Membro di una stanza

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub user_id: i64,
    pub name: String,
    pub is_owner: bool,
}
