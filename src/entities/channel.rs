//! Channel entity - Stanza di chat del club

use super::enums::ChannelKind;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Channel {
    pub id: i64,
    pub name: String,
    pub kind: ChannelKind,
    // id dell'entità collegata (il club per GLOBAL, l'evento per EVENT)
    pub target_id: Option<i64>,
    pub member_count: u32,
    pub owner_user_id: Option<i64>,
}

impl Channel {
    /// `true` se l'identità locale coincide con il creatore della stanza.
    /// Senza identità nessuna stanza risulta propria.
    pub fn is_owned_by(&self, identity: Option<i64>) -> bool {
        matches!((identity, self.owner_user_id), (Some(me), Some(owner)) if me == owner)
    }

    pub fn is_event(&self) -> bool {
        self.kind.supports_event_workflows()
    }
}
