//! Enumerazioni - Tipi enumerati utilizzati nelle entità

use serde::{Deserialize, Serialize};

// ********************* ENUMERAZIONI UTILI **********************//

/// Tipo di stanza: globale del club oppure legata ad un evento
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChannelKind {
    Global,
    Event,
}

impl ChannelKind {
    /// Solo le stanze evento abilitano dutchpay e votazioni
    pub fn supports_event_workflows(self) -> bool {
        matches!(self, ChannelKind::Event)
    }
}
