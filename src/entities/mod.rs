//! Entities module - Entità del dominio applicativo
//!
//! Questo modulo contiene le entità che rappresentano lo stato locale del client:
//! stanze, messaggi pronti per la visualizzazione e partecipanti.

pub mod channel;
pub mod enums;
pub mod message;
pub mod participant;

// Re-exports per facilitare l'import
pub use channel::Channel;
pub use enums::ChannelKind;
pub use message::{MessageId, UiMessage};
pub use participant::Participant;
