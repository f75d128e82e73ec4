//! WebSocket Module - Gestione WebSocket per comunicazione real-time
//!
//! Questo modulo gestisce la connessione WebSocket verso il server per la stanza
//! selezionata. Include:
//! - Controller di sessione (selezione stanza, invio, chiusura)
//! - Task di connessione (storico REST + lettura/scrittura dei frame)

pub mod connection;
pub mod session;

// Re-exports pubblici
pub use connection::ws_url;
pub use session::{ChatSession, ConnectionStatus, SessionState};
