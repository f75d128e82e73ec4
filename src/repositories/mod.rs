//! Repositories module - Coordinatore per tutti i collaboratori REST del progetto
//!
//! Ogni repository incapsula le chiamate HTTP relative ad una risorsa del server.
//! Sono wrapper sottili: nessun retry, nessuna cache, solo header di autenticazione
//! e conversione degli errori.

// Dichiarazione dei sotto-moduli
pub mod dutchpay;
pub mod http;
pub mod message;
pub mod participant;
pub mod room;
pub mod traits;
pub mod vote;

// Re-esportazione dei trait per facilitare l'import
pub use traits::{DutchpayStore, ParticipantStore, RoomStore, VoteStore};

// Re-esportazione delle struct dei repository per facilitare l'import
pub use dutchpay::DutchpayRepository;
pub use http::HttpClient;
pub use message::MessageRepository;
pub use participant::ParticipantRepository;
pub use room::RoomRepository;
pub use vote::VoteRepository;
