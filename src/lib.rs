//! Club chat client library - espone i moduli principali per il binario e per i test

pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod services;
pub mod ws;

// Re-export dei tipi principali per facilitare l'import
pub use self::core::{AppError, ClientContext, Config, Credentials, ErrorKind};
pub use services::{ClubChat, ParticipantWorkflow, SettlementDraft, VoteDraft};
pub use ws::{ChatSession, ConnectionStatus, SessionState};
