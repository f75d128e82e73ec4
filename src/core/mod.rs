//! Core Module - Componenti infrastrutturali del client
//!
//! Questo modulo contiene tutti i componenti "core" del client:
//! - Credenziali e identità locale
//! - Configurazione
//! - Gestione errori
//! - Contesto condiviso

pub mod auth;
pub mod config;
pub mod error;
pub mod state;

// Re-exports per facilitare l'import
pub use auth::{Credentials, decode_identity};
pub use config::Config;
pub use error::{AppError, ErrorKind};
pub use state::ClientContext;
