//! Error - Tipo di errore unico del client
//!
//! Ogni operazione fallibile del crate ritorna `Result<_, AppError>`.
//! Il messaggio statico è il fallback generico da mostrare all'utente, i dettagli
//! contengono (quando presente) il messaggio inviato dal server.

use reqwest::StatusCode;
use std::fmt;

/// Categoria dell'errore, usata dai chiamanti per decidere come reagire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Risposta HTTP non 2xx
    Http,
    /// Errore di rete o di trasporto (connessione, timeout, websocket)
    Network,
    /// Payload non decodificabile
    Decode,
    /// Validazione lato client fallita prima di qualsiasi chiamata di rete
    Validation,
    /// Nessuna connessione real-time aperta
    NotConnected,
    /// Risorsa non presente nello stato locale
    NotFound,
    /// Operazione non consentita per la stanza corrente
    Forbidden,
    /// Configurazione mancante o non valida
    Config,
}

#[derive(Debug)]
pub struct AppError {
    kind: ErrorKind,
    status: Option<StatusCode>,
    message: &'static str,
    details: Option<String>,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self {
            kind,
            status: None,
            message,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Common error constructors
    pub fn http(status: StatusCode) -> Self {
        Self {
            status: Some(status),
            ..Self::new(ErrorKind::Http, "Request failed, please try again later.")
        }
    }

    pub fn network(message: &'static str) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn decode(message: &'static str) -> Self {
        Self::new(ErrorKind::Decode, message)
    }

    pub fn validation(message: &'static str) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn not_connected() -> Self {
        Self::new(
            ErrorKind::NotConnected,
            "Chat connection is not ready, please try again.",
        )
    }

    pub fn not_found(message: &'static str) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn forbidden(message: &'static str) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn invalid_config(message: &'static str) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Testo da mostrare all'utente: il messaggio del server per gli errori HTTP
    /// che ne portano uno, altrimenti il fallback generico
    pub fn user_message(&self) -> &str {
        match (self.kind, self.details.as_deref()) {
            (ErrorKind::Http, Some(server_message)) if !server_message.trim().is_empty() => {
                server_message
            }
            _ => self.message,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(status) = self.status {
            write!(f, "[{}] ", status.as_u16())?;
        }
        f.write_str(self.message)?;
        if let Some(details) = &self.details {
            write!(f, ": {details}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::decode("Unexpected response from server").with_details(err.to_string());
        }
        match err.status() {
            Some(status) => Self::http(status).with_details(err.to_string()),
            None => Self::network("Unable to reach the server").with_details(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode("Malformed JSON payload").with_details(err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        Self::invalid_config("Invalid URL").with_details(err.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for AppError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::network("WebSocket connection error").with_details(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::validation("Validation error").with_details(err.to_string())
    }
}
