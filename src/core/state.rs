//! Client Context - Stato condiviso del client
//!
//! Contiene tutti i repository, la configurazione e le credenziali
//! necessari ai workflow e alla sessione di chat.

use crate::core::{AppError, Config, Credentials};
use crate::repositories::{
    DutchpayRepository, HttpClient, MessageRepository, ParticipantRepository, RoomRepository,
    VoteRepository,
};

/// Contesto condiviso (tipicamente dentro un `Arc`) tra sessione e workflow
#[derive(Debug)]
pub struct ClientContext {
    /// Repository per la gestione delle stanze
    pub rooms: RoomRepository,

    /// Repository per lo storico e l'invio HTTP dei messaggi
    pub msg: MessageRepository,

    /// Repository per partecipanti e conferma
    pub participants: ParticipantRepository,

    /// Repository per i dutchpay
    pub dutchpay: DutchpayRepository,

    /// Repository per le votazioni
    pub votes: VoteRepository,

    /// Credenziali passate esplicitamente ad ogni collaboratore
    pub credentials: Credentials,

    /// Identità locale decodificata dal token (None se assente o illeggibile)
    pub identity: Option<i64>,

    pub config: Config,
}

impl ClientContext {
    /// Crea il contesto inizializzando tutti i repository con lo stesso client HTTP
    ///
    /// # Arguments
    /// * `config` - Configurazione del client
    /// * `credentials` - Credenziali del chiamante
    pub fn new(config: Config, credentials: Credentials) -> Result<Self, AppError> {
        let http = HttpClient::new(
            config.api_base_url.clone(),
            credentials.clone(),
            config.request_timeout(),
        )?;

        Ok(Self {
            rooms: RoomRepository::new(http.clone()),
            msg: MessageRepository::new(http.clone()),
            participants: ParticipantRepository::new(http.clone()),
            dutchpay: DutchpayRepository::new(http.clone()),
            votes: VoteRepository::new(http),
            identity: credentials.identity(),
            credentials,
            config,
        })
    }

    /// Come `new`, usando il token presente nella configurazione
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let credentials = match config.token.as_deref() {
            Some(token) => Credentials::bearer(token),
            None => Credentials::anonymous(),
        };
        Self::new(config, credentials)
    }
}
