//! Chat Session - Controller della sessione real-time di una stanza
//!
//! Mantiene al più una connessione attiva. Cambiare stanza annulla la precedente
//! tramite il suo `CancellationToken` prima di avviare la nuova; le modifiche
//! tardive del task abbandonato vengono scartate.
//!
//! Stati per stanza: `Idle -> Connecting -> Open -> {Closed | Failed}`.
//! Non esiste alcuna transizione automatica da `Closed`/`Failed` ad `Open`:
//! serve una nuova `select_room`.

use crate::core::{AppError, ClientContext};
use crate::dtos::OutboundFrame;
use crate::entities::UiMessage;
use crate::ws::connection::{ConnectionContext, run_connection};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Idle,
    Connecting,
    Open,
    /// Chiusa dal client (cambio stanza o dismissione)
    Closed,
    /// Chiusa per errore o dal server, nessun tentativo di riconnessione
    Failed,
}

/// Snapshot osservabile della sessione
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub room_id: Option<i64>,
    pub status: ConnectionStatus,
    pub messages: Vec<UiMessage>,
    /// Avviso da mostrare all'utente (es. "riprova")
    pub notice: Option<String>,
}

impl SessionState {
    pub fn is_connecting(&self) -> bool {
        self.status == ConnectionStatus::Connecting
    }

    pub fn is_open(&self) -> bool {
        self.status == ConnectionStatus::Open
    }
}

struct ActiveRoom {
    room_id: i64,
    cancel: CancellationToken,
    outbound: mpsc::UnboundedSender<String>,
}

pub struct ChatSession {
    ctx: Arc<ClientContext>,
    state: Arc<watch::Sender<SessionState>>,
    active: Option<ActiveRoom>,
}

impl ChatSession {
    pub fn new(ctx: Arc<ClientContext>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            ctx,
            state: Arc::new(state),
            active: None,
        }
    }

    /// Receiver aggiornato ad ogni modifica dello stato
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn room_id(&self) -> Option<i64> {
        self.active.as_ref().map(|a| a.room_id)
    }

    pub fn status(&self) -> ConnectionStatus {
        self.state.borrow().status
    }

    /// Seleziona una stanza: chiude la connessione precedente, svuota i messaggi
    /// e avvia storico + websocket per la nuova stanza.
    /// Deve essere chiamata dentro un runtime tokio.
    #[instrument(skip(self))]
    pub fn select_room(&mut self, room_id: i64) {
        if let Some(previous) = self.teardown() {
            info!(previous_room = previous, "Switching room");
        }

        let cancel = CancellationToken::new();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel::<String>();

        self.state.send_modify(|s| {
            s.room_id = Some(room_id);
            s.status = ConnectionStatus::Connecting;
            s.messages.clear();
            s.notice = None;
        });

        tokio::spawn(run_connection(ConnectionContext {
            ctx: self.ctx.clone(),
            room_id,
            cancel: cancel.clone(),
            state: self.state.clone(),
            outbound: outbound_rx,
        }));

        self.active = Some(ActiveRoom {
            room_id,
            cancel,
            outbound: outbound_tx,
        });
    }

    /// Invia un messaggio sulla connessione real-time.
    ///
    /// Se la connessione non esiste o non è aperta imposta l'avviso "riprova" e
    /// ritorna `AppError::not_connected` senza fare altro. Testo vuoto ignorato.
    #[instrument(skip(self, text))]
    pub fn send(&self, text: &str) -> Result<(), AppError> {
        if text.trim().is_empty() {
            debug!("Ignoring empty message");
            return Ok(());
        }

        let open = self.state.borrow().is_open();
        let active = match &self.active {
            Some(active) if open => active,
            _ => {
                warn!("Send attempted without an open connection");
                return Err(self.retry_notice());
            }
        };

        let frame = serde_json::to_string(&OutboundFrame::Chat {
            content: text.to_string(),
        })?;

        if active.outbound.send(frame).is_err() {
            warn!("Connection task is gone, message not sent");
            return Err(self.retry_notice());
        }

        self.state.send_if_modified(|s| s.notice.take().is_some());
        Ok(())
    }

    /// Invio di fallback via REST per la stanza selezionata.
    /// Il messaggio non viene aggiunto alla lista: arriverà dal canale real-time.
    #[instrument(skip(self, text))]
    pub async fn send_over_http(&self, text: &str) -> Result<Option<UiMessage>, AppError> {
        let room_id = self
            .room_id()
            .ok_or_else(|| AppError::not_found("No room selected"))?;
        let created = self.ctx.msg.send_message(room_id, text).await?;
        Ok(created.map(|m| m.into_ui_message(self.ctx.identity)))
    }

    /// Chiude la connessione attiva (dismissione del componente)
    #[instrument(skip(self))]
    pub fn close(&mut self) {
        if self.teardown().is_some() {
            self.state.send_modify(|s| {
                if matches!(s.status, ConnectionStatus::Connecting | ConnectionStatus::Open) {
                    s.status = ConnectionStatus::Closed;
                }
            });
            info!("Session closed");
        }
    }

    /// Annulla la connessione attiva, ritorna la stanza che era selezionata
    fn teardown(&mut self) -> Option<i64> {
        let active = self.active.take()?;
        active.cancel.cancel();
        Some(active.room_id)
    }

    fn retry_notice(&self) -> AppError {
        let err = AppError::not_connected();
        let notice = err.user_message().to_string();
        self.state.send_modify(|s| s.notice = Some(notice));
        err
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
