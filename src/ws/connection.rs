//! WebSocket Connection Management - Task di connessione per una stanza
//!
//! Un task per stanza selezionata: carica lo storico via REST, apre il websocket,
//! inoltra i frame in uscita e accoda i messaggi in arrivo. Ogni modifica allo
//! stato passa da `RoomGuard::apply`, che la scarta se la stanza è stata abbandonata.

use crate::core::{AppError, ClientContext};
use crate::dtos::{FrameRejection, decode_chat_frame};
use crate::entities::UiMessage;
use crate::ws::session::{ConnectionStatus, SessionState};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::watch;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

pub(crate) struct ConnectionContext {
    pub ctx: Arc<ClientContext>,
    pub room_id: i64,
    pub cancel: CancellationToken,
    pub state: Arc<watch::Sender<SessionState>>,
    pub outbound: UnboundedReceiver<String>,
}

struct RoomGuard {
    room_id: i64,
    cancel: CancellationToken,
    state: Arc<watch::Sender<SessionState>>,
}

impl RoomGuard {
    /// Applica `f` allo stato solo se la stanza è ancora quella attiva.
    /// Ritorna `false` se la modifica è stata scartata.
    fn apply(&self, f: impl FnOnce(&mut SessionState)) -> bool {
        self.state.send_if_modified(|s| {
            if self.cancel.is_cancelled() || s.room_id != Some(self.room_id) {
                return false;
            }
            f(s);
            true
        })
    }

    fn fail(&self) {
        self.apply(|s| s.status = ConnectionStatus::Failed);
    }
}

/// URL websocket della stanza; il token viaggia come query parameter
/// perché il trasporto non permette header di autenticazione
pub fn ws_url(base: &Url, room_id: i64, token: Option<&str>) -> Result<Url, AppError> {
    let base = base.as_str().trim_end_matches('/');
    let mut url = Url::parse(&format!("{base}/ws/chat/{room_id}"))?;
    if let Some(token) = token {
        url.query_pairs_mut().append_pair("token", token);
    }
    Ok(url)
}

#[instrument(skip(conn), fields(room_id = conn.room_id))]
pub(crate) async fn run_connection(conn: ConnectionContext) {
    let ConnectionContext {
        ctx,
        room_id,
        cancel,
        state,
        mut outbound,
    } = conn;
    let guard = RoomGuard {
        room_id,
        cancel: cancel.clone(),
        state,
    };

    // 1. Storico via REST
    let history = tokio::select! {
        _ = cancel.cancelled() => {
            debug!("Room abandoned while fetching history");
            return;
        }
        result = ctx.msg.recent_messages(room_id, ctx.config.history_limit) => result,
    };

    match history {
        Ok(items) => {
            let seeded: Vec<UiMessage> = items
                .into_iter()
                .map(|m| m.into_ui_message(ctx.identity))
                .collect();
            info!(count = seeded.len(), "History loaded");
            guard.apply(|s| {
                s.messages.splice(0..0, seeded);
            });
        }
        Err(e) => {
            // lo storico mancante non impedisce la connessione real-time
            warn!("Failed to load history: {}", e);
            let notice = e.user_message().to_string();
            guard.apply(|s| s.notice = Some(notice));
        }
    }

    // 2. Apertura del websocket
    let url = match ws_url(&ctx.config.ws_base_url, room_id, ctx.credentials.token()) {
        Ok(url) => url,
        Err(e) => {
            error!("Invalid WebSocket URL: {}", e);
            guard.fail();
            return;
        }
    };

    let connected = tokio::select! {
        _ = cancel.cancelled() => {
            debug!("Room abandoned while connecting");
            return;
        }
        result = connect_async(url.as_str()) => result,
    };

    let mut stream = match connected {
        Ok((stream, _response)) => stream,
        Err(e) => {
            warn!("WebSocket connection failed: {}", e);
            guard.fail();
            return;
        }
    };

    if !guard.apply(|s| s.status = ConnectionStatus::Open) {
        debug!("Connection opened for an abandoned room, closing it");
        let _ = stream.close(None).await;
        return;
    }
    info!("WebSocket connection established");

    // 3. Loop di lettura/scrittura
    let (mut ws_tx, mut ws_rx) = stream.split();

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                info!("Closing connection");
                // errori di chiusura ignorati
                let _ = ws_tx.close().await;
                break;
            }

            outgoing = outbound.recv() => {
                match outgoing {
                    Some(text) => {
                        if let Err(e) = ws_tx.send(Message::text(text)).await {
                            warn!("Failed to send frame: {:?}", e);
                            guard.fail();
                            break;
                        }
                        debug!("Frame sent");
                    }
                    None => {
                        info!("Session dropped, closing connection");
                        let _ = ws_tx.close().await;
                        break;
                    }
                }
            }

            incoming = ws_rx.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => handle_text(&guard, &ctx, text.as_str()),
                    Some(Ok(Message::Close(frame))) => {
                        info!(?frame, "Close message received");
                        guard.fail();
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("WebSocket error: {:?}", e);
                        guard.fail();
                        break;
                    }
                    None => {
                        info!("WebSocket stream ended");
                        guard.fail();
                        break;
                    }
                }
            }
        }
    }

    info!("Connection task terminated");
}

fn handle_text(guard: &RoomGuard, ctx: &ClientContext, text: &str) {
    match decode_chat_frame(text, guard.room_id) {
        Ok(frame) => {
            let msg = frame.into_ui_message(ctx.identity);
            debug!(message_id = %msg.id, "Chat frame received");
            guard.apply(|s| s.messages.push(msg));
        }
        Err(FrameRejection::UnknownKind) => debug!("Ignoring frame of unknown kind"),
        Err(rejection @ FrameRejection::ForeignRoom { .. }) => debug!("Ignoring frame: {}", rejection),
        Err(rejection) => warn!("Dropping frame: {}", rejection),
    }
}
