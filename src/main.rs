use clubchat::{AppError, ClientContext, ClubChat, Config, ConnectionStatus, SessionState};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("clubchat=info")),
        )
        .init();

    // Inizializza la configurazione
    let config = Config::from_env()?;
    config.print_info();

    let club_id = config
        .club_id
        .ok_or_else(|| AppError::invalid_config("CHAT_CLUB_ID must be set in .env file"))?;
    let ctx = Arc::new(ClientContext::from_config(config)?);

    let mut chat = ClubChat::new(ctx, club_id);
    for room in chat.load_rooms().await? {
        info!(
            "Room {} '{}' ({:?}, {} members)",
            room.id, room.name, room.kind, room.member_count
        );
    }

    // Stanza dal primo argomento, altrimenti la prima disponibile
    let room_id = match std::env::args().nth(1) {
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|_| AppError::invalid_config("Room id must be a number"))?,
        None => match chat.rooms().first() {
            Some(room) => room.id,
            None => {
                warn!("No rooms available for club {}", club_id);
                return Ok(());
            }
        },
    };
    chat.select_room(room_id)?;

    let printer = tokio::spawn(print_messages(chat.session().subscribe()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "/quit" {
            break;
        }
        if let Err(e) = chat.session().send(&line) {
            error!("{}", e.user_message());
        }
    }

    chat.close();
    printer.abort();
    info!("Bye");
    Ok(())
}

/// Stampa i messaggi nuovi ad ogni aggiornamento della sessione
async fn print_messages(mut rx: watch::Receiver<SessionState>) {
    let mut printed = 0;
    let mut status = ConnectionStatus::Idle;

    while rx.changed().await.is_ok() {
        let state = rx.borrow_and_update().clone();

        if state.status != status {
            status = state.status;
            info!(?status, "Connection status changed");
        }
        if state.messages.len() < printed {
            printed = 0;
        }
        for msg in &state.messages[printed..] {
            let marker = if msg.is_mine { "*" } else { " " };
            println!("{marker}[{}] {}: {}", msg.display_time, msg.sender_name, msg.content);
        }
        printed = state.messages.len();

        if let Some(notice) = &state.notice {
            warn!("{}", notice);
        }
    }
}
