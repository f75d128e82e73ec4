//! Club Chat - Stato della pagina chat di un club
//!
//! Compone lista delle stanze, sessione real-time e workflow dei partecipanti
//! della stanza selezionata.

use crate::core::{AppError, ClientContext};
use crate::dtos::VoteDTO;
use crate::entities::Channel;
use crate::repositories::{DutchpayRepository, ParticipantRepository, RoomStore};
use crate::services::participants::ParticipantWorkflow;
use crate::services::vote::{VoteDraft, create_vote};
use crate::ws::ChatSession;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub type RoomWorkflow = ParticipantWorkflow<ParticipantRepository, DutchpayRepository>;

pub struct ClubChat {
    ctx: Arc<ClientContext>,
    club_id: i64,
    rooms: Vec<Channel>,
    selected: Option<i64>,
    session: ChatSession,
    workflow: Option<RoomWorkflow>,
}

impl ClubChat {
    pub fn new(ctx: Arc<ClientContext>, club_id: i64) -> Self {
        Self {
            session: ChatSession::new(ctx.clone()),
            ctx,
            club_id,
            rooms: Vec::new(),
            selected: None,
            workflow: None,
        }
    }

    pub fn club_id(&self) -> i64 {
        self.club_id
    }

    pub fn rooms(&self) -> &[Channel] {
        &self.rooms
    }

    pub fn room(&self, room_id: i64) -> Option<&Channel> {
        self.rooms.iter().find(|r| r.id == room_id)
    }

    pub fn selected_room(&self) -> Option<&Channel> {
        self.selected.and_then(|id| self.room(id))
    }

    /// Ricarica la lista delle stanze sostituendola per intero.
    /// Se la stanza selezionata non è più presente la sessione viene chiusa.
    #[instrument(skip(self), fields(club_id = self.club_id))]
    pub async fn load_rooms(&mut self) -> Result<&[Channel], AppError> {
        let rooms = self.ctx.rooms.list_rooms(self.club_id).await?;
        self.rooms = rooms;

        if let Some(selected) = self.selected {
            if self.room(selected).is_none() {
                warn!(room_id = selected, "Selected room disappeared, closing session");
                self.deselect();
            }
        }
        Ok(&self.rooms)
    }

    /// Seleziona una stanza: nuovo workflow dei partecipanti e nuova connessione.
    /// Riselezionare la stanza corrente riapre la connessione.
    #[instrument(skip(self))]
    pub fn select_room(&mut self, room_id: i64) -> Result<(), AppError> {
        let room = self
            .room(room_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Room not found"))?;

        self.workflow = Some(ParticipantWorkflow::new(
            self.ctx.participants.clone(),
            self.ctx.dutchpay.clone(),
            self.club_id,
            room,
        ));
        self.selected = Some(room_id);
        self.session.select_room(room_id);
        info!("Room selected");
        Ok(())
    }

    /// Abbandona una stanza e la rimuove dalla lista locale
    #[instrument(skip(self))]
    pub async fn leave_room(&mut self, room_id: i64) -> Result<(), AppError> {
        if self.room(room_id).is_none() {
            return Err(AppError::not_found("Room not found"));
        }

        self.ctx.rooms.leave_room(room_id).await?;
        self.rooms.retain(|r| r.id != room_id);

        if self.selected == Some(room_id) {
            self.deselect();
        }
        info!("Room removed from the local list");
        Ok(())
    }

    /// `true` se l'utente locale ha creato la stanza
    pub fn is_owner(&self, room_id: i64) -> bool {
        self.room(room_id)
            .is_some_and(|r| r.is_owned_by(self.ctx.identity))
    }

    pub fn can_create_settlement(&self) -> bool {
        self.workflow
            .as_ref()
            .is_some_and(ParticipantWorkflow::can_create_settlement)
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ChatSession {
        &mut self.session
    }

    pub fn workflow(&self) -> Option<&RoomWorkflow> {
        self.workflow.as_ref()
    }

    pub fn workflow_mut(&mut self) -> Option<&mut RoomWorkflow> {
        self.workflow.as_mut()
    }

    /// Crea una votazione nella stanza selezionata
    pub async fn create_vote(&self, draft: VoteDraft) -> Result<VoteDTO, AppError> {
        let room = self
            .selected_room()
            .ok_or_else(|| AppError::not_found("No room selected"))?;
        create_vote(&self.ctx.votes, room, draft, Utc::now()).await
    }

    /// Chiude la sessione (dismissione della pagina)
    pub fn close(&mut self) {
        self.deselect();
    }

    fn deselect(&mut self) {
        self.selected = None;
        self.workflow = None;
        self.session.close();
    }
}
