//! Participants workflow - Partecipanti e conferma dei presenti di una stanza
//!
//! Sequenza lineare: lettura partecipanti (una sola volta per stanza) ->
//! selezione dei presenti reali -> conferma -> abilitazione del dutchpay.
//! Il workflow vive quanto la selezione della stanza: cambiare stanza lo scarta.

use crate::core::AppError;
use crate::entities::{Channel, Participant};
use crate::repositories::ParticipantStore;
use crate::services::dutchpay::SettlementDraft;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

pub struct ParticipantWorkflow<P, D> {
    pub(crate) participant_store: P,
    pub(crate) dutchpay_store: D,
    pub(crate) club_id: i64,
    pub(crate) room: Channel,
    pub(crate) participants: Vec<Participant>,
    pub(crate) confirm_selection: BTreeSet<i64>,
    pub(crate) settlement_selection: BTreeSet<i64>,
    pub(crate) confirmed_ids: BTreeSet<i64>,
    pub(crate) confirmed: bool,
    pub(crate) draft: SettlementDraft,
}

impl<P, D> ParticipantWorkflow<P, D> {
    pub fn new(participant_store: P, dutchpay_store: D, club_id: i64, room: Channel) -> Self {
        Self {
            participant_store,
            dutchpay_store,
            club_id,
            room,
            participants: Vec::new(),
            confirm_selection: BTreeSet::new(),
            settlement_selection: BTreeSet::new(),
            confirmed_ids: BTreeSet::new(),
            confirmed: false,
            draft: SettlementDraft::default(),
        }
    }

    pub fn room(&self) -> &Channel {
        &self.room
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn confirm_selection(&self) -> &BTreeSet<i64> {
        &self.confirm_selection
    }

    pub fn settlement_selection(&self) -> &BTreeSet<i64> {
        &self.settlement_selection
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    /// Presenti confermati, a cui la selezione del dutchpay torna dopo l'invio
    pub fn confirmed_ids(&self) -> &BTreeSet<i64> {
        &self.confirmed_ids
    }

    pub fn confirmed_count(&self) -> usize {
        self.confirmed_ids.len()
    }

    /// Il dutchpay è raggiungibile solo in una stanza EVENT con presenti confermati.
    /// Il server resta comunque l'autorità finale.
    pub fn can_create_settlement(&self) -> bool {
        self.room.is_event() && self.confirmed
    }

    /// Aggiunge o rimuove un utente dalla selezione per la conferma,
    /// ritorna `true` se ora è selezionato
    pub fn toggle_confirm_selection(&mut self, user_id: i64) -> bool {
        toggle(&mut self.confirm_selection, user_id)
    }

    pub fn set_confirm_selection(&mut self, user_ids: impl IntoIterator<Item = i64>) {
        self.confirm_selection = user_ids.into_iter().collect();
    }

    /// Aggiunge o rimuove un utente dalla selezione del dutchpay,
    /// ritorna `true` se ora è selezionato
    pub fn toggle_settlement_selection(&mut self, user_id: i64) -> bool {
        toggle(&mut self.settlement_selection, user_id)
    }

    pub fn set_settlement_selection(&mut self, user_ids: impl IntoIterator<Item = i64>) {
        self.settlement_selection = user_ids.into_iter().collect();
    }
}

impl<P: ParticipantStore, D> ParticipantWorkflow<P, D> {
    /// Ritorna i partecipanti in cache se presenti (nessun controllo di freschezza),
    /// altrimenti li scarica e imposta entrambe le selezioni a tutti gli id
    #[instrument(skip(self), fields(room_id = self.room.id))]
    pub async fn ensure_participants(&mut self) -> Result<&[Participant], AppError> {
        if !self.participants.is_empty() {
            debug!("Participants already loaded");
            return Ok(&self.participants);
        }

        let dto = self.participant_store.list_participants(self.room.id).await?;
        self.participants = dto.participants.into_iter().map(Participant::from).collect();

        let all_ids: BTreeSet<i64> = self.participants.iter().map(|p| p.user_id).collect();
        self.confirm_selection = all_ids.clone();
        self.settlement_selection = all_ids.clone();

        if dto.confirmed {
            // senza la lista dal server si assume confermato l'intero gruppo
            let confirmed_ids: BTreeSet<i64> = match dto.confirmed_user_ids {
                Some(ids) => ids.into_iter().filter(|id| all_ids.contains(id)).collect(),
                None => all_ids,
            };
            self.confirmed = true;
            self.settlement_selection = confirmed_ids.clone();
            self.confirmed_ids = confirmed_ids;
        }

        info!(
            count = self.participants.len(),
            confirmed = self.confirmed,
            "Participants loaded"
        );
        Ok(&self.participants)
    }

    /// Conferma i presenti reali di una stanza evento.
    /// In caso di successo la selezione del dutchpay diventa l'insieme confermato.
    #[instrument(skip(self, user_ids), fields(room_id = self.room.id, count = user_ids.len()))]
    pub async fn confirm_participants(&mut self, user_ids: BTreeSet<i64>) -> Result<(), AppError> {
        if !self.room.is_event() {
            warn!("Participant confirmation attempted on a non-event room");
            return Err(AppError::forbidden(
                "Participants can only be confirmed in event rooms",
            ));
        }
        if user_ids.is_empty() {
            return Err(AppError::validation("Select at least one participant"));
        }

        let ids: Vec<i64> = user_ids.iter().copied().collect();
        self.participant_store
            .confirm_participants(self.club_id, self.room.id, &ids)
            .await?;

        self.confirmed = true;
        self.settlement_selection = user_ids.clone();
        self.confirmed_ids = user_ids;

        info!(count = self.confirmed_ids.len(), "Participants confirmed");
        Ok(())
    }

    /// Conferma la selezione corrente
    pub async fn confirm_selected(&mut self) -> Result<(), AppError> {
        let selection = self.confirm_selection.clone();
        self.confirm_participants(selection).await
    }
}

fn toggle(set: &mut BTreeSet<i64>, user_id: i64) -> bool {
    if set.remove(&user_id) {
        false
    } else {
        set.insert(user_id);
        true
    }
}
