//! Vote service - Creazione di votazioni nelle stanze evento

use crate::core::AppError;
use crate::dtos::{CreateVoteDTO, VoteDTO};
use crate::entities::Channel;
use crate::repositories::VoteStore;
use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};
use validator::Validate;

/// Campi locali del form di votazione
#[derive(Debug, Clone, Default)]
pub struct VoteDraft {
    pub title: String,
    pub options: Vec<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub multiple_choice: bool,
    pub anonymous: bool,
}

impl VoteDraft {
    /// Converte la bozza in richiesta, scartando le opzioni vuote.
    /// `now` è il riferimento per la scadenza, che deve essere strettamente futura.
    pub fn into_request(self, now: DateTime<Utc>) -> Result<CreateVoteDTO, AppError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::validation("Title is required"));
        }

        let deadline = match self.deadline {
            Some(deadline) if deadline > now => deadline,
            Some(_) => return Err(AppError::validation("Deadline must be in the future")),
            None => return Err(AppError::validation("Deadline is required")),
        };

        let options: Vec<String> = self
            .options
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
        if options.len() < 2 {
            return Err(AppError::validation("A vote needs at least two options"));
        }

        let request = CreateVoteDTO {
            title: title.to_string(),
            options,
            deadline,
            multiple_choice: self.multiple_choice,
            anonymous: self.anonymous,
        };
        request.validate()?;
        Ok(request)
    }
}

/// Valida la bozza e crea la votazione per una stanza evento
#[instrument(skip(store, room, draft), fields(room_id = room.id))]
pub async fn create_vote<S: VoteStore>(
    store: &S,
    room: &Channel,
    draft: VoteDraft,
    now: DateTime<Utc>,
) -> Result<VoteDTO, AppError> {
    if !room.is_event() {
        return Err(AppError::forbidden("Votes can only be created in event rooms"));
    }

    let request = draft.into_request(now).inspect_err(|e| {
        warn!("Vote rejected before submission: {}", e);
    })?;

    let created = store.create_vote(room.id, &request).await?;
    info!(vote_id = ?created.vote_id, options = request.options.len(), "Vote created");
    Ok(created)
}
