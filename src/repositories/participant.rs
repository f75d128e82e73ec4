//! ParticipantRepository - Repository REST per partecipanti e conferma

use super::{HttpClient, ParticipantStore};
use crate::core::AppError;
use crate::dtos::{ConfirmParticipantsDTO, ParticipantsDTO};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, instrument};

// PARTICIPANT REPO
#[derive(Clone, Debug)]
pub struct ParticipantRepository {
    http: HttpClient,
}

impl ParticipantRepository {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

impl ParticipantStore for ParticipantRepository {
    #[instrument(skip(self))]
    async fn list_participants(&self, room_id: i64) -> Result<ParticipantsDTO, AppError> {
        let no_query: [(&str, &str); 0] = [];
        let dto: ParticipantsDTO = self
            .http
            .get_json(&format!("/chat/rooms/{room_id}/participants"), &no_query)
            .await?;
        debug!(
            count = dto.participants.len(),
            confirmed = dto.confirmed,
            "Participants fetched"
        );
        Ok(dto)
    }

    #[instrument(skip(self, user_ids), fields(count = user_ids.len()))]
    async fn confirm_participants(
        &self,
        club_id: i64,
        room_id: i64,
        user_ids: &[i64],
    ) -> Result<(), AppError> {
        let body = ConfirmParticipantsDTO {
            user_ids: user_ids.to_vec(),
        };
        // la risposta non viene usata, basta che sia 2xx
        let _: Option<Value> = self
            .http
            .send_json(
                Method::PUT,
                &format!("/clubs/{club_id}/events/chats/{room_id}/participants/confirm"),
                &body,
            )
            .await?;
        info!("Participants confirmed");
        Ok(())
    }
}
