//! VoteRepository - Repository REST per le votazioni

use super::{HttpClient, VoteStore};
use crate::core::AppError;
use crate::dtos::{CreateVoteDTO, VoteDTO};
use reqwest::Method;
use tracing::{info, instrument};

// VOTE REPO
#[derive(Clone, Debug)]
pub struct VoteRepository {
    http: HttpClient,
}

impl VoteRepository {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

impl VoteStore for VoteRepository {
    #[instrument(skip(self, request), fields(title = %request.title))]
    async fn create_vote(&self, room_id: i64, request: &CreateVoteDTO) -> Result<VoteDTO, AppError> {
        let created: Option<VoteDTO> = self
            .http
            .send_json(Method::POST, &format!("/votes/{room_id}"), request)
            .await?;
        info!("Vote created");
        Ok(created.unwrap_or_default())
    }
}
