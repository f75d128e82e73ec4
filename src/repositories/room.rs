//! RoomRepository - Repository REST per le stanze del club

use super::{HttpClient, RoomStore};
use crate::core::AppError;
use crate::dtos::{RoomDTO, RoomsQuery};
use crate::entities::Channel;
use reqwest::Method;
use tracing::{info, instrument};

// ROOM REPO
#[derive(Clone, Debug)]
pub struct RoomRepository {
    http: HttpClient,
}

impl RoomRepository {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

impl RoomStore for RoomRepository {
    #[instrument(skip(self))]
    async fn list_rooms(&self, club_id: i64) -> Result<Vec<Channel>, AppError> {
        let rooms: Vec<RoomDTO> = self
            .http
            .get_json("/chat/rooms", &RoomsQuery { club_id })
            .await?;
        info!(count = rooms.len(), "Rooms loaded");
        Ok(rooms.into_iter().map(Channel::from).collect())
    }

    #[instrument(skip(self))]
    async fn leave_room(&self, room_id: i64) -> Result<(), AppError> {
        self.http
            .send_empty(Method::POST, &format!("/chat/rooms/{room_id}/leave"))
            .await?;
        info!("Room left");
        Ok(())
    }
}
