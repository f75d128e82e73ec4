//! Common repository traits
//!
//! This module defines the REST collaborator interfaces used by the workflows,
//! so that they can run against the HTTP repositories or against in-memory fakes.

use crate::core::AppError;
use crate::dtos::{CreateDutchpayDTO, CreateVoteDTO, DutchpayDTO, ParticipantsDTO, VoteDTO};
use crate::entities::Channel;

/// Trait for listing and leaving chat rooms
pub trait RoomStore {
    /// Lists the rooms of a club
    ///
    /// # Arguments
    /// * `club_id` - Club whose rooms are requested
    ///
    /// # Returns
    /// * `Ok(Vec<Channel>)` - Rooms visible to the caller (can be empty)
    /// * `Err(AppError)` - Network or HTTP error
    async fn list_rooms(&self, club_id: i64) -> Result<Vec<Channel>, AppError>;

    /// Leaves a room
    ///
    /// # Arguments
    /// * `room_id` - Room to leave
    ///
    /// # Returns
    /// * `Ok(())` - The server accepted the request
    /// * `Err(AppError)` - Network or HTTP error
    async fn leave_room(&self, room_id: i64) -> Result<(), AppError>;
}

/// Trait for reading and confirming room participants
pub trait ParticipantStore {
    /// Fetches the participant list together with the confirmation state
    ///
    /// # Arguments
    /// * `room_id` - Room whose participants are requested
    async fn list_participants(&self, room_id: i64) -> Result<ParticipantsDTO, AppError>;

    /// Locks the set of real attendees of an event room
    ///
    /// # Arguments
    /// * `club_id` - Club owning the event
    /// * `room_id` - Event room
    /// * `user_ids` - Confirmed participants
    async fn confirm_participants(
        &self,
        club_id: i64,
        room_id: i64,
        user_ids: &[i64],
    ) -> Result<(), AppError>;
}

/// Trait for creating expense settlements
pub trait DutchpayStore {
    /// Submits a settlement for an event room
    ///
    /// # Arguments
    /// * `room_id` - Event room the settlement belongs to
    /// * `request` - Already validated settlement data
    ///
    /// # Returns
    /// * `Ok(DutchpayDTO)` - Server response (default when the body is empty)
    /// * `Err(AppError)` - Network or HTTP error
    async fn create_dutchpay(
        &self,
        room_id: i64,
        request: &CreateDutchpayDTO,
    ) -> Result<DutchpayDTO, AppError>;
}

/// Trait for creating polls
pub trait VoteStore {
    /// Submits a poll for an event room
    ///
    /// # Arguments
    /// * `room_id` - Event room the poll belongs to
    /// * `request` - Already validated poll data
    async fn create_vote(&self, room_id: i64, request: &CreateVoteDTO) -> Result<VoteDTO, AppError>;
}
