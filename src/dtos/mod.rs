//! DTOs module - Data Transfer Objects
//!
//! Questo modulo contiene tutti i DTOs usati per la comunicazione client-server.
//! I DTOs separano la rappresentazione esterna (API) dalla rappresentazione interna (entities).

pub mod chat;
pub mod dutchpay;
pub mod message;
pub mod participant;
pub mod query;
pub mod vote;
pub mod ws_event;

// Re-exports per facilitare l'import
pub use chat::RoomDTO;
pub use dutchpay::{CreateDutchpayDTO, DutchpayDTO, Receipt};
pub use message::{MessageDTO, SendMessageDTO};
pub use participant::{ConfirmParticipantsDTO, ParticipantDTO, ParticipantsDTO};
pub use query::{MessagesQuery, RoomsQuery};
pub use vote::{CreateVoteDTO, VoteDTO};
pub use ws_event::{ChatFrame, FrameRejection, InboundFrame, OutboundFrame, decode_chat_frame};
