//! Services module - Coordinatore per i workflow del client
//!
//! Questo modulo organizza i workflow in sotto-moduli separati per una migliore manutenibilità.
//! Ogni modulo sequenzia le chiamate ai repository per una specifica funzionalità.

pub mod club;
pub mod dutchpay;
pub mod participants;
pub mod vote;

// Re-exports per facilitare l'import
pub use club::{ClubChat, RoomWorkflow};
pub use dutchpay::SettlementDraft;
pub use participants::ParticipantWorkflow;
pub use vote::{VoteDraft, create_vote};
