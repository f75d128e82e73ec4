//! Vote DTOs - Data Transfer Objects per le votazioni

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body di `POST /votes/{chatId}`
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVoteDTO {
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: String,

    #[validate(length(min = 2, message = "A vote needs at least two options"))]
    pub options: Vec<String>,

    pub deadline: DateTime<Utc>,
    pub multiple_choice: bool,
    pub anonymous: bool,
}

/// Risposta del server alla creazione della votazione
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct VoteDTO {
    #[serde(alias = "id")]
    pub vote_id: Option<i64>,
    pub title: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
}
