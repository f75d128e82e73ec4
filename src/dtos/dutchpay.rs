//! Dutchpay DTOs - Data Transfer Objects per la creazione di un dutchpay

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Ricevuta allegata al dutchpay
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Richiesta di creazione dutchpay, inviata come multipart su `POST /dutchpays/{chatId}`
#[derive(Debug, Clone, Validate)]
pub struct CreateDutchpayDTO {
    // controllo su finitezza e positività fatto a mano: validator non gestisce NaN
    pub amount: f64,

    #[validate(length(max = 500, message = "Note must be at most 500 characters"))]
    pub note: Option<String>,

    #[validate(length(min = 1, message = "Select at least one participant"))]
    pub participant_user_ids: Vec<i64>,

    pub receipt: Option<Receipt>,
}

/// Risposta del server alla creazione del dutchpay (tutti i campi opzionali)
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DutchpayDTO {
    #[serde(alias = "id")]
    pub dutchpay_id: Option<i64>,
    pub amount: Option<f64>,
    pub per_person_amount: Option<f64>,
    pub participant_count: Option<u32>,
}
