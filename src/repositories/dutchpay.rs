//! DutchpayRepository - Repository REST per la creazione dei dutchpay (multipart)

use super::{DutchpayStore, HttpClient};
use crate::core::AppError;
use crate::dtos::{CreateDutchpayDTO, DutchpayDTO};
use reqwest::multipart::{Form, Part};
use tracing::{info, instrument};

// DUTCHPAY REPO
#[derive(Clone, Debug)]
pub struct DutchpayRepository {
    http: HttpClient,
}

impl DutchpayRepository {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

/// Costruisce il form multipart: `amount`, `note` opzionale, `participantUserIds`
/// ripetuto per ogni partecipante e `receipt` come file
pub fn build_dutchpay_form(request: &CreateDutchpayDTO) -> Result<Form, AppError> {
    let mut form = Form::new().text("amount", request.amount.to_string());

    if let Some(note) = request.note.as_deref().filter(|n| !n.trim().is_empty()) {
        form = form.text("note", note.to_string());
    }

    for user_id in &request.participant_user_ids {
        form = form.text("participantUserIds", user_id.to_string());
    }

    if let Some(receipt) = &request.receipt {
        let part = Part::bytes(receipt.bytes.clone())
            .file_name(receipt.file_name.clone())
            .mime_str(&receipt.mime_type)
            .map_err(|e| AppError::validation("Invalid receipt type").with_details(e.to_string()))?;
        form = form.part("receipt", part);
    }

    Ok(form)
}

impl DutchpayStore for DutchpayRepository {
    #[instrument(skip(self, request), fields(amount = request.amount, participants = request.participant_user_ids.len()))]
    async fn create_dutchpay(
        &self,
        room_id: i64,
        request: &CreateDutchpayDTO,
    ) -> Result<DutchpayDTO, AppError> {
        let form = build_dutchpay_form(request)?;
        let created: Option<DutchpayDTO> = self
            .http
            .post_multipart(&format!("/dutchpays/{room_id}"), form)
            .await?;
        info!("Dutchpay created");
        Ok(created.unwrap_or_default())
    }
}
