//! Dutchpay service - Creazione del dutchpay di una stanza evento
//!
//! Tutta la validazione avviene prima di qualsiasi chiamata di rete: una bozza
//! non valida non produce mai una richiesta al server.

use crate::core::AppError;
use crate::dtos::{CreateDutchpayDTO, DutchpayDTO, Receipt};
use crate::repositories::DutchpayStore;
use crate::services::participants::ParticipantWorkflow;
use tracing::{info, instrument, warn};
use validator::Validate;

/// Campi locali del form di dutchpay
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettlementDraft {
    pub amount: Option<f64>,
    pub note: String,
    pub receipt: Option<Receipt>,
}

impl SettlementDraft {
    /// Quota per persona, `None` se l'importo manca, non è positivo o non ci sono partecipanti
    pub fn per_person_share(&self, participant_count: usize) -> Option<f64> {
        match self.amount {
            Some(amount) if participant_count > 0 && amount.is_finite() && amount > 0.0 => {
                Some(amount / participant_count as f64)
            }
            _ => None,
        }
    }
}

impl<P, D> ParticipantWorkflow<P, D> {
    pub fn draft(&self) -> &SettlementDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut SettlementDraft {
        &mut self.draft
    }

    /// Quota per persona calcolata sulla selezione corrente
    pub fn per_person_share(&self) -> Option<f64> {
        self.draft.per_person_share(self.settlement_selection.len())
    }

    /// Costruisce la richiesta dalla bozza e dalla selezione corrente.
    ///
    /// # Errors
    /// * `Forbidden` - stanza non EVENT o partecipanti non confermati
    /// * `Validation` - importo non finito o non positivo, selezione vuota,
    ///   ricevuta mancante, nota troppo lunga
    pub fn settlement_request(&self) -> Result<CreateDutchpayDTO, AppError> {
        if !self.can_create_settlement() {
            return Err(AppError::forbidden(
                "Confirm the participants of an event room first",
            ));
        }

        let amount = match self.draft.amount {
            Some(amount) if amount.is_finite() && amount > 0.0 => amount,
            _ => return Err(AppError::validation("Amount must be a positive number")),
        };

        if self.settlement_selection.is_empty() {
            return Err(AppError::validation("Select at least one participant"));
        }

        if self.draft.receipt.is_none() {
            return Err(AppError::validation("A receipt must be attached"));
        }

        let note = self.draft.note.trim();
        let request = CreateDutchpayDTO {
            amount,
            note: (!note.is_empty()).then(|| note.to_string()),
            participant_user_ids: self.settlement_selection.iter().copied().collect(),
            receipt: self.draft.receipt.clone(),
        };
        request.validate()?;
        Ok(request)
    }
}

impl<P, D: DutchpayStore> ParticipantWorkflow<P, D> {
    /// Valida e invia il dutchpay.
    /// In caso di successo svuota la bozza e riporta la selezione all'insieme confermato.
    #[instrument(skip(self), fields(room_id = self.room.id))]
    pub async fn create_settlement(&mut self) -> Result<DutchpayDTO, AppError> {
        let request = self.settlement_request().inspect_err(|e| {
            warn!("Settlement rejected before submission: {}", e);
        })?;

        let created = self
            .dutchpay_store
            .create_dutchpay(self.room.id, &request)
            .await?;

        self.draft = SettlementDraft::default();
        self.settlement_selection = self.confirmed_ids.clone();

        info!(
            dutchpay_id = ?created.dutchpay_id,
            participants = request.participant_user_ids.len(),
            "Settlement created"
        );
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;
    use crate::entities::ChannelKind;
    use crate::services::participants::tests::{FakeStore, room};
    use std::collections::BTreeSet;

    fn receipt() -> Receipt {
        Receipt {
            file_name: "receipt.png".to_string(),
            mime_type: "image/png".to_string(),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        }
    }

    async fn confirmed_workflow(store: &FakeStore) -> ParticipantWorkflow<&FakeStore, &FakeStore> {
        let mut workflow = ParticipantWorkflow::new(store, store, 7, room(ChannelKind::Event));
        workflow.ensure_participants().await.unwrap();
        workflow
            .confirm_participants(BTreeSet::from([5, 6]))
            .await
            .unwrap();
        workflow
    }

    #[test]
    fn per_person_share_divides_by_selection() {
        let draft = SettlementDraft {
            amount: Some(10000.0),
            ..SettlementDraft::default()
        };
        assert_eq!(draft.per_person_share(2), Some(5000.0));
        assert_eq!(draft.per_person_share(0), None);
        assert_eq!(SettlementDraft::default().per_person_share(2), None);
    }

    #[test]
    fn per_person_share_ignores_non_positive_amounts() {
        for amount in [-100.0, 0.0, f64::NAN] {
            let draft = SettlementDraft {
                amount: Some(amount),
                ..SettlementDraft::default()
            };
            assert_eq!(draft.per_person_share(2), None);
        }
    }

    #[tokio::test]
    async fn settlement_is_gated_until_confirmation() {
        let store = FakeStore::with_participants(&[5, 6]);
        let mut workflow = ParticipantWorkflow::new(&store, &store, 7, room(ChannelKind::Event));
        workflow.ensure_participants().await.unwrap();
        workflow.draft_mut().amount = Some(100.0);
        workflow.draft_mut().receipt = Some(receipt());

        let err = workflow.create_settlement().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert!(store.dutchpays.borrow().is_empty());
    }

    #[tokio::test]
    async fn invalid_drafts_never_reach_the_store() {
        let store = FakeStore::with_participants(&[5, 6]);
        let mut workflow = confirmed_workflow(&store).await;

        for amount in [None, Some(0.0), Some(-5.0), Some(f64::NAN), Some(f64::INFINITY)] {
            workflow.draft_mut().amount = amount;
            workflow.draft_mut().receipt = Some(receipt());
            let err = workflow.create_settlement().await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }

        workflow.draft_mut().amount = Some(100.0);
        workflow.draft_mut().receipt = None;
        assert!(workflow.create_settlement().await.is_err());

        workflow.draft_mut().receipt = Some(receipt());
        workflow.set_settlement_selection(Vec::new());
        assert!(workflow.create_settlement().await.is_err());

        assert!(store.dutchpays.borrow().is_empty());
    }

    #[tokio::test]
    async fn valid_settlement_is_submitted_once_and_resets_the_draft() {
        let store = FakeStore::with_participants(&[5, 6, 7]);
        let mut workflow = confirmed_workflow(&store).await;

        workflow.draft_mut().amount = Some(10000.0);
        workflow.draft_mut().note = "  dinner  ".to_string();
        workflow.draft_mut().receipt = Some(receipt());
        assert_eq!(workflow.per_person_share(), Some(5000.0));

        workflow.toggle_settlement_selection(6);
        workflow.create_settlement().await.unwrap();

        let calls = store.dutchpays.borrow();
        assert_eq!(calls.len(), 1);
        let (room_id, request) = &calls[0];
        assert_eq!(*room_id, 2);
        assert_eq!(request.amount, 10000.0);
        assert_eq!(request.note.as_deref(), Some("dinner"));
        assert_eq!(request.participant_user_ids, vec![5]);

        assert_eq!(workflow.draft(), &SettlementDraft::default());
        assert_eq!(workflow.settlement_selection(), &BTreeSet::from([5, 6]));
    }
}
