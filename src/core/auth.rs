//! Auth - Credenziali e identità locale dell'utente
//!
//! Il token bearer viene passato esplicitamente ad ogni collaboratore tramite
//! `Credentials`. L'identità numerica è ricavata leggendo il payload del JWT
//! senza verificarne la firma: serve solo per confronti locali
//! ("questo messaggio è mio?", "sono il proprietario della stanza?").

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value;
use std::fmt;
use tracing::{debug, instrument};

/// Credenziali del chiamante
#[derive(Clone, Default)]
pub struct Credentials {
    token: Option<String>,
}

impl Credentials {
    pub fn bearer(token: impl Into<String>) -> Self {
        let token = token.into();
        if token.trim().is_empty() {
            return Self::anonymous();
        }
        Self { token: Some(token) }
    }

    pub fn anonymous() -> Self {
        Self { token: None }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Identità dell'utente decodificata dal token, `None` se assente o illeggibile
    pub fn identity(&self) -> Option<i64> {
        self.token.as_deref().and_then(decode_identity)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Decodifica il payload del JWT e ne estrae lo user id.
///
/// Cerca il claim `userId` e, in mancanza, `sub`; entrambi possono essere numeri
/// o stringhe numeriche. Non verifica la firma e non va mai in panic: qualsiasi
/// errore di decodifica produce `None`.
#[instrument(skip(token))]
pub fn decode_identity(token: &str) -> Option<i64> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next()) {
        (Some(_header), Some(payload)) if !payload.is_empty() => payload,
        _ => {
            debug!("Token is not a JWT, identity unavailable");
            return None;
        }
    };

    let bytes = match URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Failed to base64-decode token payload: {}", e);
            return None;
        }
    };

    let claims: Value = match std::str::from_utf8(&bytes)
        .ok()
        .and_then(|json| serde_json::from_str(json).ok())
    {
        Some(claims) => claims,
        None => {
            debug!("Token payload is not UTF-8 JSON");
            return None;
        }
    };

    claim_as_id(claims.get("userId")).or_else(|| claim_as_id(claims.get("sub")))
}

fn claim_as_id(claim: Option<&Value>) -> Option<i64> {
    match claim? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
