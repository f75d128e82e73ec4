//! HttpClient - Client REST condiviso da tutti i repository
//!
//! Incapsula `reqwest::Client`, l'URL base e le credenziali. Nessun retry,
//! nessuna cache: ogni risposta non 2xx diventa un `AppError` con il messaggio
//! del server nei dettagli, se presente.

use crate::core::{AppError, Credentials};
use reqwest::{Method, RequestBuilder, Response, multipart::Form};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

impl HttpClient {
    pub fn new(base_url: Url, credentials: Credentials, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// Concatena il path all'URL base preservando un eventuale prefisso (es. `/api`)
    pub fn url(&self, path: &str) -> Result<Url, AppError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{}", path.trim_start_matches('/')))?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, AppError> {
        let url = self.url(path)?;
        debug!(%method, %url, "Sending request");
        let builder = self.client.request(method, url);
        Ok(match self.credentials.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    pub async fn get_json<T, Q>(&self, path: &str, query: &Q) -> Result<T, AppError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.request(Method::GET, path)?.query(query).send().await?;
        let response = check_status(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Invia un body JSON e decodifica la risposta se presente.
    /// Un body vuoto produce `None`.
    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<Option<T>, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(method, path)?.json(body).send().await?;
        read_optional_json(check_status(response).await?).await
    }

    /// Richiesta senza body (es. leave)
    pub async fn send_empty(&self, method: Method, path: &str) -> Result<(), AppError> {
        let response = self.request(method, path)?.send().await?;
        check_status(response).await?;
        Ok(())
    }

    pub async fn post_multipart<T>(&self, path: &str, form: Form) -> Result<Option<T>, AppError>
    where
        T: DeserializeOwned,
    {
        let response = self.request(Method::POST, path)?.multipart(form).send().await?;
        read_optional_json(check_status(response).await?).await
    }
}

async fn check_status(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), "Request rejected by server");
    let err = AppError::http(status);
    Err(match server_message(&body) {
        Some(message) => err.with_details(message),
        None => err,
    })
}

async fn read_optional_json<T: DeserializeOwned>(response: Response) -> Result<Option<T>, AppError> {
    let body = response.text().await?;
    if body.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(&body)?))
}

/// Estrae il messaggio d'errore leggibile dal body JSON del server
fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error", "details"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .filter(|m| !m.trim().is_empty())
}
