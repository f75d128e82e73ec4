use crate::core::AppError;
use dotenv::dotenv;
use std::env;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

pub const DEFAULT_HISTORY_LIMIT: u32 = 50;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: Url,
    pub ws_base_url: Url,
    pub token: Option<String>,
    pub club_id: Option<i64>,
    pub history_limit: u32,
    pub request_timeout_secs: u64,
    pub app_env: String,
}

impl Config {
    /// Configurazione con i valori di default, utile per embedding e test
    pub fn new(api_base_url: Url, ws_base_url: Url) -> Self {
        Self {
            api_base_url,
            ws_base_url,
            token: None,
            club_id: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            app_env: "development".to_string(),
        }
    }

    /// Carica la configurazione dalle variabili d'ambiente
    /// Chiama dotenv() automaticamente
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let api_base_url = env::var("CHAT_API_URL").map_err(|_| {
            AppError::invalid_config("CHAT_API_URL must be set in .env file")
        })?;
        let api_base_url = Url::parse(&api_base_url)?;

        let ws_base_url = match env::var("CHAT_WS_URL") {
            Ok(raw) => Url::parse(&raw)?,
            Err(_) => derive_ws_url(&api_base_url)?,
        };

        let token = env::var("CHAT_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        if token.is_none() {
            warn!("CHAT_TOKEN not set, requests will be sent without credentials");
        }

        let club_id = match env::var("CHAT_CLUB_ID") {
            Ok(raw) => Some(raw.parse::<i64>().map_err(|_| {
                AppError::invalid_config("Invalid CHAT_CLUB_ID: must be a number")
            })?),
            Err(_) => None,
        };

        let history_limit = env::var("CHAT_HISTORY_LIMIT")
            .unwrap_or_else(|_| DEFAULT_HISTORY_LIMIT.to_string())
            .parse::<u32>()
            .ok()
            .filter(|limit| *limit > 0)
            .ok_or_else(|| {
                AppError::invalid_config("Invalid CHAT_HISTORY_LIMIT: must be a positive number")
            })?;

        let request_timeout_secs = env::var("CHAT_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| {
                AppError::invalid_config("Invalid CHAT_REQUEST_TIMEOUT_SECS: must be a positive number")
            })?;

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            api_base_url,
            ws_base_url,
            token,
            club_id,
            history_limit,
            request_timeout_secs,
            app_env,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Logga la configurazione (nascondendo il token)
    pub fn print_info(&self) {
        info!("Client configuration:");
        info!("  Environment: {}", self.app_env);
        info!("  API base URL: {}", self.api_base_url);
        info!("  WebSocket base URL: {}", self.ws_base_url);
        info!(
            "  Club: {}",
            self.club_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "not set".to_string())
        );
        info!("  History limit: {}", self.history_limit);
        info!("  Request timeout: {}s", self.request_timeout_secs);
        info!(
            "  Token: {}",
            self.token
                .as_deref()
                .map(Self::mask_token)
                .unwrap_or_else(|| "not set".to_string())
        );
    }

    /// Maschera il token per il logging, lasciando visibili solo gli ultimi caratteri
    fn mask_token(token: &str) -> String {
        let visible: String = token
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        if token.chars().count() <= 8 {
            return "***".to_string();
        }
        format!("***{visible}")
    }
}

/// Ricava l'URL websocket dall'URL REST cambiando lo schema
fn derive_ws_url(api: &Url) -> Result<Url, AppError> {
    let scheme = match api.scheme() {
        "https" => "wss",
        "http" => "ws",
        _ => {
            return Err(AppError::invalid_config(
                "CHAT_API_URL must use http or https",
            ));
        }
    };
    let mut ws = api.clone();
    ws.set_scheme(scheme)
        .map_err(|_| AppError::invalid_config("Unable to derive CHAT_WS_URL"))?;
    Ok(ws)
}
