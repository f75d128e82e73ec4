#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{
        Multipart, Path, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get, post, put},
};
use clubchat::{ClientContext, Config, Credentials, SessionState};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, watch};
use url::Url;

pub const TEST_JWT_SECRET: &str = "ilmiobellissimosegretochevaassolutamentecambiato";

/// Utente locale usato dai test
pub const ME: i64 = 5;

/// Frame speciale: il server chiude la connessione che lo riceve
pub const KICK: &str = "__kick__";

/// Richiesta di dutchpay ricevuta dal server finto
#[derive(Debug, Clone, Default)]
pub struct RecordedDutchpay {
    pub room_id: i64,
    pub amount: Option<String>,
    pub note: Option<String>,
    pub participant_user_ids: Vec<i64>,
    pub receipt_name: Option<String>,
    pub receipt_type: Option<String>,
    pub receipt_len: usize,
}

/// Stato condiviso del server finto
#[derive(Default)]
pub struct FakeState {
    pub rooms: Mutex<Vec<Value>>,
    pub rooms_error: AtomicBool,
    pub rooms_queries: Mutex<Vec<Option<String>>>,
    pub auth_headers: Mutex<Vec<Option<String>>>,
    pub history: Mutex<HashMap<i64, Vec<Value>>>,
    pub history_limits: Mutex<Vec<Option<String>>>,
    pub history_delay_ms: Mutex<HashMap<i64, u64>>,
    pub history_failures: Mutex<Vec<i64>>,
    pub http_messages: Mutex<Vec<(i64, Value)>>,
    pub participants: Mutex<HashMap<i64, Value>>,
    pub confirms: Mutex<Vec<(i64, i64, Value)>>,
    pub dutchpays: Mutex<Vec<RecordedDutchpay>>,
    pub votes: Mutex<Vec<(i64, Value)>>,
    pub left: Mutex<Vec<i64>>,
    pub ws_tokens: Mutex<Vec<Option<String>>>,
    pub open_connections: Mutex<HashMap<i64, usize>>,
    pub client_frames: Mutex<Vec<(i64, Value)>>,
    channels: Mutex<HashMap<i64, broadcast::Sender<String>>>,
    next_message_id: AtomicI64,
}

impl FakeState {
    pub fn set_rooms(&self, rooms: Vec<Value>) {
        *self.rooms.lock().unwrap() = rooms;
    }

    pub fn set_history(&self, room_id: i64, messages: Vec<Value>) {
        self.history.lock().unwrap().insert(room_id, messages);
    }

    pub fn delay_history(&self, room_id: i64, millis: u64) {
        self.history_delay_ms.lock().unwrap().insert(room_id, millis);
    }

    pub fn set_participants(&self, room_id: i64, body: Value) {
        self.participants.lock().unwrap().insert(room_id, body);
    }

    /// Invia un frame testuale a tutte le connessioni aperte sulla stanza
    pub fn push_raw(&self, room_id: i64, text: impl Into<String>) -> usize {
        self.channel(room_id).send(text.into()).unwrap_or(0)
    }

    pub fn push_frame(&self, room_id: i64, frame: Value) -> usize {
        self.push_raw(room_id, frame.to_string())
    }

    pub fn open_on(&self, room_id: i64) -> usize {
        self.open_connections
            .lock()
            .unwrap()
            .get(&room_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_open(&self) -> usize {
        self.open_connections.lock().unwrap().values().sum()
    }

    fn channel(&self, room_id: i64) -> broadcast::Sender<String> {
        self.channels
            .lock()
            .unwrap()
            .entry(room_id)
            .or_insert_with(|| broadcast::channel(64).0)
            .clone()
    }

    fn track_connection(&self, room_id: i64, delta: isize) {
        let mut open = self.open_connections.lock().unwrap();
        let count = open.entry(room_id).or_insert(0);
        *count = count.saturating_add_signed(delta);
    }
}

pub struct FakeServer {
    pub addr: SocketAddr,
    pub state: Arc<FakeState>,
}

impl FakeServer {
    /// Avvia il server finto su una porta libera
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::default());
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener without address");

        let app = create_router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server crashed");
        });

        Self { addr, state }
    }

    pub fn config(&self) -> Config {
        let api = Url::parse(&format!("http://{}", self.addr)).unwrap();
        let ws = Url::parse(&format!("ws://{}", self.addr)).unwrap();
        let mut config = Config::new(api, ws);
        config.request_timeout_secs = 5;
        config
    }

    /// Contesto con il token dell'utente `user_id` (o anonimo)
    pub fn context(&self, user_id: Option<i64>) -> Arc<ClientContext> {
        let credentials = match user_id {
            Some(id) => Credentials::bearer(create_test_jwt(id, TEST_JWT_SECRET)),
            None => Credentials::anonymous(),
        };
        Arc::new(ClientContext::new(self.config(), credentials).expect("Failed to create context"))
    }
}

fn create_router(state: Arc<FakeState>) -> Router {
    Router::new()
        .route("/chat/rooms", get(list_rooms))
        .route("/chat/rooms/{room_id}/leave", post(leave_room))
        .route("/chat/rooms/{room_id}/participants", get(list_participants))
        .route(
            "/clubs/{club_id}/events/chats/{room_id}/participants/confirm",
            put(confirm_participants),
        )
        .route("/chats/{room_id}/messages", get(history).post(send_message))
        .route("/dutchpays/{room_id}", post(create_dutchpay))
        .route("/votes/{room_id}", post(create_vote))
        .route("/ws/chat/{room_id}", any(ws_handler))
        .with_state(state)
}

async fn list_rooms(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.auth_headers.lock().unwrap().push(
        headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .map(str::to_string),
    );
    state
        .rooms_queries
        .lock()
        .unwrap()
        .push(query.get("clubId").cloned());

    if state.rooms_error.load(Ordering::SeqCst) {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Club not found" })),
        )
            .into_response();
    }
    Json(Value::Array(state.rooms.lock().unwrap().clone())).into_response()
}

async fn leave_room(State(state): State<Arc<FakeState>>, Path(room_id): Path<i64>) -> StatusCode {
    state.left.lock().unwrap().push(room_id);
    state
        .rooms
        .lock()
        .unwrap()
        .retain(|r| r["id"].as_i64() != Some(room_id));
    StatusCode::NO_CONTENT
}

async fn list_participants(
    State(state): State<Arc<FakeState>>,
    Path(room_id): Path<i64>,
) -> Json<Value> {
    let body = state
        .participants
        .lock()
        .unwrap()
        .get(&room_id)
        .cloned()
        .unwrap_or_else(|| json!({ "participants": [] }));
    Json(body)
}

async fn confirm_participants(
    State(state): State<Arc<FakeState>>,
    Path((club_id, room_id)): Path<(i64, i64)>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.confirms.lock().unwrap().push((club_id, room_id, body));
    Json(json!({ "confirmed": true }))
}

async fn history(
    State(state): State<Arc<FakeState>>,
    Path(room_id): Path<i64>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state
        .history_limits
        .lock()
        .unwrap()
        .push(query.get("limit").cloned());

    if state.history_failures.lock().unwrap().contains(&room_id) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "History unavailable" })),
        )
            .into_response();
    }

    let delay = state.history_delay_ms.lock().unwrap().get(&room_id).copied();
    if let Some(millis) = delay {
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }

    let messages = state
        .history
        .lock()
        .unwrap()
        .get(&room_id)
        .cloned()
        .unwrap_or_default();
    Json(Value::Array(messages)).into_response()
}

async fn send_message(
    State(state): State<Arc<FakeState>>,
    Path(room_id): Path<i64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.http_messages.lock().unwrap().push((room_id, body.clone()));
    let id = state.next_message_id.fetch_add(1, Ordering::SeqCst) + 1000;
    Json(json!({
        "messageId": id,
        "senderUserId": ME,
        "senderName": "me",
        "content": body["content"],
        "createdAt": "2025-03-01T12:00:00"
    }))
}

async fn create_dutchpay(
    State(state): State<Arc<FakeState>>,
    Path(room_id): Path<i64>,
    mut multipart: Multipart,
) -> Response {
    let mut record = RecordedDutchpay {
        room_id,
        ..RecordedDutchpay::default()
    };

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "receipt" => {
                record.receipt_name = field.file_name().map(str::to_string);
                record.receipt_type = field.content_type().map(str::to_string);
                record.receipt_len = field.bytes().await.unwrap().len();
            }
            "amount" => record.amount = Some(field.text().await.unwrap()),
            "note" => record.note = Some(field.text().await.unwrap()),
            "participantUserIds" => {
                let id = field.text().await.unwrap();
                record.participant_user_ids.push(id.parse().unwrap());
            }
            _ => {}
        }
    }

    let amount: f64 = record
        .amount
        .as_deref()
        .and_then(|a| a.parse().ok())
        .unwrap_or_default();
    let count = record.participant_user_ids.len();
    state.dutchpays.lock().unwrap().push(record);

    Json(json!({
        "dutchpayId": 77,
        "amount": amount,
        "perPersonAmount": amount / count.max(1) as f64,
        "participantCount": count
    }))
    .into_response()
}

async fn create_vote(
    State(state): State<Arc<FakeState>>,
    Path(room_id): Path<i64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.votes.lock().unwrap().push((room_id, body.clone()));
    Json(json!({ "voteId": 31, "title": body["title"] }))
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<FakeState>>,
    Path(room_id): Path<i64>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let token = query.get("token").cloned();
    state.ws_tokens.lock().unwrap().push(token.clone());
    let sender = token.as_deref().and_then(user_from_token);
    ws.on_upgrade(move |socket| handle_socket(socket, state, room_id, sender))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<FakeState>, room_id: i64, sender: Option<i64>) {
    let mut rx = state.channel(room_id).subscribe();
    state.track_connection(room_id, 1);

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        let Ok(frame) = serde_json::from_str::<Value>(text.as_str()) else {
                            continue;
                        };
                        state.client_frames.lock().unwrap().push((room_id, frame.clone()));
                        // echo verso tutta la stanza, come farebbe il server reale
                        let id = state.next_message_id.fetch_add(1, Ordering::SeqCst) + 1;
                        state.push_frame(room_id, json!({
                            "type": "CHAT",
                            "roomId": room_id,
                            "messageId": id,
                            "senderUserId": sender,
                            "senderName": "me",
                            "content": frame["content"],
                            "createdAt": "2025-03-01T12:00:00"
                        }));
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
            outgoing = rx.recv() => {
                match outgoing {
                    Ok(text) if text == KICK => {
                        let _ = socket.send(Message::Close(None)).await;
                        break;
                    }
                    Ok(text) => {
                        if socket.send(Message::Text(text.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    state.track_connection(room_id, -1);
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    user_id: i64,
    sub: String,
    exp: usize,
    iat: usize,
}

/// Genera un JWT token per testing
///
/// # Arguments
/// * `user_id` - ID dell'utente per cui generare il token
/// * `jwt_secret` - Secret key per firmare il token
///
/// # Returns
/// Token JWT valido per 24 ore
pub fn create_test_jwt(user_id: i64, jwt_secret: &str) -> String {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};

    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::hours(24))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        user_id,
        sub: user_id.to_string(),
        exp: expiration,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("Failed to create JWT token")
}

fn user_from_token(token: &str) -> Option<i64> {
    use jsonwebtoken::{DecodingKey, Validation, decode};

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims.user_id)
}

/// Stanza in formato server
pub fn room_json(id: i64, kind: &str, created_by: i64) -> Value {
    json!({
        "id": id,
        "name": format!("room-{id}"),
        "type": kind,
        "targetId": 100 + id,
        "memberCount": 4,
        "createdBy": created_by
    })
}

/// Messaggio di storico in formato server
pub fn history_json(id: i64, sender: i64, content: &str, created_at: &str) -> Value {
    json!({
        "messageId": id,
        "senderUserId": sender,
        "senderName": format!("user-{sender}"),
        "content": content,
        "createdAt": created_at
    })
}

/// Attende che lo stato della sessione soddisfi `predicate` (max 5 secondi)
pub async fn wait_for_state(
    rx: &mut watch::Receiver<SessionState>,
    predicate: impl FnMut(&SessionState) -> bool,
) -> SessionState {
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(predicate))
        .await
        .expect("Timed out waiting for session state")
        .expect("Session dropped")
        .clone()
}

/// Attende che `condition` diventi vera (max 5 secondi)
pub async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
