use std::collections::HashSet;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::ws::{Message as WsMessage, WebSocket};
use axum::extract::{Path, Query, RawQuery, State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use futures::{SinkExt, StreamExt};
use otgw_api::models::{FeedEntry, FeedResponse};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

/// What the gateway pushes to connected live feed clients.
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    Text(String),
    Disconnect,
}

#[derive(Clone)]
pub struct GatewayState {
    pub events: broadcast::Sender<GatewayEvent>,
    pub clients: Arc<RwLock<HashSet<String>>>,
    pub heating: Arc<RwLock<Option<bool>>>,
    pub heating_requests: Arc<RwLock<Vec<bool>>>,
    pub feeds: Arc<RwLock<Vec<FeedEntry>>>,
    pub history_queries: Arc<RwLock<Vec<String>>>,
    pub channel_id: u64,
    pub read_token: String,
}

impl GatewayState {
    pub fn new(channel_id: u64, read_token: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(256);

        Self {
            events,
            clients: Arc::new(RwLock::new(HashSet::new())),
            heating: Arc::new(RwLock::new(None)),
            heating_requests: Arc::new(RwLock::new(Vec::new())),
            feeds: Arc::new(RwLock::new(Vec::new())),
            history_queries: Arc::new(RwLock::new(Vec::new())),
            channel_id,
            read_token: read_token.into(),
        }
    }
}

pub fn gateway_router(state: GatewayState) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/heating-true", get(enable_heating))
        .route("/heating-false", get(disable_heating))
        .route("/channels/:channel_id/feeds.json", get(get_feeds))
        .with_state(state)
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<GatewayState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

async fn handle_websocket(socket: WebSocket, state: GatewayState) {
    let client_id = Uuid::new_v4().to_string();
    let (mut sender, mut receiver) = socket.split();
    let mut events = state.events.subscribe();

    state.clients.write().await.insert(client_id.clone());
    tracing::info!("Live feed client {} connected", client_id);

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(GatewayEvent::Text(text)) => {
                    if sender.send(WsMessage::Text(text)).await.is_err() {
                        break;
                    }
                }
                Ok(GatewayEvent::Disconnect) => {
                    let _ = sender.send(WsMessage::Close(None)).await;
                    break;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Client {} lagged, skipped {} frames", client_id, skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(WsMessage::Close(_))) | None => break,
                Some(Err(e)) => {
                    tracing::warn!("WebSocket error for client {}: {}", client_id, e);
                    break;
                }
                Some(Ok(_)) => {}
            },
        }
    }

    state.clients.write().await.remove(&client_id);
    tracing::info!("Live feed client {} disconnected", client_id);
}

async fn enable_heating(State(state): State<GatewayState>) -> &'static str {
    set_heating(&state, true).await
}

async fn disable_heating(State(state): State<GatewayState>) -> &'static str {
    set_heating(&state, false).await
}

async fn set_heating(state: &GatewayState, enabled: bool) -> &'static str {
    *state.heating.write().await = Some(enabled);
    state.heating_requests.write().await.push(enabled);
    tracing::info!("Heating enable set to {}", enabled);

    "OK"
}

#[derive(Debug, Deserialize)]
struct FeedQuery {
    api_key: Option<String>,
}

async fn get_feeds(
    State(state): State<GatewayState>,
    Path(channel_id): Path<u64>,
    Query(query): Query<FeedQuery>,
    RawQuery(raw): RawQuery,
) -> Response {
    state.history_queries.write().await.push(raw.unwrap_or_default());

    if channel_id != state.channel_id {
        return (StatusCode::NOT_FOUND, "-1").into_response();
    }
    if query.api_key.as_deref() != Some(state.read_token.as_str()) {
        // The service answers a bad key with a bare -1
        return (StatusCode::BAD_REQUEST, "-1").into_response();
    }

    let feeds = state.feeds.read().await.clone();
    Json(FeedResponse { channel: None, feeds }).into_response()
}

/// Handle to a running mock gateway, for tests and the simulator binary.
#[derive(Clone)]
pub struct MockGateway {
    pub address: SocketAddr,
    pub state: GatewayState,
}

impl MockGateway {
    pub async fn bind(address: SocketAddr, state: GatewayState) -> io::Result<Self> {
        let listener = TcpListener::bind(address).await?;
        let address = listener.local_addr()?;
        let app = gateway_router(state.clone());

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Mock gateway stopped: {}", e);
            }
        });

        tracing::info!("mock gateway listening on {:?}", address);

        Ok(Self { address, state })
    }

    /// Binds on an ephemeral localhost port.
    pub async fn start(channel_id: u64, read_token: &str) -> io::Result<Self> {
        Self::bind(SocketAddr::from(([127, 0, 0, 1], 0)), GatewayState::new(channel_id, read_token)).await
    }

    pub fn send_text(&self, text: impl Into<String>) -> usize {
        self.state.events.send(GatewayEvent::Text(text.into())).unwrap_or(0)
    }

    pub fn disconnect_clients(&self) -> usize {
        self.state.events.send(GatewayEvent::Disconnect).unwrap_or(0)
    }

    pub async fn connected_clients(&self) -> usize {
        self.state.clients.read().await.len()
    }

    pub async fn heating(&self) -> Option<bool> {
        *self.state.heating.read().await
    }

    pub async fn heating_requests(&self) -> Vec<bool> {
        self.state.heating_requests.read().await.clone()
    }

    pub async fn set_feeds(&self, feeds: Vec<FeedEntry>) {
        *self.state.feeds.write().await = feeds;
    }

    pub async fn push_feed(&self, entry: FeedEntry) {
        self.state.feeds.write().await.push(entry);
    }

    pub async fn history_queries(&self) -> Vec<String> {
        self.state.history_queries.read().await.clone()
    }
}
