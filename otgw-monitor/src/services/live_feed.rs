use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use otgw_api::{Frame, LogLine, decode};
use time::{OffsetDateTime, UtcOffset};
use tokio::sync::{Mutex, broadcast, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use crate::errors::FeedError;
use crate::services::transcript::Transcript;

/// Text messages from one open connection. Ends when the peer closes.
pub type MessageStream = BoxStream<'static, Result<String, FeedError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    Connected,
    Line(String),
    Rejected { message: String, reason: String },
    Disconnected,
    RetryScheduled(Duration),
}

#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<MessageStream, FeedError>;
}

pub struct WebSocketConnector {
    url: String,
}

impl WebSocketConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Connector for WebSocketConnector {
    async fn connect(&self) -> Result<MessageStream, FeedError> {
        let (socket, _response) = connect_async(self.url.as_str()).await?;

        let stream = socket.filter_map(|message| async move {
            match message {
                Ok(WsMessage::Text(text)) => Some(Ok(text)),
                Ok(_) => None,
                Err(e) => Some(Err(FeedError::from(e))),
            }
        });

        Ok(stream.boxed())
    }
}

enum Closed {
    Peer,
    Error(FeedError),
    Shutdown,
}

/// Keeps a connection to the gateway open, decoding every inbound frame
/// into the transcript. Reconnects after a fixed delay, forever, until
/// the shutdown signal fires.
pub struct LiveFeed {
    connector: Box<dyn Connector>,
    reconnect_delay: Duration,
    offset: UtcOffset,
    transcript: Arc<Mutex<Transcript>>,
    state: watch::Sender<LinkState>,
    events: broadcast::Sender<FeedEvent>,
}

impl LiveFeed {
    pub fn new(
        connector: Box<dyn Connector>,
        reconnect_delay: Duration,
        offset: UtcOffset,
        transcript: Arc<Mutex<Transcript>>,
    ) -> Self {
        let (state, _) = watch::channel(LinkState::Disconnected);
        let (events, _) = broadcast::channel(256);

        Self {
            connector,
            reconnect_delay,
            offset,
            transcript,
            state,
            events,
        }
    }

    pub fn link_state(&self) -> watch::Receiver<LinkState> {
        self.state.subscribe()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.events.subscribe()
    }

    pub fn events(&self) -> broadcast::Sender<FeedEvent> {
        self.events.clone()
    }

    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        loop {
            if *shutdown.borrow() {
                break;
            }

            tracing::info!("Trying to open a live feed connection...");

            let connected = tokio::select! {
                result = self.connector.connect() => result,
                _ = shutdown.changed() => break,
            };

            match connected {
                Ok(stream) => {
                    self.transition(LinkState::Connected);

                    let closed = self.pump(stream, &mut shutdown).await;
                    self.transition(LinkState::Disconnected);

                    match closed {
                        Closed::Shutdown => break,
                        Closed::Peer => tracing::info!("Live feed connection closed"),
                        Closed::Error(e) => tracing::warn!("Live feed connection lost: {}", e),
                    }
                }
                Err(e) => tracing::warn!("Live feed connection failed: {}", e),
            }

            tracing::debug!("Reconnecting in {:?}", self.reconnect_delay);
            let _ = self.events.send(FeedEvent::RetryScheduled(self.reconnect_delay));

            tokio::select! {
                _ = tokio::time::sleep(self.reconnect_delay) => {}
                _ = shutdown.changed() => break,
            }
        }

        self.transition(LinkState::Disconnected);
        tracing::info!("Live feed stopped");
    }

    async fn pump(&self, mut stream: MessageStream, shutdown: &mut watch::Receiver<bool>) -> Closed {
        loop {
            tokio::select! {
                next = stream.next() => match next {
                    Some(Ok(text)) => self.handle_message(&text).await,
                    Some(Err(e)) => return Closed::Error(e),
                    None => return Closed::Peer,
                },
                _ = shutdown.changed() => return Closed::Shutdown,
            }
        }
    }

    async fn handle_message(&self, text: &str) {
        let frame = match Frame::parse(text) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("Skipping message {:?}: {}", text, e);
                let _ = self.events.send(FeedEvent::Rejected {
                    message: text.to_string(),
                    reason: e.to_string(),
                });
                return;
            }
        };

        let received_at = OffsetDateTime::now_utc().to_offset(self.offset);
        let line = LogLine::new(received_at, decode(frame.raw)).to_string();
        tracing::trace!("Frame {} {:08X}", frame.prefix, frame.raw);

        self.transcript.lock().await.push(line.clone());
        let _ = self.events.send(FeedEvent::Line(line));
    }

    fn transition(&self, next: LinkState) {
        let previous = self.state.send_replace(next);
        if previous == next {
            return;
        }

        let event = match next {
            LinkState::Connected => {
                tracing::info!("Live feed connection opened");
                FeedEvent::Connected
            }
            LinkState::Disconnected => FeedEvent::Disconnected,
        };
        let _ = self.events.send(event);
    }
}
