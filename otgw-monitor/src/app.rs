use std::sync::Arc;

use otgw_api::models::HistoryData;
use time::{Duration as TimeDuration, OffsetDateTime, UtcOffset};
use tokio::sync::{Mutex, RwLock, broadcast, watch};
use tokio::task::JoinHandle;

use crate::charts::Charts;
use crate::configs::Settings;
use crate::errors::{HistoryError, MonitorError};
use crate::services::{
    Connector, FeedEvent, HeatingControl, HistoryClient, HistoryState, LinkState, LiveFeed, Transcript,
    WebSocketConnector,
};

/// Everything the views read. Owned by [`App`] and handed out by reference.
#[derive(Clone)]
pub struct AppState {
    pub transcript: Arc<Mutex<Transcript>>,
    pub link: watch::Receiver<LinkState>,
    pub history: Arc<RwLock<HistoryState>>,
    pub charts: Arc<Mutex<Charts>>,
}

pub struct App {
    settings: Arc<Settings>,
    offset: UtcOffset,
    state: AppState,
    history_client: HistoryClient,
    heating: HeatingControl,
    events: broadcast::Sender<FeedEvent>,
    feed: Option<LiveFeed>,
    feed_task: Option<JoinHandle<()>>,
    shutdown: watch::Sender<bool>,
}

impl App {
    pub fn new(settings: Arc<Settings>) -> Result<Self, MonitorError> {
        let connector = WebSocketConnector::new(settings.gateway.ws_url());
        Self::with_connector(settings, Box::new(connector))
    }

    /// Validates configuration and wires components. Nothing runs until [`App::start`].
    pub fn with_connector(settings: Arc<Settings>, connector: Box<dyn Connector>) -> Result<Self, MonitorError> {
        settings.validate()?;

        let offset = settings.local_offset();
        let transcript = Arc::new(Mutex::new(Transcript::new(settings.live_feed.transcript_capacity)));
        let feed = LiveFeed::new(
            connector,
            settings.live_feed.reconnect_delay(),
            offset,
            transcript.clone(),
        );
        let history_client = HistoryClient::new(&settings.history, offset)?;
        let heating = HeatingControl::new(&settings.gateway)?;
        let (shutdown, _) = watch::channel(false);

        Ok(Self {
            offset,
            state: AppState {
                transcript,
                link: feed.link_state(),
                history: Arc::new(RwLock::new(HistoryState::Idle)),
                charts: Arc::new(Mutex::new(Charts::default())),
            },
            history_client,
            heating,
            events: feed.events(),
            feed: Some(feed),
            feed_task: None,
            shutdown,
            settings,
        })
    }

    /// Spawns the live feed and loads the initial history window. A failed
    /// history load is logged and left in [`HistoryState::Failed`]. Calling it
    /// twice only reloads history.
    pub async fn start(&mut self) {
        if let Some(feed) = self.feed.take() {
            tracing::info!("Starting live feed from {}", self.settings.gateway.ws_url());
            self.feed_task = Some(tokio::spawn(feed.run(self.shutdown.subscribe())));
        }

        if let Err(e) = self.reload_recent(self.settings.history.range_hours).await {
            tracing::warn!("Initial history load failed: {}", e);
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.events.subscribe()
    }

    pub fn link_state(&self) -> LinkState {
        *self.state.link.borrow()
    }

    /// Fetches a range and pushes it to both charts. Failures land in
    /// [`HistoryState::Failed`] and are returned to the caller as well.
    pub async fn reload_history(&self, from: OffsetDateTime, to: OffsetDateTime) -> Result<HistoryData, HistoryError> {
        *self.state.history.write().await = HistoryState::Loading { from, to };

        match self.history_client.fetch(from, to).await {
            Ok(data) => {
                self.state.charts.lock().await.update(&data);
                *self.state.history.write().await = HistoryState::Ready {
                    from,
                    to,
                    points: data.temperature.len(),
                };
                Ok(data)
            }
            Err(e) => {
                tracing::error!("Failed to load history: {}", e);
                *self.state.history.write().await = HistoryState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Loads the last `hours` up to now.
    pub async fn reload_recent(&self, hours: u32) -> Result<HistoryData, HistoryError> {
        let to = OffsetDateTime::now_utc().to_offset(self.offset);
        let from = to - TimeDuration::hours(hours as i64);

        self.reload_history(from, to).await
    }

    pub fn set_heating(&self, enable: bool) -> JoinHandle<()> {
        self.heating.toggle(enable)
    }

    pub fn heating(&self) -> &HeatingControl {
        &self.heating
    }

    /// Stops the live feed and waits for it to finish.
    pub async fn shutdown(&mut self) {
        let _ = self.shutdown.send(true);

        if let Some(task) = self.feed_task.take() {
            if let Err(e) = task.await {
                tracing::error!("Live feed task failed: {}", e);
            }
        }
    }
}
