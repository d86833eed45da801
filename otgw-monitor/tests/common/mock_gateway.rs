use std::sync::Arc;
use std::time::Duration;

use otgw_mock::gateway::MockGateway;
use otgw_monitor::configs::{Gateway, History, LiveFeed, Logger, Settings};
use otgw_monitor::services::FeedEvent;
use tokio::sync::broadcast;

pub const CHANNEL_ID: u64 = 1000001;
pub const READ_TOKEN: &str = "MOCKREADTOKEN000";

pub async fn start_gateway() -> MockGateway {
    MockGateway::start(CHANNEL_ID, READ_TOKEN).await.unwrap()
}

/// Settings pointing both the live feed and the history client at `gateway`.
pub fn settings_for(gateway: &MockGateway) -> Arc<Settings> {
    Arc::new(Settings {
        logger: Logger {
            level: "debug".to_string(),
        },
        gateway: Gateway {
            host: gateway.address.ip().to_string(),
            port: Some(gateway.address.port()),
            ws_path: "/ws".to_string(),
        },
        live_feed: LiveFeed {
            reconnect_delay_ms: 100,
            transcript_capacity: 50,
        },
        history: History {
            base_url: format!("http://{}", gateway.address),
            channel_id: CHANNEL_ID.to_string(),
            read_token: READ_TOKEN.to_string(),
            range_hours: 2,
            timeout_secs: 5,
            utc_offset_hours: Some(0),
        },
    })
}

pub async fn wait_for_clients(gateway: &MockGateway, count: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while gateway.connected_clients().await != count {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("expected {count} connected clients"));
}

/// Next event matching `accept`, skipping everything else.
pub async fn next_event<F>(events: &mut broadcast::Receiver<FeedEvent>, accept: F) -> FeedEvent
where
    F: Fn(&FeedEvent) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let event = events.recv().await.unwrap();
            if accept(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for a live feed event")
}
