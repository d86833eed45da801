use std::error::Error;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use otgw_api::Frame;
use otgw_api::models::FeedEntry;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::gateway::{GatewayState, MockGateway};
use crate::settings::Settings;
use crate::simulate::BoilerSimulator;

pub mod gateway;
pub mod settings;
pub mod simulate;

pub async fn run(settings: &Arc<Settings>) -> Result<(), Box<dyn Error>> {
    let simulation = &settings.simulation;
    let address = SocketAddr::from((settings.server.host.parse::<IpAddr>()?, settings.server.port));
    let gateway = MockGateway::bind(
        address,
        GatewayState::new(simulation.channel_id, simulation.read_token.clone()),
    )
    .await?;

    let mut simulator = BoilerSimulator::new(simulation.cycle_steps);
    let mut interval = tokio::time::interval(Duration::from_millis(simulation.interval_ms));
    let mut exchange_index: u32 = 0;

    loop {
        interval.tick().await;

        simulator.set_heating_enabled(gateway.heating().await.unwrap_or(true));

        if exchange_index % simulation.sample_every == 0 {
            let entry = sample_entry(&simulator, exchange_index)?;
            tracing::debug!("Sample: {:?}", entry);
            gateway.push_feed(entry).await;
        }

        let exchange = simulator.next_exchange();
        for text in [
            Frame::new('T', exchange.request).to_string(),
            Frame::new('B', exchange.response).to_string(),
        ] {
            tracing::trace!("Send: {}", text);
            gateway.send_text(text);
        }

        exchange_index = exchange_index.wrapping_add(1);
    }
}

fn sample_entry(simulator: &BoilerSimulator, index: u32) -> Result<FeedEntry, Box<dyn Error>> {
    Ok(FeedEntry {
        created_at: OffsetDateTime::now_utc().format(&Rfc3339)?,
        entry_id: Some(index as u64),
        field1: Some((simulator.flow_temperature() * 10.0).round() / 10.0),
        field4: Some(if simulator.flame_on() { 1.0 } else { 0.0 }),
    })
}
