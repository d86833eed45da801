use std::error::Error;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    /// Delay between two request/response exchanges
    pub interval_ms: u64,
    /// Exchanges per burner cycle
    pub cycle_steps: u32,
    /// Exchanges between two history samples
    pub sample_every: u32,
    pub channel_id: u64,
    pub read_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub server: Server,
    pub simulation: Simulation,
}

impl Settings {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let settings: Settings = toml::from_str(include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../",
            "configs/mock.toml"
        )))?;

        if settings.simulation.sample_every == 0 {
            return Err("simulation.sample_every must be at least 1".into());
        }

        Ok(settings)
    }
}
