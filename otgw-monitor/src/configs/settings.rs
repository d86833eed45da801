use std::env;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use time::UtcOffset;

use crate::errors::SettingsError;

/// Values shipped in firmware templates before the real ones are filled in.
const PLACEHOLDERS: [&str; 3] = ["`IP_ADDR`", "`READ_TOKEN`", "`CHANNEL_ID`"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gateway {
    pub host: String,
    pub port: Option<u16>,
    pub ws_path: String,
}

impl Gateway {
    pub fn authority(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}{}", self.authority(), self.ws_path)
    }

    pub fn http_url(&self) -> String {
        format!("http://{}", self.authority())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveFeed {
    pub reconnect_delay_ms: u64,
    pub transcript_capacity: usize,
}

impl LiveFeed {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    pub base_url: String,
    pub channel_id: String,
    pub read_token: String,
    pub range_hours: u32,
    pub timeout_secs: u64,
    /// Overrides the detected local offset, in whole hours.
    pub utc_offset_hours: Option<i8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub gateway: Gateway,
    pub live_feed: LiveFeed,
    pub history: History,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());

        Config::builder()
            .add_source(File::with_name("configs/default"))
            .add_source(File::with_name(&format!("configs/{run_mode}")).required(false))
            .add_source(Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Rejects unset or placeholder values before anything is started.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let mut missing = Vec::new();

        if is_unset(&self.gateway.host) {
            missing.push("gateway.host");
        }
        if is_unset(&self.history.read_token) {
            missing.push("history.read_token");
        }
        if is_unset(&self.history.channel_id) {
            missing.push("history.channel_id");
        }

        if !missing.is_empty() {
            return Err(SettingsError::ConfigurationMissing(missing));
        }

        if self.history.channel_id.trim().parse::<u64>().is_err() {
            return Err(invalid("history.channel_id", "must be a numeric channel id"));
        }
        if self.live_feed.reconnect_delay_ms == 0 {
            return Err(invalid("live_feed.reconnect_delay_ms", "must be greater than zero"));
        }
        if self.live_feed.transcript_capacity == 0 {
            return Err(invalid("live_feed.transcript_capacity", "must be greater than zero"));
        }
        if self.history.range_hours == 0 {
            return Err(invalid("history.range_hours", "must be greater than zero"));
        }
        if let Some(hours) = self.history.utc_offset_hours {
            UtcOffset::from_hms(hours, 0, 0)
                .map_err(|e| invalid("history.utc_offset_hours", e.to_string()))?;
        }

        Ok(())
    }

    /// Offset used for transcript timestamps and history ranges.
    pub fn local_offset(&self) -> UtcOffset {
        self.history
            .utc_offset_hours
            .and_then(|hours| UtcOffset::from_hms(hours, 0, 0).ok())
            .or_else(|| UtcOffset::current_local_offset().ok())
            .unwrap_or(UtcOffset::UTC)
    }
}

fn is_unset(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || PLACEHOLDERS.contains(&value)
}

fn invalid(key: &'static str, reason: impl Into<String>) -> SettingsError {
    SettingsError::InvalidValue {
        key,
        reason: reason.into(),
    }
}
