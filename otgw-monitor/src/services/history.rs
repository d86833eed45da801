use std::time::Duration;

use otgw_api::models::{FeedResponse, HistoryData, TimeSeriesPoint};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

use crate::configs::History;
use crate::errors::HistoryError;

/// Loading state of the charted history window.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum HistoryState {
    #[default]
    Idle,
    Loading {
        from: OffsetDateTime,
        to: OffsetDateTime,
    },
    Ready {
        from: OffsetDateTime,
        to: OffsetDateTime,
        points: usize,
    },
    Failed(String),
}

/// Client for the channel feed of the external time-series service.
#[derive(Clone)]
pub struct HistoryClient {
    http: reqwest::Client,
    base_url: String,
    channel_id: String,
    read_token: String,
    offset: UtcOffset,
}

impl HistoryClient {
    pub fn new(settings: &History, offset: UtcOffset) -> Result<Self, HistoryError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            channel_id: settings.channel_id.trim().to_string(),
            read_token: settings.read_token.clone(),
            offset,
        })
    }

    /// `feeds.json` URL for a range. Start and end go out as local wall-clock
    /// time, with the offset telling the service which zone they are in.
    pub fn request_url(&self, from: OffsetDateTime, to: OffsetDateTime) -> String {
        format!(
            "{}/channels/{}/feeds.json?api_key={}&offset={}&start={}&end={}",
            self.base_url,
            self.channel_id,
            self.read_token,
            offset_hours(self.offset),
            format_request_time(from, self.offset),
            format_request_time(to, self.offset),
        )
    }

    pub async fn fetch(&self, from: OffsetDateTime, to: OffsetDateTime) -> Result<HistoryData, HistoryError> {
        if from > to {
            return Err(HistoryError::InvalidRange);
        }

        let url = self.request_url(from, to);
        tracing::debug!("Fetching history for channel {}", self.channel_id);

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(HistoryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let feed: FeedResponse = serde_json::from_str(&body)?;
        let data = into_history(feed)?;

        tracing::info!(
            "Fetched {} history samples for channel {}",
            data.temperature.len(),
            self.channel_id
        );

        Ok(data)
    }
}

/// Splits feed entries into the temperature (`field1`) and flame (`field4`) series.
pub fn into_history(feed: FeedResponse) -> Result<HistoryData, HistoryError> {
    let mut data = HistoryData {
        temperature: Vec::with_capacity(feed.feeds.len()),
        flame: Vec::with_capacity(feed.feeds.len()),
    };

    for entry in feed.feeds {
        let created_at = OffsetDateTime::parse(&entry.created_at, &Rfc3339).map_err(|source| {
            HistoryError::InvalidTimestamp {
                value: entry.created_at.clone(),
                source,
            }
        })?;
        let timestamp = (created_at.unix_timestamp_nanos() / 1_000_000) as i64;

        data.temperature.push(TimeSeriesPoint(timestamp, entry.field1));
        data.flame.push(TimeSeriesPoint(timestamp, entry.field4));
    }

    Ok(data)
}

/// `YYYY-MM-DD%20HH:MM` in the given offset.
pub fn format_request_time(at: OffsetDateTime, offset: UtcOffset) -> String {
    let local = at.to_offset(offset);

    format!(
        "{:04}-{:02}-{:02}%20{:02}:{:02}",
        local.year(),
        local.month() as u8,
        local.day(),
        local.hour(),
        local.minute(),
    )
}

fn offset_hours(offset: UtcOffset) -> String {
    let minutes = offset.whole_minutes();

    if minutes % 60 == 0 {
        (minutes / 60).to_string()
    } else {
        format!("{}", minutes as f64 / 60.0)
    }
}
