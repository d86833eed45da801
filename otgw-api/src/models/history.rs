use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// `feeds.json` body returned by the history service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedResponse {
    #[serde(default)]
    pub channel: Option<Channel>,
    #[serde(default)]
    pub feeds: Vec<FeedEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Channel {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub last_entry_id: Option<u64>,
}

/// One sample row. Field values arrive as strings, numbers or null.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedEntry {
    pub created_at: String,
    #[serde(default)]
    pub entry_id: Option<u64>,
    /// Boiler temperature
    #[serde(default, deserialize_with = "lenient_number")]
    pub field1: Option<f64>,
    /// Flame indicator
    #[serde(default, deserialize_with = "lenient_number")]
    pub field4: Option<f64>,
}

/// `[timestamp_millis, value]`, serialized as a two element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint(pub i64, pub Option<f64>);

impl TimeSeriesPoint {
    pub fn timestamp_millis(&self) -> i64 {
        self.0
    }

    pub fn value(&self) -> Option<f64> {
        self.1
    }
}

/// The two parallel series the dashboard charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryData {
    pub temperature: Vec<TimeSeriesPoint>,
    pub flame: Vec<TimeSeriesPoint>,
}

impl HistoryData {
    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty() && self.flame.is_empty()
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse().ok(),
        _ => None,
    })
}
