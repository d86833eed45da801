#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("History request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("History service answered with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed history response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid feed timestamp {value:?}: {source}")]
    InvalidTimestamp {
        value: String,
        source: time::error::Parse,
    },

    #[error("Invalid date range: start is after end")]
    InvalidRange,
}
