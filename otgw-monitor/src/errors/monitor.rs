use super::{ControlError, FeedError, HistoryError, SettingsError};

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Configuration error: {0}")]
    SettingsError(#[from] SettingsError),

    #[error("Live feed error: {0}")]
    FeedError(#[from] FeedError),

    #[error("History error: {0}")]
    HistoryError(#[from] HistoryError),

    #[error("Control error: {0}")]
    ControlError(#[from] ControlError),

    #[error("Console error: {0}")]
    IoError(#[from] std::io::Error),
}
