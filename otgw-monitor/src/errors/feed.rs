use tokio_tungstenite::tungstenite;

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("Connection failed: {0}")]
    Connect(String),
}
