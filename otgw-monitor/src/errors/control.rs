#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("Heating request failed: {0}")]
    Request(#[from] reqwest::Error),
}
