#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Missing configuration: {}", .0.join(", "))]
    ConfigurationMissing(Vec<&'static str>),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
}
