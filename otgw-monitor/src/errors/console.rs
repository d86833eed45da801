#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: '{0}'")]
    Unknown(String),

    #[error("Invalid argument '{value}' for {command}: {reason}")]
    InvalidArgument {
        command: &'static str,
        value: String,
        reason: String,
    },

    #[error("Usage: {0}")]
    Usage(&'static str),
}
