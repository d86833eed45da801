pub mod decoder;
pub mod frame;
pub mod log_line;
pub mod models;
pub mod symbols;

pub use decoder::{DecodedMessage, decode};
pub use frame::{Frame, FrameError};
pub use log_line::{LogLine, LogLineError, ParsedLogLine};
pub use symbols::{MessageType, data_id_name, message_type_name};
