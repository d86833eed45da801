use core::fmt;

use time::OffsetDateTime;

use crate::decoder::DecodedMessage;
use crate::symbols::UNRESOLVED_LABEL;

/// One transcript entry: a decoded frame stamped with the local time it arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub received_at: OffsetDateTime,
    pub message: DecodedMessage,
}

/// Numeric fields recovered from a formatted transcript line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLogLine {
    pub timestamp: String,
    pub frame: u32,
    pub msg_type: u8,
    pub data_id: u8,
    pub data_value: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLineError {
    MissingField(&'static str),
    InvalidNumber { field: &'static str, value: String },
}

impl fmt::Display for LogLineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "Log line is missing field: {}", field),
            Self::InvalidNumber { field, value } => {
                write!(f, "Invalid number for {}: {:?}", field, value)
            }
        }
    }
}

impl std::error::Error for LogLineError {}

impl LogLine {
    pub fn new(received_at: OffsetDateTime, message: DecodedMessage) -> Self {
        Self { received_at, message }
    }

    pub fn parse(line: &str) -> Result<ParsedLogLine, LogLineError> {
        let (timestamp, rest) = line
            .trim_end()
            .split_once(": ")
            .ok_or(LogLineError::MissingField("timestamp"))?;
        let (frame, rest) = rest
            .split_once(" [msgType: ")
            .ok_or(LogLineError::MissingField("msgType"))?;
        let (msg_type, rest) = rest
            .split_once(" (")
            .ok_or(LogLineError::MissingField("msgType label"))?;
        let (_, rest) = rest
            .split_once("); dataId: ")
            .ok_or(LogLineError::MissingField("dataId"))?;
        let (data_id, rest) = rest
            .split_once(" (")
            .ok_or(LogLineError::MissingField("dataId label"))?;
        let (_, rest) = rest
            .rsplit_once("); dataValue: ")
            .ok_or(LogLineError::MissingField("dataValue"))?;
        let data_value = rest
            .strip_suffix(']')
            .ok_or(LogLineError::MissingField("closing bracket"))?;

        Ok(ParsedLogLine {
            timestamp: timestamp.to_string(),
            frame: parse_number("frame", frame)?,
            msg_type: parse_number("msgType", msg_type)?,
            data_id: parse_number("dataId", data_id)?,
            data_value: parse_number("dataValue", data_value)?,
        })
    }
}

fn parse_number<T: core::str::FromStr>(field: &'static str, value: &str) -> Result<T, LogLineError> {
    value.parse().map_err(|_| LogLineError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = &self.received_at;
        let m = &self.message;

        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}: {} [msgType: {} ({}); dataId: {} ({}); dataValue: {}]",
            t.year(),
            t.month() as u8,
            t.day(),
            t.hour(),
            t.minute(),
            t.second(),
            m.frame,
            m.msg_type,
            m.msg_type_label.unwrap_or(UNRESOLVED_LABEL),
            m.data_id,
            m.data_id_label.unwrap_or(UNRESOLVED_LABEL),
            m.data_value,
        )
    }
}
