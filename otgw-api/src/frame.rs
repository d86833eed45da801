use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// One raw OpenTherm frame as received from the gateway.
///
/// On the wire a frame is a text message made of a single source character
/// followed by the 32-bit frame in hexadecimal, e.g. `B40190000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub prefix: char,
    pub raw: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Message carried no characters at all
    Empty,
    /// Prefix present but no hex digits after it
    MissingDigits,
    /// Non-hexadecimal character after the prefix
    InvalidDigit(char),
    /// More significant digits than fit in 32 bits
    Overflow(usize),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty frame message"),
            Self::MissingDigits => write!(f, "Frame message has no hex digits"),
            Self::InvalidDigit(c) => write!(f, "Invalid hex digit: {:?}", c),
            Self::Overflow(digits) => write!(f, "Frame does not fit in 32 bits: {} digits", digits),
        }
    }
}

impl std::error::Error for FrameError {}

impl Frame {
    pub fn new(prefix: char, raw: u32) -> Self {
        Self { prefix, raw }
    }

    /// Parses `<prefix><hex digits>`, discarding the prefix character from the value.
    pub fn parse(message: &str) -> Result<Self, FrameError> {
        let mut chars = message.trim().chars();
        let prefix = chars.next().ok_or(FrameError::Empty)?;
        let digits = chars.as_str();

        if digits.is_empty() {
            return Err(FrameError::MissingDigits);
        }
        if let Some(c) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(FrameError::InvalidDigit(c));
        }

        let significant = digits.trim_start_matches('0');
        if significant.len() > 8 {
            return Err(FrameError::Overflow(significant.len()));
        }

        let raw = if significant.is_empty() {
            0
        } else {
            u32::from_str_radix(significant, 16).map_err(|_| FrameError::Overflow(significant.len()))?
        };

        Ok(Self { prefix, raw })
    }
}

impl FromStr for Frame {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Frame::parse(s)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:08X}", self.prefix, self.raw)
    }
}
