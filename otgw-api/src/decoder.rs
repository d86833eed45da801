use serde::Serialize;

use crate::frame::Frame;
use crate::symbols::{MessageType, data_id_name, message_type_name};

/// Fields extracted from one frame, with their table labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecodedMessage {
    pub frame: u32,
    pub msg_type: u8,
    pub data_id: u8,
    pub data_value: u16,
    pub msg_type_label: Option<&'static str>,
    pub data_id_label: Option<&'static str>,
}

impl DecodedMessage {
    pub fn message_type(&self) -> Option<MessageType> {
        MessageType::from_code(self.msg_type)
    }
}

/// Bits 30..28: shift the parity bit out, then shift right logically.
pub fn msg_type(frame: u32) -> u8 {
    ((frame << 1) >> 29) as u8
}

pub fn data_id(frame: u32) -> u8 {
    ((frame >> 16) & 0xFF) as u8
}

pub fn data_value(frame: u32) -> u16 {
    (frame & 0xFFFF) as u16
}

/// Decodes a frame. Never fails: unknown codes just have no label.
pub fn decode(frame: u32) -> DecodedMessage {
    let msg_type = msg_type(frame);
    let data_id = data_id(frame);

    DecodedMessage {
        frame,
        msg_type,
        data_id,
        data_value: data_value(frame),
        msg_type_label: message_type_name(msg_type),
        data_id_label: data_id_name(data_id),
    }
}

impl From<Frame> for DecodedMessage {
    fn from(frame: Frame) -> Self {
        decode(frame.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Arithmetic-shift rendition used by the browser dashboard.
    fn signed_msg_type(frame: u32) -> i32 {
        ((frame as i32) << 1) >> 29
    }

    #[test]
    fn test_decode_write_tset() {
        let message = decode(0x1001_7000);

        assert_eq!(message.msg_type, 1);
        assert_eq!(message.msg_type_label, Some("WRITE_DATA"));
        assert_eq!(message.data_id, 1);
        assert_eq!(message.data_id_label, Some("TSet"));
        assert_eq!(message.data_value, 0x7000);
    }

    #[test]
    fn test_decode_read_tset() {
        let message = decode(0x0001_0000);

        assert_eq!(message.msg_type, 0);
        assert_eq!(message.msg_type_label, Some("READ_DATA"));
        assert_eq!(message.data_id_label, Some("TSet"));
        assert_eq!(message.data_value, 0);
    }

    #[test]
    fn test_decode_slave_responses() {
        let message = decode(0xC019_2D80);
        assert_eq!(message.message_type(), Some(MessageType::ReadAck));
        assert_eq!(message.data_id_label, Some("Tboiler"));
        assert_eq!(message.data_value, 0x2D80);

        let message = decode(0x7000_0000);
        assert_eq!(message.message_type(), Some(MessageType::UnknownDataId));
        assert_eq!(message.data_id_label, Some("Status"));
    }

    #[test]
    fn test_parity_bit_is_ignored() {
        for frame in [0x0001_0000u32, 0x1001_7000, 0x4019_0000, 0x7000_0000] {
            assert_eq!(msg_type(frame), msg_type(frame | 0x8000_0000));
        }
    }

    #[test]
    fn test_matches_signed_shift_when_bit_30_clear() {
        for frame in [0u32, 0x0001_0000, 0x1001_7000, 0x2FFF_FFFF, 0xB000_0000, 0xBFFF_FFFF] {
            assert_eq!(msg_type(frame) as i32, signed_msg_type(frame));
        }
        // With bit 30 set the signed rendition lands 8 below the table code.
        for frame in [0x4000_0000u32, 0x5019_0000, 0xF000_0000] {
            assert_eq!(msg_type(frame) as i32 - 8, signed_msg_type(frame));
        }
    }

    #[test]
    fn test_field_masks() {
        let mut frame = 0x9E37_79B9u32;
        for _ in 0..1000 {
            assert_eq!(data_id(frame) as u32, (frame >> 16) & 0xFF);
            assert_eq!(data_value(frame) as u32, frame & 0xFFFF);
            assert!(msg_type(frame) <= 7);
            frame = frame.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        }
        assert_eq!(data_id(u32::MAX), 255);
        assert_eq!(data_value(u32::MAX), 65535);
        assert_eq!(msg_type(u32::MAX), 7);
    }

    #[test]
    fn test_unknown_data_id_has_no_label() {
        let message = decode(0x00FF_0000);
        assert_eq!(message.data_id, 255);
        assert_eq!(message.data_id_label, None);

        let message = decode(0x4022_0001);
        assert_eq!(message.data_id, 34);
        assert_eq!(message.data_id_label, None);
        assert_eq!(message.msg_type_label, Some("READ_ACK"));
    }
}
