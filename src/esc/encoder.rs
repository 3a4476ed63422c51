//! # Telemetry Frame Encoder
//!
//! Builds well-formed telemetry frames from raw channel records, in the
//! layout the ESC transmits.

use bytes::{BufMut, Bytes, BytesMut};

use super::crc::crc16_xmodem;
use super::protocol::*;

/// Encode eight channel records into a complete telemetry frame
///
/// # Arguments
///
/// * `channels` - Channel records in slot order
///
/// # Returns
///
/// * `Bytes` - Complete frame (164 bytes: header + pad + channels + pad + checksum)
///
/// # Examples
///
/// ```
/// use esc_telemetry::esc::encoder::encode_frame;
/// use esc_telemetry::esc::protocol::{RawChannel, FRAME_SIZE, NUM_CHANNELS};
///
/// let frame = encode_frame(&[RawChannel::default(); NUM_CHANNELS]);
/// assert_eq!(frame.len(), FRAME_SIZE);
/// ```
pub fn encode_frame(channels: &[RawChannel; NUM_CHANNELS]) -> Bytes {
    let mut frame = BytesMut::with_capacity(FRAME_SIZE);

    frame.put_u8(FRAME_HEAD);
    frame.put_u8(FRAME_LENGTH);
    frame.put_u8(PROTOCOL_VERSION);
    frame.put_u8(CMD_TELEMETRY);
    frame.put_u16(0); // Reserved
    frame.put_bytes(0, CHANNEL_OFFSET - HEADER_SIZE);

    for channel in channels.iter() {
        channel.write_to(&mut frame);
    }

    frame.put_bytes(0, CHECKSUM_OFFSET - frame.len());

    // Checksum over Length through the trailing pad
    let crc = crc16_xmodem(&frame[1..]);
    frame.put_u16_le(crc);

    frame.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_frame_size() {
        let frame = encode_frame(&[RawChannel::default(); NUM_CHANNELS]);
        assert_eq!(frame.len(), FRAME_SIZE);
    }

    #[test]
    fn test_encode_frame_header() {
        let frame = encode_frame(&[RawChannel::default(); NUM_CHANNELS]);
        assert_eq!(&frame[..6], &[0x9B, 158, 1, 2, 0, 0]);
    }

    #[test]
    fn test_encode_frame_channel_placement() {
        let mut channels = [RawChannel::default(); NUM_CHANNELS];
        channels[0].tag = 0x11;
        channels[7].status = 0xBEEF;

        let frame = encode_frame(&channels);
        assert_eq!(frame[CHANNEL_OFFSET], 0x11);

        let last = CHANNEL_OFFSET + 7 * CHANNEL_RECORD_SIZE;
        assert_eq!(&frame[last + 17..last + 19], &[0xBE, 0xEF]);
    }

    #[test]
    fn test_encode_frame_checksum_little_endian() {
        let frame = encode_frame(&[RawChannel::default(); NUM_CHANNELS]);
        let crc = crc16_xmodem(&frame[1..CHECKSUM_OFFSET]);
        assert_eq!(frame[CHECKSUM_OFFSET], (crc & 0xFF) as u8);
        assert_eq!(frame[CHECKSUM_OFFSET + 1], (crc >> 8) as u8);
    }
}
