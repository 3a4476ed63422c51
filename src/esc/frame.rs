//! # Frame Validator
//!
//! Checks size, header fields and checksum of a telemetry frame before any
//! channel data is trusted.

use bytes::Buf;

use super::crc::crc16_xmodem;
use super::protocol::*;
use crate::error::FrameError;

/// Parsed frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub head: u8,
    pub length: u8,
    pub version: u8,
    pub command: u8,
    pub reserved: u16,
}

impl FrameHeader {
    /// Parse the 6-byte header (multi-byte fields big-endian)
    fn parse(mut buf: &[u8]) -> Self {
        Self {
            head: buf.get_u8(),
            length: buf.get_u8(),
            version: buf.get_u8(),
            command: buf.get_u8(),
            reserved: buf.get_u16(),
        }
    }

    fn is_expected(&self) -> bool {
        self.head == FRAME_HEAD
            && self.length == FRAME_LENGTH
            && self.version == PROTOCOL_VERSION
            && self.command == CMD_TELEMETRY
    }
}

/// A frame that passed header and checksum validation
#[derive(Debug, Clone, Copy)]
pub struct ValidatedFrame<'a> {
    header: FrameHeader,
    checksum: u16,
    channels: &'a [u8],
}

impl<'a> ValidatedFrame<'a> {
    pub fn header(&self) -> &FrameHeader {
        &self.header
    }

    pub fn checksum(&self) -> u16 {
        self.checksum
    }

    /// The 152-byte channel record block
    pub fn channel_region(&self) -> &'a [u8] {
        self.channels
    }
}

/// Validate one complete telemetry frame
///
/// # Arguments
///
/// * `frame` - Exactly [`FRAME_SIZE`] bytes as read from the byte source
///
/// # Returns
///
/// * `Result<ValidatedFrame, FrameError>` - Validated view, or the rejection reason
///
/// # Errors
///
/// Returns error if:
/// - Frame is not exactly [`FRAME_SIZE`] bytes
/// - Head, length, version or command do not match
/// - Checksum does not match
pub fn validate_frame(frame: &[u8]) -> Result<ValidatedFrame<'_>, FrameError> {
    if frame.len() != FRAME_SIZE {
        return Err(FrameError::Truncated {
            expected: FRAME_SIZE,
            actual: frame.len(),
        });
    }

    let header = FrameHeader::parse(&frame[..HEADER_SIZE]);
    if !header.is_expected() {
        return Err(FrameError::BadHeader {
            head: header.head,
            length: header.length,
            version: header.version,
            command: header.command,
        });
    }

    let expected = (&frame[CHECKSUM_OFFSET..]).get_u16_le();

    // Covers everything between the head byte and the checksum
    let calculated = crc16_xmodem(&frame[1..CHECKSUM_OFFSET]);

    if expected != calculated {
        return Err(FrameError::BadChecksum {
            expected,
            calculated,
        });
    }

    Ok(ValidatedFrame {
        header,
        checksum: expected,
        channels: &frame[CHANNEL_OFFSET..CHANNEL_OFFSET + CHANNEL_REGION_SIZE],
    })
}
