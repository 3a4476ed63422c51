//! # ESC Telemetry Protocol Constants and Types
//!
//! Wire layout of one telemetry frame (164 bytes):
//!
//! ```text
//! offset  size  field
//!      0     1  head        (0x9B)
//!      1     1  length      (158)
//!      2     1  version     (1)
//!      3     1  command     (2)
//!      4     2  reserved    (big-endian, ignored)
//!      6     1  pad
//!      7   152  channels    (8 x 19-byte records)
//!    159     3  pad
//!    162     2  checksum    (little-endian CRC-16/XMODEM over bytes 1..162)
//! ```

use bytes::{Buf, BufMut};
use serde::Serialize;

/// Frame head marker
pub const FRAME_HEAD: u8 = 0x9B;

/// Declared frame length carried in the length byte
pub const FRAME_LENGTH: u8 = 158;

/// Supported protocol version
pub const PROTOCOL_VERSION: u8 = 1;

/// Telemetry command identifier
pub const CMD_TELEMETRY: u8 = 2;

/// Bytes on the wire not counted by the length byte
pub const FRAME_OVERHEAD: usize = 6;

/// Total frame size on the wire
pub const FRAME_SIZE: usize = FRAME_LENGTH as usize + FRAME_OVERHEAD;

/// Header size: head + length + version + command + reserved(2)
pub const HEADER_SIZE: usize = 6;

/// Offset of the first channel record
pub const CHANNEL_OFFSET: usize = 7;

/// Size of one channel record
pub const CHANNEL_RECORD_SIZE: usize = 19;

/// Number of channel records per frame
pub const NUM_CHANNELS: usize = 8;

/// Size of the channel block
pub const CHANNEL_REGION_SIZE: usize = CHANNEL_RECORD_SIZE * NUM_CHANNELS;

/// Size of the trailing checksum
pub const CHECKSUM_SIZE: usize = 2;

/// Offset of the trailing checksum
pub const CHECKSUM_OFFSET: usize = FRAME_SIZE - CHECKSUM_SIZE;

/// Default motor pole count used to turn eRPM into RPM
pub const DEFAULT_POLE_COUNT: u32 = 1;

/// One raw 19-byte channel record, fields as they appear on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawChannel {
    /// Channel tag byte
    pub tag: u8,

    /// Motor index reported by the ESC (advisory)
    pub motor_index: u16,

    /// Input throttle code (32768 = full)
    pub input_throttle: u16,

    /// Output throttle code (32768 = full)
    pub output_throttle: u16,

    /// Electrical RPM code (eRPM / 10)
    pub erpm: u16,

    /// Voltage code in decivolts
    pub voltage: u16,

    /// Current code in 1/64 A
    pub current: i16,

    /// Phase current code in 1/64 A
    pub phase_current: i16,

    /// MOSFET temperature sensor code
    pub mos_temp: u8,

    /// Capacitor temperature sensor code
    pub cap_temp: u8,

    /// Status word
    pub status: u16,
}

impl RawChannel {
    /// Parse a channel record from the front of `buf`
    ///
    /// The caller guarantees at least [`CHANNEL_RECORD_SIZE`] bytes remain.
    pub fn parse<B: Buf>(buf: &mut B) -> Self {
        Self {
            tag: buf.get_u8(),
            motor_index: buf.get_u16(),
            input_throttle: buf.get_u16(),
            output_throttle: buf.get_u16(),
            erpm: buf.get_u16(),
            voltage: buf.get_u16(),
            current: buf.get_i16(),
            phase_current: buf.get_i16(),
            mos_temp: buf.get_u8(),
            cap_temp: buf.get_u8(),
            status: buf.get_u16(),
        }
    }

    /// Append the big-endian wire form of this record to `buf`
    pub fn write_to<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.tag);
        buf.put_u16(self.motor_index);
        buf.put_u16(self.input_throttle);
        buf.put_u16(self.output_throttle);
        buf.put_u16(self.erpm);
        buf.put_u16(self.voltage);
        buf.put_i16(self.current);
        buf.put_i16(self.phase_current);
        buf.put_u8(self.mos_temp);
        buf.put_u8(self.cap_temp);
        buf.put_u16(self.status);
    }
}

/// Latest decoded telemetry sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TelemetrySample {
    /// Battery voltage in volts
    pub voltage: f32,

    /// Current draw in amperes
    pub current: f32,

    /// MOSFET temperature in centi-degrees
    pub temperature_cdeg: i32,
}

/// Decoded view of one gated channel, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelReport {
    /// Slot position within the frame (0..8)
    pub slot: usize,

    /// Motor index reported by the ESC
    pub motor_index: u16,

    /// Mechanical RPM
    pub rpm: u32,

    /// Current in amperes
    pub current: f32,

    /// Phase current in amperes
    pub phase_current: f32,

    /// Voltage in volts
    pub voltage: f32,

    /// Input throttle ratio (0.0 - 1.0)
    pub input_throttle: f32,

    /// Output throttle ratio (0.0 - 1.0)
    pub output_throttle: f32,

    /// MOSFET temperature in degrees
    pub mos_temp: u8,

    /// Capacitor temperature in degrees
    pub cap_temp: u8,

    /// Raw status word
    pub status: u16,
}
