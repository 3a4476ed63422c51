//! # ESC Telemetry Protocol Module
//!
//! Implementation of the multi-motor ESC telemetry frame protocol.
//!
//! This module handles:
//! - Frame layout constants and channel record parsing
//! - CRC-16/XMODEM checksum calculation
//! - Frame header and checksum validation
//! - Channel decoding (current, voltage, throttle, RPM, temperature)
//! - Frame encoding

pub mod protocol;
pub mod crc;
pub mod temperature;
pub mod scale;
pub mod frame;
pub mod decoder;
pub mod encoder;
