//! # ESC Telemetry Library
//!
//! Decode telemetry frames streamed by a multi-motor ESC array.
//!
//! This library provides the frame validation and field decoding pipeline:
//! CRC-16/XMODEM checks, per-channel gating, fixed-point scaling and
//! temperature calibration, plus the serial byte source and reporters that
//! surround it.

pub mod config;
pub mod error;
pub mod esc;
pub mod monitor;
pub mod serial;
pub mod telemetry;
