//! # Error Types
//!
//! Custom error types for the ESC telemetry monitor using `thiserror`.

use serde::Serialize;
use thiserror::Error;

/// Reason a telemetry frame was rejected
///
/// Frame errors are local to one frame: the frame is dropped, reported,
/// and polling continues with the next cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FrameError {
    /// Fewer (or more) bytes than one complete frame
    #[error("Frame size mismatch: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// Head, length, version or command did not match
    #[error("Bad frame header: head 0x{head:02X}, length {length}, version {version}, cmd {command}")]
    BadHeader {
        head: u8,
        length: u8,
        version: u8,
        command: u8,
    },

    /// Trailing checksum disagrees with the computed one
    #[error("Bad CRC: expected 0x{expected:04X}, calculated 0x{calculated:04X}")]
    BadChecksum { expected: u16, calculated: u16 },
}

/// Main error type for the ESC telemetry monitor
#[derive(Debug, Error)]
pub enum EscTelemetryError {
    /// Frame validation errors
    #[error("Frame rejected: {0}")]
    Frame(#[from] FrameError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Serial port errors
    #[error("Serial error: {0}")]
    Serial(String),

    /// None of the candidate serial ports could be opened
    #[error("No ESC serial device found (tried: {0})")]
    SerialPortNotFound(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the ESC telemetry monitor
pub type Result<T> = std::result::Result<T, EscTelemetryError>;
