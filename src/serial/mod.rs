//! # Serial Communication Module
//!
//! Handles the serial link to the ESC array.
//!
//! This module handles:
//! - Opening the serial port (8N1, configured baud rate)
//! - Reporting how many bytes are waiting
//! - Timeout-bounded reads of up to one frame
//! - Discarding buffered input for resynchronization

pub mod port_trait;

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use tokio::io::AsyncReadExt;
use tokio::time::Instant;
use tokio_serial::{ClearBuffer, SerialPort, SerialPortBuilderExt};
use tracing::{debug, info, warn};

use crate::config::SerialConfig;
use crate::error::{EscTelemetryError, Result};
pub use port_trait::ByteSource;

/// Port value that selects auto-detection
pub const AUTO_DETECT_PORT: &str = "auto";

/// Default ESC device paths to try (in order of preference)
const DEFAULT_DEVICE_PATHS: &[&str] = &[
    "/dev/ttyUSB0", // USB-to-serial adapters (most common for ESC telemetry)
    "/dev/ttyACM0", // USB CDC devices
];

/// ESC Serial Port Handler
///
/// Owns the serial connection to the ESC array. The handle only exists once
/// the port is open; after [`ByteSource::close`] every operation fails with
/// [`io::ErrorKind::NotConnected`].
pub struct EscSerial {
    /// Serial port handle (`None` once closed)
    port: Option<tokio_serial::SerialStream>,
    /// Device path (e.g., /dev/ttyUSB0)
    device_path: String,
    /// Upper bound for a single read
    read_timeout: Duration,
}

impl std::fmt::Debug for EscSerial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EscSerial")
            .field("device_path", &self.device_path)
            .field("read_timeout", &self.read_timeout)
            .field("open", &self.port.is_some())
            .finish_non_exhaustive()
    }
}

impl EscSerial {
    /// Open the serial port described by `config`
    ///
    /// A port of `"auto"` tries the default device paths in order.
    ///
    /// # Errors
    ///
    /// Returns error if the port cannot be opened
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use esc_telemetry::config::SerialConfig;
    /// use esc_telemetry::serial::EscSerial;
    ///
    /// fn main() -> anyhow::Result<()> {
    ///     let serial = EscSerial::open(&SerialConfig::default())?;
    ///     println!("Connected to: {}", serial.device_path());
    ///     Ok(())
    /// }
    /// ```
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let timeout = Duration::from_millis(config.timeout_ms);

        if config.port == AUTO_DETECT_PORT {
            return Self::open_with_paths(DEFAULT_DEVICE_PATHS, config.baud_rate, timeout);
        }

        let port = Self::open_port(&config.port, config.baud_rate, timeout)?;
        info!("Successfully opened ESC device at {}", config.port);
        Ok(Self {
            port: Some(port),
            device_path: config.port.clone(),
            read_timeout: timeout,
        })
    }

    /// Open the first device path that succeeds
    ///
    /// # Arguments
    ///
    /// * `paths` - Device paths to try (e.g., &["/dev/ttyUSB0"])
    /// * `baud_rate` - Line speed
    /// * `read_timeout` - Upper bound for a single read
    pub fn open_with_paths(paths: &[&str], baud_rate: u32, read_timeout: Duration) -> Result<Self> {
        for path in paths {
            debug!("Trying to open serial port: {}", path);

            match Self::open_port(path, baud_rate, read_timeout) {
                Ok(port) => {
                    info!("Successfully opened ESC device at {}", path);
                    return Ok(Self {
                        port: Some(port),
                        device_path: path.to_string(),
                        read_timeout,
                    });
                }
                Err(e) => {
                    warn!("Failed to open {}: {}", path, e);
                    continue;
                }
            }
        }

        Err(EscTelemetryError::SerialPortNotFound(paths.join(", ")))
    }

    /// Open a specific serial port with 8N1 settings
    fn open_port(path: &str, baud_rate: u32, read_timeout: Duration) -> Result<tokio_serial::SerialStream> {
        let port = tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .timeout(read_timeout)
            .open_native_async()
            .map_err(|e| EscTelemetryError::Serial(format!("Failed to open {}: {}", path, e)))?;

        Ok(port)
    }

    /// Get the device path of the opened serial port
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    fn port(&self) -> io::Result<&tokio_serial::SerialStream> {
        self.port.as_ref().ok_or_else(not_connected)
    }

    fn port_mut(&mut self) -> io::Result<&mut tokio_serial::SerialStream> {
        self.port.as_mut().ok_or_else(not_connected)
    }
}

fn not_connected() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "serial port is closed")
}

#[async_trait]
impl ByteSource for EscSerial {
    fn bytes_available(&self) -> io::Result<usize> {
        Ok(self.port()?.bytes_to_read()? as usize)
    }

    async fn read_up_to(&mut self, count: usize) -> io::Result<Bytes> {
        let deadline = Instant::now() + self.read_timeout;
        let port = self.port_mut()?;

        let mut buf = BytesMut::zeroed(count);
        let mut filled = 0;

        while filled < count {
            match tokio::time::timeout_at(deadline, port.read(&mut buf[filled..])).await {
                Ok(Ok(0)) => break,
                Ok(Ok(n)) => filled += n,
                Ok(Err(e)) => return Err(e),
                Err(_) => {
                    debug!("Read timed out with {}/{} bytes", filled, count);
                    break;
                }
            }
        }

        buf.truncate(filled);
        Ok(buf.freeze())
    }

    fn discard_pending(&mut self) -> io::Result<()> {
        self.port()?.clear(ClearBuffer::Input)?;
        Ok(())
    }

    async fn close(&mut self) -> io::Result<()> {
        if self.port.take().is_some() {
            info!("Closed ESC device at {}", self.device_path);
        }
        Ok(())
    }
}
