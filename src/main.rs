//! # ESC Telemetry
//!
//! Reads telemetry frames from a multi-motor ESC array over a serial link
//! and reports per-motor voltage, current, RPM and temperature.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info};

use esc_telemetry::config::{Config, ReportFormat};
use esc_telemetry::esc::decoder::TelemetryDecoder;
use esc_telemetry::monitor::FrameMonitor;
use esc_telemetry::serial::EscSerial;
use esc_telemetry::telemetry::report::{JsonReporter, TelemetryReporter, TracingReporter};
use esc_telemetry::telemetry::store::TelemetryStore;

/// Configuration file used when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Load configuration from the first CLI argument, the default file, or built-in defaults
///
/// Returns the configuration and where it came from.
fn load_config() -> Result<(Config, String)> {
    if let Some(path) = std::env::args().nth(1) {
        let config = Config::load(&path).with_context(|| format!("Failed to load config from {}", path))?;
        return Ok((config, path));
    }

    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        let config = Config::load(DEFAULT_CONFIG_PATH)
            .with_context(|| format!("Failed to load config from {}", DEFAULT_CONFIG_PATH))?;
        return Ok((config, DEFAULT_CONFIG_PATH.to_string()));
    }

    Ok((Config::default(), "built-in defaults".to_string()))
}

/// Main entry point for the ESC telemetry monitor
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration
///    - Set up logging with tracing subscriber (stderr when reports are JSON)
///    - Open the serial port (startup fails if it cannot be opened)
///
/// 2. **Main Loop**
///    - Poll the port every `poll_interval_ms` and decode complete frames
///    - Log a status summary every `status_interval_ms`
///    - Handle Ctrl+C for graceful shutdown
///
/// 3. **Shutdown**
///    - Close the serial port, keeping any transport failure as the exit error
///    - Log final frame counters
///
/// # Errors
///
/// Returns error if the configuration is invalid, the serial port cannot be
/// opened, or the port fails while polling.
#[tokio::main]
async fn main() -> Result<()> {
    let (config, config_source) = load_config()?;

    // JSON reports own stdout; logs move to stderr
    let log_sink: Box<dyn Write + Send> = match config.report.format {
        ReportFormat::Text => Box::new(std::io::stdout()),
        ReportFormat::Json => Box::new(std::io::stderr()),
    };
    let (writer, _guard) = tracing_appender::non_blocking(log_sink);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    info!("ESC Telemetry v{} starting...", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded from {}", config_source);

    let serial = EscSerial::open(&config.serial)?;
    info!("ESC serial port opened at: {} ({} baud)", serial.device_path(), config.serial.baud_rate);

    let mut reporter: Box<dyn TelemetryReporter> = match config.report.format {
        ReportFormat::Text => Box::new(TracingReporter),
        ReportFormat::Json => Box::new(JsonReporter::new(std::io::stdout())),
    };

    let decoder = TelemetryDecoder::from_config(&config.esc)?;
    let mut monitor = FrameMonitor::new(serial, decoder);
    let mut store = TelemetryStore::new();

    let mut poll_interval = interval(Duration::from_millis(config.serial.poll_interval_ms));
    poll_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut status_interval = interval(Duration::from_millis(config.report.status_interval_ms));

    info!("Polling for telemetry frames every {}ms", config.serial.poll_interval_ms);
    info!("Press Ctrl+C to exit");

    let mut failure = None;

    // Main poll loop
    loop {
        tokio::select! {
            _ = poll_interval.tick() => {
                if let Err(e) = monitor.poll(&mut store, reporter.as_mut()).await {
                    error!("Serial transport failed: {}", e);
                    failure = Some(e);
                    break;
                }
            }

            _ = status_interval.tick() => {
                let stats = monitor.stats();
                let latest = store.latest();
                info!(
                    "Frames: {} decoded, {} rejected, {} resyncs | Latest: {:.1}V {:.2}A {:.1}C",
                    stats.frames_decoded,
                    stats.frames_rejected,
                    stats.resyncs,
                    latest.voltage,
                    latest.current,
                    latest.temperature_cdeg as f32 / 100.0
                );
            }

            // Handle Ctrl+C for graceful shutdown
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    let stats = monitor.shutdown(failure).await?;
    info!(
        "Total frames decoded: {}, rejected: {}, channels published: {}",
        stats.frames_decoded, stats.frames_rejected, stats.channels_published
    );

    Ok(())
}
