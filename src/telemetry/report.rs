//! # Telemetry Reporters
//!
//! Output sinks for decoded channels and rejected frames. The decoder only
//! produces data; reporters decide how it is shown.

use std::io::Write;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::FrameError;
use crate::esc::protocol::ChannelReport;

/// Receives per-channel reports and per-frame rejections
pub trait TelemetryReporter {
    /// Called once for every channel that passed the signal gate
    fn channel(&mut self, report: &ChannelReport);

    /// Called once for every rejected frame
    fn rejected(&mut self, error: &FrameError);
}

/// Reports through `tracing` as human-readable log lines
#[derive(Debug, Default)]
pub struct TracingReporter;

impl TelemetryReporter for TracingReporter {
    fn channel(&mut self, report: &ChannelReport) {
        info!(
            "Motor {}: RPM {}, Current {:.2}A, Voltage {:.1}V, MosTemp {}C, CapTemp {}C",
            report.motor_index,
            report.rpm,
            report.current,
            report.voltage,
            report.mos_temp,
            report.cap_temp
        );
    }

    fn rejected(&mut self, error: &FrameError) {
        warn!("{}", error);
    }
}

/// One JSON line
#[derive(Serialize)]
struct JsonRecord<'a, T: Serialize> {
    timestamp: String,
    event: &'static str,
    #[serde(flatten)]
    data: &'a T,
}

/// Writes one JSON object per line to any `Write` sink
///
/// ```text
/// {"timestamp":"2024-05-01T12:00:00.000Z","event":"channel","slot":0,"motor_index":1,"rpm":1000,...}
/// {"timestamp":"2024-05-01T12:00:00.004Z","event":"rejected","reason":"bad_checksum","expected":4660,"calculated":43981}
/// ```
#[derive(Debug)]
pub struct JsonReporter<W: Write> {
    writer: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit<T: Serialize>(&mut self, event: &'static str, data: &T) {
        let record = JsonRecord {
            timestamp: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            event,
            data,
        };

        // Each record goes out as a single write
        let result = serde_json::to_vec(&record)
            .map_err(std::io::Error::from)
            .and_then(|mut line| {
                line.push(b'\n');
                self.writer.write_all(&line)
            })
            .and_then(|_| self.writer.flush());

        if let Err(e) = result {
            warn!("Failed to write telemetry record: {}", e);
        }
    }
}

impl<W: Write> TelemetryReporter for JsonReporter<W> {
    fn channel(&mut self, report: &ChannelReport) {
        self.emit("channel", report);
    }

    fn rejected(&mut self, error: &FrameError) {
        self.emit("rejected", error);
    }
}
