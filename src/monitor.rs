//! # Frame Monitor
//!
//! One poll cycle of the telemetry pipeline: check how many bytes are
//! waiting, resynchronize if the buffer overran, read one frame, validate,
//! decode, and report.
//!
//! Resynchronization is lossy. If more than one frame is pending, the whole
//! input buffer is discarded and nothing is decoded in that cycle; the next
//! frame to arrive starts on a clean buffer.

use tracing::{debug, error};

use crate::error::{EscTelemetryError, FrameError, Result};
use crate::esc::decoder::TelemetryDecoder;
use crate::esc::protocol::FRAME_SIZE;
use crate::serial::ByteSource;
use crate::telemetry::report::TelemetryReporter;
use crate::telemetry::store::TelemetryStore;

/// Result of one poll cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Less than one frame is waiting
    Waiting { available: usize },

    /// More than one frame was waiting and the input buffer was dropped
    Resynced { discarded: usize },

    /// A frame was read and rejected
    Rejected(FrameError),

    /// A frame was decoded; `published` channels passed the gate
    Decoded { published: usize },
}

/// Running counters for status reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorStats {
    pub frames_decoded: u64,
    pub frames_rejected: u64,
    pub resyncs: u64,
    pub bytes_discarded: u64,
    pub channels_published: u64,
}

/// Drives frame reads from an open byte source
///
/// Constructing a monitor requires an already-open source, so the poll loop
/// can never run against a port that failed to open.
#[derive(Debug)]
pub struct FrameMonitor<S: ByteSource> {
    source: S,
    decoder: TelemetryDecoder,
    stats: MonitorStats,
}

impl<S: ByteSource> FrameMonitor<S> {
    pub fn new(source: S, decoder: TelemetryDecoder) -> Self {
        Self {
            source,
            decoder,
            stats: MonitorStats::default(),
        }
    }

    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run one poll cycle
    ///
    /// Frame rejections are reported and returned as
    /// [`PollOutcome::Rejected`]; they are not errors.
    ///
    /// # Errors
    ///
    /// Returns error if the byte source fails. Transport failures are fatal
    /// to the caller's poll loop.
    pub async fn poll(
        &mut self,
        store: &mut TelemetryStore,
        reporter: &mut dyn TelemetryReporter,
    ) -> Result<PollOutcome> {
        let available = self.source.bytes_available()?;

        if available < FRAME_SIZE {
            return Ok(PollOutcome::Waiting { available });
        }

        if available > FRAME_SIZE {
            self.source.discard_pending()?;
            self.stats.resyncs += 1;
            self.stats.bytes_discarded += available as u64;
            debug!("Discarded {} pending bytes to resynchronize", available);
            return Ok(PollOutcome::Resynced { discarded: available });
        }

        let frame = self.source.read_up_to(FRAME_SIZE).await?;

        match self.decoder.decode_frame(&frame, store) {
            Ok(reports) => {
                for report in reports.iter() {
                    reporter.channel(report);
                }
                self.stats.frames_decoded += 1;
                self.stats.channels_published += reports.len() as u64;
                Ok(PollOutcome::Decoded {
                    published: reports.len(),
                })
            }
            Err(e) => {
                reporter.rejected(&e);
                self.stats.frames_rejected += 1;
                Ok(PollOutcome::Rejected(e))
            }
        }
    }

    /// Release the byte source
    pub async fn close(mut self) -> Result<MonitorStats> {
        self.source.close().await?;
        Ok(self.stats)
    }

    /// Release the byte source after the poll loop ends
    ///
    /// `failure` is the error that stopped the loop, if any. It takes
    /// precedence over a close error, which is then only logged.
    pub async fn shutdown(self, failure: Option<EscTelemetryError>) -> Result<MonitorStats> {
        match (self.close().await, failure) {
            (Ok(_), Some(e)) => Err(e),
            (Ok(stats), None) => Ok(stats),
            (Err(close_err), Some(e)) => {
                error!("Failed to close byte source: {}", close_err);
                Err(e)
            }
            (Err(close_err), None) => Err(close_err),
        }
    }
}
