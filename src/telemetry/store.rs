//! Holder for the most recent decoded telemetry sample.

use crate::esc::protocol::TelemetrySample;

/// Latest telemetry sample, overwritten on every gated channel
///
/// The store is owned by whoever drives decoding; no history is kept.
#[derive(Debug, Clone, Default)]
pub struct TelemetryStore {
    latest: TelemetrySample,
    update_count: u64,
}

impl TelemetryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the stored sample
    pub fn update(&mut self, sample: TelemetrySample) {
        self.latest = sample;
        self.update_count += 1;
    }

    /// Most recent sample (all zero before the first update)
    pub fn latest(&self) -> &TelemetrySample {
        &self.latest
    }

    /// Number of updates since creation
    pub fn update_count(&self) -> u64 {
        self.update_count
    }
}
