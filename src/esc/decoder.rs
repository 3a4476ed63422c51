//! # Telemetry Decoder
//!
//! Walks the channel records of a validated frame, drops idle slots, and
//! publishes the rest to the telemetry store.

use std::num::NonZeroU32;

use serde::de::Error;

use super::frame::validate_frame;
use super::protocol::*;
use super::scale::{decode_current, decode_throttle, decode_voltage, erpm_to_rpm};
use super::temperature::decode_temperature;
use crate::config::EscConfig;
use crate::error::{EscTelemetryError, FrameError, Result};
use crate::telemetry::store::TelemetryStore;

/// Decodes channel records using a fixed motor pole count
#[derive(Debug, Clone, Copy)]
pub struct TelemetryDecoder {
    pole_count: NonZeroU32,
}

impl Default for TelemetryDecoder {
    fn default() -> Self {
        Self::new(NonZeroU32::new(DEFAULT_POLE_COUNT).unwrap_or(NonZeroU32::MIN))
    }
}

impl TelemetryDecoder {
    /// Create a decoder for motors with `pole_count` poles
    pub fn new(pole_count: NonZeroU32) -> Self {
        Self { pole_count }
    }

    /// Create a decoder from the `[esc]` configuration section
    ///
    /// # Errors
    ///
    /// Returns error if `pole_count` is zero
    pub fn from_config(config: &EscConfig) -> Result<Self> {
        let pole_count = NonZeroU32::new(config.pole_count).ok_or_else(|| {
            EscTelemetryError::Config(toml::de::Error::custom("pole_count must be greater than 0"))
        })?;
        Ok(Self::new(pole_count))
    }

    pub fn pole_count(&self) -> u32 {
        self.pole_count.get()
    }

    /// Validate a raw frame and decode its channels
    ///
    /// # Errors
    ///
    /// Returns the validation error if the frame is rejected. The store is
    /// left untouched in that case.
    pub fn decode_frame(
        &self,
        frame: &[u8],
        store: &mut TelemetryStore,
    ) -> std::result::Result<Vec<ChannelReport>, FrameError> {
        let validated = validate_frame(frame)?;
        Ok(self.decode_channels(validated.channel_region(), store))
    }

    /// Decode the channel block of a validated frame
    ///
    /// Records are processed in slot order 0..8. Every channel that passes
    /// the signal gate overwrites the store, so the last gated slot wins.
    ///
    /// # Arguments
    ///
    /// * `region` - The 152-byte channel block
    /// * `store` - Store receiving (voltage, current, MOSFET temp in centi-degrees)
    ///
    /// # Returns
    ///
    /// * `Vec<ChannelReport>` - One report per gated channel, in slot order
    pub fn decode_channels(&self, region: &[u8], store: &mut TelemetryStore) -> Vec<ChannelReport> {
        let mut reports = Vec::with_capacity(NUM_CHANNELS);

        for (slot, mut record) in region
            .chunks_exact(CHANNEL_RECORD_SIZE)
            .take(NUM_CHANNELS)
            .enumerate()
        {
            let raw = RawChannel::parse(&mut record);

            let Some(report) = self.decode_channel(slot, &raw) else {
                continue;
            };

            store.update(TelemetrySample {
                voltage: report.voltage,
                current: report.current,
                temperature_cdeg: report.mos_temp as i32 * 100,
            });
            reports.push(report);
        }

        reports
    }

    /// Decode a single record, or `None` if the slot carries no signal
    ///
    /// A slot is published when it reports voltage, positive current or
    /// rotation, or when its motor index is above 1.
    pub fn decode_channel(&self, slot: usize, raw: &RawChannel) -> Option<ChannelReport> {
        let rpm = erpm_to_rpm(raw.erpm, self.pole_count.get());

        if !(raw.voltage > 0 || raw.current > 0 || rpm > 0 || raw.motor_index > 1) {
            return None;
        }

        Some(ChannelReport {
            slot,
            motor_index: raw.motor_index,
            rpm,
            current: decode_current(raw.current),
            phase_current: decode_current(raw.phase_current),
            voltage: decode_voltage(raw.voltage),
            input_throttle: decode_throttle(raw.input_throttle),
            output_throttle: decode_throttle(raw.output_throttle),
            mos_temp: decode_temperature(raw.mos_temp),
            cap_temp: decode_temperature(raw.cap_temp),
            status: raw.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::esc::encoder::encode_frame;

    fn decoder_with_poles(pole_count: u32) -> TelemetryDecoder {
        TelemetryDecoder::from_config(&EscConfig { pole_count }).unwrap()
    }

    fn idle_channels() -> [RawChannel; NUM_CHANNELS] {
        let mut channels = [RawChannel::default(); NUM_CHANNELS];
        for (i, channel) in channels.iter_mut().enumerate() {
            // Motor indices 0 and 1 alone never pass the gate
            channel.motor_index = (i % 2) as u16;
        }
        channels
    }

    #[test]
    fn test_idle_channel_is_gated() {
        let decoder = TelemetryDecoder::default();
        for motor_index in [0u16, 1] {
            let raw = RawChannel {
                motor_index,
                ..Default::default()
            };
            assert!(decoder.decode_channel(0, &raw).is_none());
        }
    }

    #[test]
    fn test_motor_index_above_one_passes_gate() {
        let decoder = TelemetryDecoder::default();
        let raw = RawChannel {
            motor_index: 2,
            ..Default::default()
        };

        let report = decoder.decode_channel(3, &raw).unwrap();
        assert_eq!(report.slot, 3);
        assert_eq!(report.motor_index, 2);
        assert_eq!(report.voltage, 0.0);
    }

    #[test]
    fn test_each_signal_field_passes_gate() {
        let decoder = TelemetryDecoder::default();
        let cases = [
            RawChannel { voltage: 1, ..Default::default() },
            RawChannel { current: 1, ..Default::default() },
            RawChannel { erpm: 1, ..Default::default() },
        ];

        for raw in cases.iter() {
            assert!(decoder.decode_channel(0, raw).is_some(), "should pass: {:?}", raw);
        }
    }

    #[test]
    fn test_negative_current_alone_is_gated() {
        let decoder = TelemetryDecoder::default();
        let raw = RawChannel {
            current: -64,
            ..Default::default()
        };
        assert!(decoder.decode_channel(0, &raw).is_none());
    }

    #[test]
    fn test_rpm_floored_before_gate() {
        // 1 eRPM code over 14 poles floors to 0 RPM, so the slot stays idle
        let decoder = decoder_with_poles(14);
        let raw = RawChannel {
            erpm: 1,
            ..Default::default()
        };
        assert!(decoder.decode_channel(0, &raw).is_none());
    }

    #[test]
    fn test_default_decoder_uses_one_pole() {
        assert_eq!(TelemetryDecoder::default().pole_count(), DEFAULT_POLE_COUNT);
    }

    #[test]
    fn test_zero_pole_count_rejected() {
        let result = TelemetryDecoder::from_config(&EscConfig { pole_count: 0 });
        assert!(matches!(result, Err(EscTelemetryError::Config(_))));
    }

    #[test]
    fn test_rpm_from_configured_pole_count() {
        let decoder = decoder_with_poles(14);
        let raw = RawChannel {
            erpm: 1400,
            ..Default::default()
        };
        assert_eq!(decoder.decode_channel(0, &raw).unwrap().rpm, 1000);
    }

    #[test]
    fn test_decode_channel_scales_fields() {
        let decoder = decoder_with_poles(4);
        let raw = RawChannel {
            tag: 0,
            motor_index: 1,
            input_throttle: 16384,
            output_throttle: 32768,
            erpm: 100,
            voltage: 500,
            current: -128,
            phase_current: 64,
            mos_temp: 240,
            cap_temp: 30,
            status: 7,
        };

        let report = decoder.decode_channel(0, &raw).unwrap();
        assert_eq!(report.rpm, 250);
        assert_eq!(report.current, -2.0);
        assert_eq!(report.phase_current, 1.0);
        assert!((report.voltage - 50.0).abs() < 0.001);
        assert!((report.input_throttle - 0.5).abs() < 0.0001);
        assert_eq!(report.output_throttle, 1.0);
        assert_eq!(report.mos_temp, 1);
        assert_eq!(report.cap_temp, 130);
        assert_eq!(report.status, 7);
    }

    #[test]
    fn test_decode_channels_updates_store_per_gated_channel() {
        let decoder = TelemetryDecoder::default();
        let mut channels = idle_channels();
        channels[2].voltage = 168;
        channels[2].current = 640;
        channels[2].mos_temp = 200;
        channels[5].voltage = 165;
        channels[5].current = 320;
        channels[5].mos_temp = 240;

        let frame = encode_frame(&channels);
        let mut store = TelemetryStore::new();
        let reports = decoder.decode_frame(&frame, &mut store).unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].slot, 2);
        assert_eq!(reports[1].slot, 5);
        assert_eq!(store.update_count(), 2);

        // Last gated slot wins
        let latest = store.latest();
        assert!((latest.voltage - 16.5).abs() < 0.001);
        assert_eq!(latest.current, 5.0);
        assert_eq!(latest.temperature_cdeg, 100);
    }

    #[test]
    fn test_decode_channels_all_idle_leaves_store_untouched() {
        let decoder = TelemetryDecoder::default();
        let frame = encode_frame(&idle_channels());
        let mut store = TelemetryStore::new();

        let reports = decoder.decode_frame(&frame, &mut store).unwrap();
        assert!(reports.is_empty());
        assert_eq!(store.update_count(), 0);
        assert_eq!(*store.latest(), TelemetrySample::default());
    }

    #[test]
    fn test_decode_frame_rejection_leaves_store_untouched() {
        let decoder = TelemetryDecoder::default();
        let mut channels = idle_channels();
        channels[0].voltage = 100;

        let mut frame = encode_frame(&channels).to_vec();
        frame[CHECKSUM_OFFSET + 1] ^= 0x01;

        let mut store = TelemetryStore::new();
        let result = decoder.decode_frame(&frame, &mut store);

        assert!(matches!(result, Err(FrameError::BadChecksum { .. })));
        assert_eq!(store.update_count(), 0);
    }

    #[test]
    fn test_motor_index_does_not_reorder() {
        let decoder = TelemetryDecoder::default();
        let mut channels = idle_channels();
        channels[0].motor_index = 7;
        channels[1].motor_index = 3;

        let frame = encode_frame(&channels);
        let mut store = TelemetryStore::new();
        let reports = decoder.decode_frame(&frame, &mut store).unwrap();

        let order: Vec<(usize, u16)> = reports.iter().map(|r| (r.slot, r.motor_index)).collect();
        assert_eq!(order, vec![(0, 7), (1, 3)]);
    }
}
