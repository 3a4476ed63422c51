//! # Telemetry Module
//!
//! Holds decoded telemetry and hands it to reporters.
//!
//! This module handles:
//! - Keeping the latest decoded sample (voltage, current, temperature)
//! - Reporting gated channels and rejected frames as log lines or JSON lines

pub mod store;
pub mod report;
