//! Risk normalization for the combined chart.
//!
//! Temperature, smoke and flame readings live on unrelated scales. The
//! combined view maps each onto a dimensionless 0-100 risk score so they can
//! share one axis:
//!
//! | Channel | Raw value | Risk |
//! |---------|-----------|------|
//! | Temperature | 0 °C .. 60 °C | 0 .. 100 |
//! | Smoke | 0 .. 200 | 0 .. 100 |
//! | Flame | 1500 .. 800 | 0 .. 100 |
//!
//! The flame sensor reports LOWER output for a STRONGER flame, so its
//! mapping is inverted. Values outside each range saturate at the nearer
//! bound.

use serde::{Deserialize, Serialize};

/// Temperature that maps to full risk, in °C.
pub const TEMPERATURE_FULL_SCALE_C: f64 = 60.0;
/// Smoke level that maps to full risk.
pub const SMOKE_FULL_SCALE: f64 = 200.0;
/// Flame reading at or above which risk is zero.
pub const FLAME_NO_RISK_RAW: f64 = 1500.0;
/// Flame reading at or below which risk is full.
pub const FLAME_FULL_RISK_RAW: f64 = 800.0;

/// Risk series for the combined chart, aligned with the window labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedRisk {
    pub temperature: Vec<u8>,
    pub smoke: Vec<u8>,
    pub flame: Vec<u8>,
}

/// Clamp a percentage into [0, 100] and round half away from zero.
fn to_score(percent: f64) -> u8 {
    // clamp() passes NaN through; callers sanitize first
    percent.clamp(0.0, 100.0).round() as u8
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[must_use]
pub fn temperature_risk(celsius: f64) -> u8 {
    to_score(sanitize(celsius) / TEMPERATURE_FULL_SCALE_C * 100.0)
}

#[must_use]
pub fn smoke_risk(level: f64) -> u8 {
    to_score(sanitize(level) / SMOKE_FULL_SCALE * 100.0)
}

/// Inverse mapping: 800 is full risk, 1500 is none.
#[must_use]
pub fn flame_risk(raw: f64) -> u8 {
    let span = FLAME_NO_RISK_RAW - FLAME_FULL_RISK_RAW;
    to_score((FLAME_NO_RISK_RAW - sanitize(raw)) / span * 100.0)
}
