//! Level conversions used by the dynamics stage.
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//! - [`amplitude_to_db`] - Sample magnitude to dB with a silence floor

use libm::{expf, logf};

/// Offset added to a sample magnitude before taking its logarithm.
///
/// Keeps `log(0)` out of the gain computer; silence maps to -200 dB.
pub const LEVEL_EPSILON: f32 = 1e-10;

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use wavpress_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// Inputs at or below zero are floored at 1e-10 (-200 dB).
///
/// # Example
/// ```rust
/// use wavpress_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    // 20 * log10(linear) = 20 * ln(linear) / ln(10)
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(LEVEL_EPSILON)) * FACTOR
}

/// Level of a single sample in dB: `20 * log10(|sample| + ε)`.
#[inline]
pub fn amplitude_to_db(sample: f32) -> f32 {
    linear_to_db(sample.abs() + LEVEL_EPSILON)
}

/// One-pole smoothing coefficient for a time constant in seconds.
///
/// `coeff = exp(-1 / (time * sample_rate))`; the follower closes ~63% of
/// the distance to its target after `time` seconds.
#[inline]
pub fn time_constant_coeff(time_seconds: f32, sample_rate: f32) -> f32 {
    expf(-1.0 / (time_seconds * sample_rate))
}
