//! Soft-knee dynamics compressor for offline buffers.
//!
//! A feed-forward compressor that reduces dynamic range by attenuating
//! samples above a threshold. Each channel is processed independently with
//! its own smoothing state.
//!
//! # Signal Flow
//!
//! ```text
//! |x| → dB → Gain Computer → Attack/Release Follower → dB → linear → × x
//! ```
//!
//! # Gain computer
//!
//! With threshold `T`, knee width `W`, and ratio `R`, the static reduction
//! for an input level `L` (all in dB) is:
//!
//! | Region | Reduction |
//! |--------|-----------|
//! | `L ≤ T − W/2` | 0 |
//! | `L ≥ T + W/2` | `(L − T)(1 − 1/R)` |
//! | knee | `(1 − 1/R)(L − T + W/2)² / 2W` |
//!
//! The quadratic meets both straight segments with matching value and
//! slope, so the curve is continuous for every valid config.
//!
//! The compressor never clamps: output only exceeds `[-1, 1]` where the
//! input already did. Clamping is left to 16-bit quantization.

use crate::buffer::SampleBuffer;
use crate::config::CompressionConfig;
use crate::envelope::EnvelopeFollower;
use crate::error::Result;
use crate::math::{amplitude_to_db, db_to_linear};

/// Static gain-reduction curve with a quadratic soft knee.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainComputer {
    threshold_db: f32,
    knee_db: f32,
    slope: f32,
}

impl GainComputer {
    /// Build the curve for a validated config.
    pub fn new(config: &CompressionConfig) -> Self {
        Self {
            threshold_db: config.threshold_db(),
            knee_db: config.knee_db(),
            slope: 1.0 - 1.0 / config.ratio(),
        }
    }

    /// Gain reduction in dB (non-negative) for an input level in dB.
    ///
    /// # Example
    ///
    /// ```rust
    /// use wavpress_core::{CompressionConfig, GainComputer};
    ///
    /// let cfg = CompressionConfig::new(-20.0, 0.0, 4.0, 0.01, 0.1).unwrap();
    /// let curve = GainComputer::new(&cfg);
    /// assert_eq!(curve.reduction_db(-30.0), 0.0);
    /// assert!((curve.reduction_db(-12.0) - 6.0).abs() < 1e-5);
    /// ```
    #[inline]
    pub fn reduction_db(&self, level_db: f32) -> f32 {
        let half_knee = self.knee_db / 2.0;
        let overshoot = level_db - self.threshold_db;

        if overshoot <= -half_knee {
            0.0
        } else if overshoot >= half_knee {
            overshoot * self.slope
        } else {
            let x = overshoot + half_knee;
            self.slope * x * x / (2.0 * self.knee_db)
        }
    }
}

/// Stateful single-channel compressor.
///
/// # Example
///
/// ```rust
/// use wavpress_core::{CompressionConfig, Compressor};
///
/// let mut comp = Compressor::new(&CompressionConfig::upload(), 44100.0);
/// let mut output = 0.0;
/// for _ in 0..4410 {
///     output = comp.process(0.9);
/// }
/// assert!(output < 0.9);
/// assert!(comp.gain_reduction_db() > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Compressor {
    gain_computer: GainComputer,
    envelope_follower: EnvelopeFollower,
}

impl Compressor {
    /// Create a compressor for one channel at `sample_rate`.
    pub fn new(config: &CompressionConfig, sample_rate: f32) -> Self {
        Self {
            gain_computer: GainComputer::new(config),
            envelope_follower: EnvelopeFollower::new(
                sample_rate,
                config.attack_seconds(),
                config.release_seconds(),
            ),
        }
    }

    /// Smoothed gain reduction currently applied, in dB (non-negative).
    ///
    /// 0.0 means no compression; 6.0 means the signal is reduced by 6 dB.
    pub fn gain_reduction_db(&self) -> f32 {
        self.envelope_follower.level()
    }

    /// Compress one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let target_db = self.gain_computer.reduction_db(amplitude_to_db(input));
        let reduction_db = self.envelope_follower.process(target_db);
        input * db_to_linear(-reduction_db)
    }

    /// Clear the smoothing state.
    pub fn reset(&mut self) {
        self.envelope_follower.reset();
    }
}

/// Apply `config` to every channel of `buffer`, returning a new buffer.
///
/// The config is validated at construction, so this only fails if the
/// output buffer cannot be assembled. The input is never modified.
pub fn compress(buffer: &SampleBuffer, config: &CompressionConfig) -> Result<SampleBuffer> {
    let sample_rate = buffer.sample_rate() as f32;
    #[cfg(feature = "tracing")]
    let mut max_reduction_db = 0.0f32;

    let channels = buffer
        .channels()
        .map(|input| {
            let mut compressor = Compressor::new(config, sample_rate);
            input
                .iter()
                .map(|&sample| {
                    let out = compressor.process(sample);
                    #[cfg(feature = "tracing")]
                    {
                        max_reduction_db = max_reduction_db.max(compressor.gain_reduction_db());
                    }
                    out
                })
                .collect()
        })
        .collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        channels = buffer.channel_count(),
        frames = buffer.frame_count(),
        threshold_db = config.threshold_db(),
        ratio = config.ratio(),
        max_reduction_db,
        "compress"
    );

    SampleBuffer::new(buffer.sample_rate(), channels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(threshold_db: f32, knee_db: f32, ratio: f32) -> CompressionConfig {
        CompressionConfig::new(threshold_db, knee_db, ratio, 0.001, 0.05).unwrap()
    }

    #[test]
    fn test_reset_restarts_from_unity_gain() {
        let mut comp = Compressor::new(&config(-24.0, 0.0, 4.0), 44100.0);
        let first = comp.process(0.9);
        for _ in 0..4410 {
            comp.process(0.9);
        }
        assert!(comp.gain_reduction_db() > 10.0);

        comp.reset();
        assert_eq!(comp.gain_reduction_db(), 0.0);
        assert_eq!(comp.process(0.9), first);
    }

    #[test]
    fn test_curve_regions() {
        let curve = GainComputer::new(&config(-24.0, 30.0, 12.0));

        assert_eq!(curve.reduction_db(-40.0), 0.0);
        assert_eq!(curve.reduction_db(-39.0), 0.0);

        // Above the knee: (L - T)(1 - 1/R)
        let above = curve.reduction_db(-6.0);
        assert!((above - 18.0 * (11.0 / 12.0)).abs() < 1e-4);

        // At the threshold: (1 - 1/R) * (W/2)^2 / 2W = (1 - 1/R) * W / 8
        let at_threshold = curve.reduction_db(-24.0);
        assert!((at_threshold - (11.0 / 12.0) * 30.0 / 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_curve_continuous_at_knee_edges() {
        let curve = GainComputer::new(&config(-18.0, 12.0, 4.0));
        let d = 1e-3;
        for edge in [-24.0f32, -12.0] {
            let below = curve.reduction_db(edge - d);
            let above = curve.reduction_db(edge + d);
            assert!((below - above).abs() < 1e-2, "jump at {edge}: {below} vs {above}");
        }
    }

    #[test]
    fn test_hard_knee() {
        let curve = GainComputer::new(&config(-10.0, 0.0, 2.0));
        assert_eq!(curve.reduction_db(-10.0), 0.0);
        assert!((curve.reduction_db(0.0) - 5.0).abs() < 1e-6);
        assert_eq!(curve.reduction_db(-10.5), 0.0);
    }

    #[test]
    fn test_ratio_one_is_transparent() {
        let cfg = config(-30.0, 6.0, 1.0);
        let buffer = SampleBuffer::new(48000, vec![vec![0.9, -0.5, 0.1, 0.0]]).unwrap();
        let out = compress(&buffer, &cfg).unwrap();
        assert_eq!(out, buffer);
    }

    #[test]
    fn test_compressor_reduces_peaks() {
        let cfg = config(-20.0, 0.0, 4.0);
        let mut comp = Compressor::new(&cfg, 44100.0);

        let mut output = 0.0;
        for _ in 0..1000 {
            output = comp.process(0.5);
        }

        // 0.5 is ~-6 dB: 14 dB over, 10.5 dB reduction
        assert!(output.abs() < 0.5, "Output should be compressed, got {}", output);
        assert!((comp.gain_reduction_db() - 10.48).abs() < 0.1);
    }

    #[test]
    fn test_quiet_signal_untouched() {
        let cfg = config(-6.0, 0.0, 8.0);
        let samples: Vec<f32> = (0..256).map(|i| 0.1 * (i as f32 * 0.1).sin()).collect();
        let buffer = SampleBuffer::new(44100, vec![samples]).unwrap();
        let out = compress(&buffer, &cfg).unwrap();
        assert_eq!(out, buffer);
    }

    #[test]
    fn test_attack_ramps_reduction() {
        let cfg = CompressionConfig::new(-20.0, 0.0, 10.0, 0.01, 0.1).unwrap();
        let buffer = SampleBuffer::new(48000, vec![vec![0.8; 4800]]).unwrap();
        let out = compress(&buffer, &cfg).unwrap();
        let out = out.channel(0).unwrap();

        // Reduction starts at zero and grows monotonically under constant input
        assert!((out[0] - 0.8).abs() < 0.01);
        assert!(out.windows(2).all(|w| w[1] <= w[0]));
        assert!(out[4799] < 0.2);
    }

    #[test]
    fn test_release_recovers_gain() {
        let cfg = CompressionConfig::new(-20.0, 0.0, 10.0, 0.001, 0.01).unwrap();
        let mut comp = Compressor::new(&cfg, 48000.0);
        for _ in 0..4800 {
            comp.process(1.0);
        }
        let compressed = comp.gain_reduction_db();
        for _ in 0..4800 {
            comp.process(0.0);
        }
        assert!(compressed > 15.0);
        assert!(comp.gain_reduction_db() < 0.01);
    }

    #[test]
    fn test_no_clamping_of_hot_input() {
        let cfg = config(0.0, 0.0, 2.0);
        let buffer = SampleBuffer::new(48000, vec![vec![4.0; 16]]).unwrap();
        let out = compress(&buffer, &cfg).unwrap();
        // First sample sees almost no smoothed reduction yet
        assert!(out.channel(0).unwrap()[0] > 1.0);
    }

    #[test]
    fn test_channels_have_independent_state() {
        let cfg = config(-20.0, 6.0, 6.0);
        let loud = vec![0.9; 512];
        let quiet = vec![0.01; 512];
        let stereo = SampleBuffer::new(44100, vec![loud.clone(), quiet.clone()]).unwrap();
        let out = compress(&stereo, &cfg).unwrap();

        let mono_quiet = compress(&SampleBuffer::new(44100, vec![quiet]).unwrap(), &cfg).unwrap();
        let mono_loud = compress(&SampleBuffer::new(44100, vec![loud]).unwrap(), &cfg).unwrap();
        assert_eq!(out.channel(0), mono_loud.channel(0));
        assert_eq!(out.channel(1), mono_quiet.channel(0));
    }
}
