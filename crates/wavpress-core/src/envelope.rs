//! Attack/release envelope follower.
//!
//! Smooths a control signal (here: gain reduction in dB) so that increases
//! track with the attack time and decreases with the release time.

use crate::math::time_constant_coeff;

/// One-pole follower with separate attack and release coefficients.
///
/// Rising input moves the envelope with the attack coefficient, falling
/// input with the release coefficient:
///
/// `y[n] = coeff * y[n-1] + (1 - coeff) * x[n]`
///
/// # Example
///
/// ```rust
/// use wavpress_core::EnvelopeFollower;
///
/// let mut env = EnvelopeFollower::new(48000.0, 0.003, 0.25);
/// let level = env.process(12.0);
/// assert!(level > 0.0 && level < 12.0);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    /// Current envelope value
    envelope: f32,
    attack_coeff: f32,
    release_coeff: f32,
}

impl EnvelopeFollower {
    /// Create a follower starting at zero.
    ///
    /// Times are in seconds and must be positive; the compressor validates
    /// them before construction.
    pub fn new(sample_rate: f32, attack_seconds: f32, release_seconds: f32) -> Self {
        Self {
            envelope: 0.0,
            attack_coeff: time_constant_coeff(attack_seconds, sample_rate),
            release_coeff: time_constant_coeff(release_seconds, sample_rate),
        }
    }

    /// Advance one sample toward `target` and return the new envelope.
    #[inline]
    pub fn process(&mut self, target: f32) -> f32 {
        let coeff = if target > self.envelope {
            self.attack_coeff
        } else {
            self.release_coeff
        };

        self.envelope = coeff * self.envelope + (1.0 - coeff) * target;
        self.envelope
    }

    /// Current envelope without advancing.
    pub fn level(&self) -> f32 {
        self.envelope
    }

    /// Reset the envelope to zero.
    pub fn reset(&mut self) {
        self.envelope = 0.0;
    }
}
