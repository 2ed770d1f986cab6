//! Per-invocation parameter sets for the compress, render, and encode stages.
//!
//! | Parameter | Domain | Unit |
//! |-----------|--------|------|
//! | Threshold | ≤ 0 | dB |
//! | Knee | ≥ 0 | dB |
//! | Ratio | ≥ 1 | x:1 |
//! | Attack | > 0 | s |
//! | Release | > 0 | s |
//! | Target rate | > 0 | Hz |
//! | Bit depth | 16 or 32 (float) | bits |

use crate::error::{Error, Result};
use crate::render::Interpolation;

/// Default output sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Validated dynamics parameters for one compression pass.
///
/// Fields are private so a config can only exist in its valid domain.
///
/// # Example
///
/// ```rust
/// use wavpress_core::CompressionConfig;
///
/// let cfg = CompressionConfig::new(-18.0, 6.0, 4.0, 0.01, 0.1).unwrap();
/// assert_eq!(cfg.ratio(), 4.0);
/// assert!(CompressionConfig::new(-18.0, 6.0, 0.5, 0.01, 0.1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionConfig {
    threshold_db: f32,
    knee_db: f32,
    ratio: f32,
    attack_seconds: f32,
    release_seconds: f32,
}

impl CompressionConfig {
    /// Validate and build a config.
    pub fn new(
        threshold_db: f32,
        knee_db: f32,
        ratio: f32,
        attack_seconds: f32,
        release_seconds: f32,
    ) -> Result<Self> {
        check("threshold_db", threshold_db, threshold_db <= 0.0, "must be <= 0 dB")?;
        check("knee_db", knee_db, knee_db >= 0.0, "must be >= 0 dB")?;
        check("ratio", ratio, ratio >= 1.0, "must be >= 1")?;
        check("attack_seconds", attack_seconds, attack_seconds > 0.0, "must be > 0 s")?;
        check("release_seconds", release_seconds, release_seconds > 0.0, "must be > 0 s")?;

        Ok(Self {
            threshold_db,
            knee_db,
            ratio,
            attack_seconds,
            release_seconds,
        })
    }

    /// Settings applied to uploaded tracks: -24 dB threshold, 30 dB knee,
    /// 12:1, 3 ms attack, 250 ms release.
    pub fn upload() -> Self {
        Self {
            threshold_db: -24.0,
            knee_db: 30.0,
            ratio: 12.0,
            attack_seconds: 0.003,
            release_seconds: 0.25,
        }
    }

    /// Threshold in dB.
    pub fn threshold_db(&self) -> f32 {
        self.threshold_db
    }

    /// Knee width in dB.
    pub fn knee_db(&self) -> f32 {
        self.knee_db
    }

    /// Compression ratio.
    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    /// Attack time in seconds.
    pub fn attack_seconds(&self) -> f32 {
        self.attack_seconds
    }

    /// Release time in seconds.
    pub fn release_seconds(&self) -> f32 {
        self.release_seconds
    }
}

fn check(param: &'static str, value: f32, in_domain: bool, reason: &'static str) -> Result<()> {
    // NaN fails every comparison, so `in_domain` is already false for it
    if in_domain && value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidConfig {
            param,
            value,
            reason,
        })
    }
}

/// Output sample format of the PCM encoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BitDepth {
    /// 16-bit signed integer PCM (WAVE format tag 1).
    #[default]
    Int16,
    /// 32-bit IEEE-754 float (WAVE format tag 3).
    Float32,
}

impl BitDepth {
    /// Bits per sample written to the container.
    pub fn bits(self) -> u16 {
        match self {
            BitDepth::Int16 => 16,
            BitDepth::Float32 => 32,
        }
    }

    /// Bytes per sample of one channel.
    pub fn bytes_per_sample(self) -> u16 {
        self.bits() / 8
    }

    /// WAVE `fmt ` audio format tag.
    pub fn format_tag(self) -> u16 {
        match self {
            BitDepth::Int16 => 1,
            BitDepth::Float32 => 3,
        }
    }
}

impl TryFrom<u16> for BitDepth {
    type Error = Error;

    fn try_from(bits: u16) -> Result<Self> {
        match bits {
            16 => Ok(BitDepth::Int16),
            32 => Ok(BitDepth::Float32),
            other => Err(Error::UnsupportedBitDepth(other)),
        }
    }
}

/// Output format: target rate, bit depth, and resampling kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingConfig {
    sample_rate: u32,
    bit_depth: BitDepth,
    interpolation: Interpolation,
}

impl EncodingConfig {
    /// Build a config with linear interpolation.
    pub fn new(sample_rate: u32, bit_depth: BitDepth) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::InvalidSampleRate(sample_rate));
        }
        Ok(Self {
            sample_rate,
            bit_depth,
            interpolation: Interpolation::default(),
        })
    }

    /// Replace the resampling kernel.
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Target sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Output bit depth.
    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    /// Resampling kernel used by the renderer.
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            bit_depth: BitDepth::Int16,
            interpolation: Interpolation::Linear,
        }
    }
}
