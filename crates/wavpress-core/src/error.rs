//! Error types for the DSP stages.

use thiserror::Error;

/// Errors raised by buffer construction and the render/compress stages.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A sample rate of zero was supplied.
    #[error("invalid sample rate: {0} Hz (must be positive)")]
    InvalidSampleRate(u32),

    /// A compression parameter lies outside its domain.
    #[error("invalid compression parameter `{param}` = {value}: {reason}")]
    InvalidConfig {
        /// Name of the offending parameter.
        param: &'static str,
        /// The rejected value.
        value: f32,
        /// Domain the parameter must satisfy.
        reason: &'static str,
    },

    /// The requested bit depth has no encoder.
    #[error("unsupported bit depth: {0} (expected 16 or 32)")]
    UnsupportedBitDepth(u16),

    /// A buffer was constructed without any channels.
    #[error("sample buffer must contain at least one channel")]
    NoChannels,

    /// Channels of one buffer disagree on their frame count.
    #[error("channel {channel} has {found} frames, expected {expected}")]
    FrameCountMismatch {
        /// Index of the first channel whose length differs from channel 0.
        channel: usize,
        /// Frame count of channel 0.
        expected: usize,
        /// Frame count of the offending channel.
        found: usize,
    },
}

/// Convenience result type for the DSP stages.
pub type Result<T> = std::result::Result<T, Error>;
