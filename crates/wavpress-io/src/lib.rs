//! Byte-level I/O and pipeline orchestration for wavpress.
//!
//! This crate provides:
//!
//! - **Decoding**: [`decode`] and [`probe`] for any format symphonia supports
//! - **WAV encoding**: [`encode`] producing a canonical 44-byte-header container
//! - **Pipeline**: [`transcode`] and [`Transcoder`] chaining
//!   decode → render → compress → encode
//!
//! The render and compress stages live in `wavpress-core` and are
//! re-exported here so callers can drive each stage individually.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wavpress_io::{CompressionConfig, EncodingConfig, transcode};
//!
//! let input = std::fs::read("track.mp3")?;
//! let wav = transcode(&input, &CompressionConfig::upload(), &EncodingConfig::default())?;
//! std::fs::write("track.wav", wav)?;
//! ```

mod decode;
mod encode;
mod pipeline;

pub use decode::{DecodeError, StreamInfo, decode, probe};
pub use encode::{HEADER_LEN, WavHeader, encode, quantize_i16};
pub use pipeline::{Stage, TranscodeReport, Transcoded, Transcoder, transcode};
pub use wavpress_core::{
    BitDepth, CompressionConfig, EncodingConfig, Interpolation, SampleBuffer, compress, render,
    render_with,
};

/// Error types for transcoding.
#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    /// The input bytes could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A render/compress parameter or buffer invariant was violated.
    #[error(transparent)]
    Dsp(#[from] wavpress_core::Error),

    /// A header field cannot represent the output.
    #[error("WAV {field} overflows its header field: {value}")]
    ContainerOverflow {
        /// Header field that overflowed.
        field: &'static str,
        /// Value that did not fit.
        value: u64,
    },
}

/// Convenience result type for transcoding operations.
pub type Result<T> = std::result::Result<T, TranscodeError>;
