//! Wavpress Core - offline DSP stages for the transcoding pipeline
//!
//! This crate holds everything between decoding and encoding: the shared
//! sample buffer, the sample-rate renderer, and the dynamics compressor.
//! Each stage is a pure function from a borrowed buffer (plus config) to a
//! new buffer.
//!
//! # Core Abstractions
//!
//! - [`SampleBuffer`] - Planar `f32` audio with an immutable layout
//! - [`CompressionConfig`] / [`EncodingConfig`] - Validated parameter sets
//! - [`BitDepth`] - Output sample format (16-bit int or 32-bit float)
//!
//! ## Stages
//!
//! - [`render`] / [`render_with`] - Deterministic resampling
//! - [`compress`] - Soft-knee compression with attack/release smoothing
//!
//! ## Building Blocks
//!
//! - [`GainComputer`] - Static soft-knee curve
//! - [`Compressor`] - Per-channel stateful compressor
//! - [`EnvelopeFollower`] - Attack/release smoothing
//! - Math functions: [`db_to_linear`], [`linear_to_db`], [`amplitude_to_db`]
//!
//! # Example
//!
//! ```rust
//! use wavpress_core::{CompressionConfig, SampleBuffer, compress, render};
//!
//! let buffer = SampleBuffer::new(48000, vec![vec![0.9; 48000]]).unwrap();
//! let rendered = render(&buffer, 44100).unwrap();
//! let compressed = compress(&rendered, &CompressionConfig::upload()).unwrap();
//!
//! assert_eq!(compressed.frame_count(), 44100);
//! assert!(compressed.peak() < 0.9);
//! ```
//!
//! # Logging
//!
//! Enable the `tracing` feature to emit `debug` events for each stage.
//! Errors are returned, never logged.

pub mod buffer;
pub mod compressor;
pub mod config;
pub mod envelope;
pub mod error;
pub mod math;
pub mod render;

pub use buffer::SampleBuffer;
pub use compressor::{Compressor, GainComputer, compress};
pub use config::{BitDepth, CompressionConfig, DEFAULT_SAMPLE_RATE, EncodingConfig};
pub use envelope::EnvelopeFollower;
pub use error::{Error, Result};
pub use math::{LEVEL_EPSILON, amplitude_to_db, db_to_linear, linear_to_db, time_constant_coeff};
pub use render::{Interpolation, render, render_with, rendered_frame_count};
