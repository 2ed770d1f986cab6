//! Decode → render → compress → encode orchestration.

use std::fmt;

use wavpress_core::{CompressionConfig, EncodingConfig, SampleBuffer, compress, render_with};

use crate::decode::decode;
use crate::encode::encode;
use crate::Result;

/// Pipeline stage, reported to progress callbacks before it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Bytes to samples.
    Decode,
    /// Sample-rate conversion.
    Render,
    /// Dynamics processing.
    Compress,
    /// Samples to WAV bytes.
    Encode,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 4] = [Stage::Decode, Stage::Render, Stage::Compress, Stage::Encode];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Decode => "decode",
            Stage::Render => "render",
            Stage::Compress => "compress",
            Stage::Encode => "encode",
        };
        f.write_str(name)
    }
}

/// Summary of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeReport {
    /// Channel count (unchanged by the pipeline).
    pub channels: usize,
    /// Sample rate of the decoded input.
    pub input_sample_rate: u32,
    /// Frames decoded from the input.
    pub input_frames: usize,
    /// Peak absolute sample of the decoded input.
    pub input_peak: f32,
    /// Sample rate of the output container.
    pub output_sample_rate: u32,
    /// Frames written to the output container.
    pub output_frames: usize,
    /// Peak absolute sample before quantization.
    pub output_peak: f32,
    /// Whether the compressor ran.
    pub compressed: bool,
    /// Size of the encoded output in bytes.
    pub output_bytes: usize,
}

/// Encoded output together with its [`TranscodeReport`].
#[derive(Debug, Clone)]
pub struct Transcoded {
    /// The WAV file bytes.
    pub bytes: Vec<u8>,
    /// What the pipeline did.
    pub report: TranscodeReport,
}

/// Configurable transcode pipeline.
///
/// Holds only immutable configuration, so one `Transcoder` can serve any
/// number of independent runs, including concurrent ones.
///
/// # Example
/// ```ignore
/// let transcoder = Transcoder::new(EncodingConfig::default())
///     .with_compression(CompressionConfig::upload());
/// let out = transcoder.run(&input_bytes)?;
/// println!("wrote {} bytes", out.report.output_bytes);
/// ```
#[derive(Debug, Clone)]
pub struct Transcoder {
    encoding: EncodingConfig,
    compression: Option<CompressionConfig>,
}

impl Transcoder {
    /// Pipeline without compression.
    pub fn new(encoding: EncodingConfig) -> Self {
        Self {
            encoding,
            compression: None,
        }
    }

    /// Enable the compressor with `config`.
    pub fn with_compression(mut self, config: CompressionConfig) -> Self {
        self.compression = Some(config);
        self
    }

    /// Skip the compressor.
    pub fn without_compression(mut self) -> Self {
        self.compression = None;
        self
    }

    /// Output format settings.
    pub fn encoding(&self) -> &EncodingConfig {
        &self.encoding
    }

    /// Compressor settings, if enabled.
    pub fn compression(&self) -> Option<&CompressionConfig> {
        self.compression.as_ref()
    }

    /// Run the full pipeline on `input`.
    pub fn run(&self, input: &[u8]) -> Result<Transcoded> {
        self.run_with_progress(input, |_| {})
    }

    /// Run the full pipeline, calling `on_stage` before each stage starts.
    ///
    /// The compress stage is reported only when compression is enabled.
    pub fn run_with_progress<F: FnMut(Stage)>(
        &self,
        input: &[u8],
        mut on_stage: F,
    ) -> Result<Transcoded> {
        on_stage(Stage::Decode);
        let decoded = decode(input)?;

        on_stage(Stage::Render);
        let rendered = render_with(
            &decoded,
            self.encoding.sample_rate(),
            self.encoding.interpolation(),
        )?;

        let processed = match &self.compression {
            Some(config) => {
                on_stage(Stage::Compress);
                compress(&rendered, config)?
            }
            None => rendered,
        };

        on_stage(Stage::Encode);
        let bytes = encode(&processed, self.encoding.bit_depth())?;

        let report = TranscodeReport {
            channels: processed.channel_count(),
            input_sample_rate: decoded.sample_rate(),
            input_frames: decoded.frame_count(),
            input_peak: decoded.peak(),
            output_sample_rate: processed.sample_rate(),
            output_frames: processed.frame_count(),
            output_peak: processed.peak(),
            compressed: self.compression.is_some(),
            output_bytes: bytes.len(),
        };

        tracing::debug!(?report, "transcode");

        Ok(Transcoded { bytes, report })
    }

    /// Run render, compress, and encode on an already decoded buffer.
    pub fn process_buffer(&self, buffer: &SampleBuffer) -> Result<Vec<u8>> {
        let rendered = render_with(
            buffer,
            self.encoding.sample_rate(),
            self.encoding.interpolation(),
        )?;
        let processed = match &self.compression {
            Some(config) => compress(&rendered, config)?,
            None => rendered,
        };
        encode(&processed, self.encoding.bit_depth())
    }
}

/// Decode `input`, render it at the target rate, compress it, and encode it
/// as a WAV container.
///
/// # Example
/// ```ignore
/// let wav = transcode(&mp3_bytes, &CompressionConfig::upload(), &EncodingConfig::default())?;
/// ```
pub fn transcode(
    input: &[u8],
    compression: &CompressionConfig,
    encoding: &EncodingConfig,
) -> Result<Vec<u8>> {
    Transcoder::new(*encoding)
        .with_compression(*compression)
        .run(input)
        .map(|out| out.bytes)
}
