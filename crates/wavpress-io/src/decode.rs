//! Audio decoding from in-memory bytes.
//!
//! Uses symphonia to probe and decode every enabled container and codec:
//! - WAV (PCM, IEEE float, ADPCM)
//! - FLAC, ALAC (lossless)
//! - MP3, Ogg Vorbis, AAC in MP4 (lossy)

use std::io::Cursor;

use symphonia::core::audio::SampleBuffer as InterleavedBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, CodecParameters, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use wavpress_core::SampleBuffer;

/// Reasons an input byte sequence could not be turned into a [`SampleBuffer`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// No registered container format recognized the bytes.
    #[error("unrecognized audio format: {0}")]
    Unrecognized(String),

    /// The container holds no decodable audio track.
    #[error("no audio track found")]
    NoAudioTrack,

    /// The track's codec has no decoder.
    #[error("unsupported codec: {0}")]
    UnsupportedCodec(String),

    /// Sample rate or channel layout could not be determined.
    #[error("stream does not declare its {0}")]
    MissingParameters(&'static str),

    /// A packet or the container structure is corrupt.
    #[error("malformed audio data: {0}")]
    Malformed(String),

    /// The stream ended before the frame count its header declares.
    #[error("truncated stream: header declares {expected} frames, decoded {decoded}")]
    Truncated {
        /// Frames declared by the container.
        expected: u64,
        /// Frames actually decoded.
        decoded: u64,
    },

    /// Decoded data violates the buffer invariants, e.g. the channel
    /// layout or sample rate changed mid-stream.
    #[error("inconsistent decoded audio: {0}")]
    Inconsistent(String),
}

/// Container and codec details reported by [`probe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    /// Short codec name, e.g. `pcm_s16le`, `flac`, `mp3`.
    pub codec: String,
    /// Number of channels.
    pub channels: usize,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Frames declared by the container, if known.
    pub num_frames: Option<u64>,
    /// Bits per sample of the coded stream, if meaningful for the codec.
    pub bits_per_sample: Option<u32>,
}

impl StreamInfo {
    /// Duration in seconds, when the frame count is known.
    pub fn duration_secs(&self) -> Option<f64> {
        self.num_frames
            .map(|frames| frames as f64 / f64::from(self.sample_rate))
    }
}

/// Read stream parameters without decoding any audio.
pub fn probe(bytes: &[u8]) -> Result<StreamInfo, DecodeError> {
    let format = open(bytes)?;
    let params = audio_track(format.as_ref())?.codec_params.clone();

    let codec = symphonia::default::get_codecs()
        .get_codec(params.codec)
        .map(|descriptor| descriptor.short_name.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let (channels, sample_rate) = layout(&params)?;

    Ok(StreamInfo {
        codec,
        channels,
        sample_rate,
        num_frames: params.n_frames,
        bits_per_sample: params.bits_per_sample,
    })
}

/// Decode an entire audio stream into a planar [`SampleBuffer`].
///
/// Decoding is strict: any corrupt packet, mid-stream format change, or
/// short stream fails the whole call and no partial audio is returned.
///
/// # Example
/// ```ignore
/// let bytes = std::fs::read("input.flac")?;
/// let buffer = decode(&bytes)?;
/// println!("{} frames at {} Hz", buffer.frame_count(), buffer.sample_rate());
/// ```
pub fn decode(bytes: &[u8]) -> Result<SampleBuffer, DecodeError> {
    let mut format = open(bytes)?;
    let track = audio_track(format.as_ref())?;
    let track_id = track.id;
    let params = track.codec_params.clone();

    let mut decoder = symphonia::default::get_codecs()
        .make(&params, &DecoderOptions::default())
        .map_err(|e| DecodeError::UnsupportedCodec(e.to_string()))?;

    let mut declared = layout(&params).ok();
    let mut interleaved: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => {
                return Err(DecodeError::Inconsistent(
                    "stream parameters changed mid-stream".to_string(),
                ));
            }
            Err(e) => return Err(DecodeError::Malformed(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }
        // Short reads past the end of a cut-off file surface as empty packets.
        if packet.buf().is_empty() {
            break;
        }

        let decoded = decoder
            .decode(&packet)
            .map_err(|e| DecodeError::Malformed(e.to_string()))?;

        let spec = *decoded.spec();
        check_packet_layout(&mut declared, spec.channels.count(), spec.rate)?;

        if decoded.frames() == 0 {
            continue;
        }

        let mut buf = InterleavedBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buf.copy_interleaved_ref(decoded);
        interleaved.extend_from_slice(buf.samples());
    }

    let (channels, sample_rate) = declared.ok_or(DecodeError::MissingParameters("channel layout"))?;
    let decoded_frames = (interleaved.len() / channels) as u64;
    if let Some(expected) = params.n_frames {
        if decoded_frames < expected {
            return Err(DecodeError::Truncated {
                expected,
                decoded: decoded_frames,
            });
        }
    }

    tracing::debug!(
        channels,
        sample_rate,
        frames = decoded_frames,
        "decode"
    );

    SampleBuffer::from_interleaved(sample_rate, channels, &interleaved)
        .map_err(|e| DecodeError::Inconsistent(e.to_string()))
}

/// Record the first packet's layout, or reject a packet that differs from it.
fn check_packet_layout(
    declared: &mut Option<(usize, u32)>,
    channels: usize,
    sample_rate: u32,
) -> Result<(), DecodeError> {
    match *declared {
        None => {
            *declared = Some((channels, sample_rate));
            Ok(())
        }
        Some(expected) if expected != (channels, sample_rate) => {
            Err(DecodeError::Inconsistent(format!(
                "packet has {channels} channels at {sample_rate} Hz, stream has {} at {} Hz",
                expected.0, expected.1
            )))
        }
        Some(_) => Ok(()),
    }
}

fn open(bytes: &[u8]) -> Result<Box<dyn FormatReader>, DecodeError> {
    let source = Cursor::new(bytes.to_vec());
    let mss = MediaSourceStream::new(Box::new(source), Default::default());

    let format_opts = FormatOptions {
        enable_gapless: true,
        ..Default::default()
    };

    symphonia::default::get_probe()
        .format(&Hint::new(), mss, &format_opts, &MetadataOptions::default())
        .map(|probed| probed.format)
        .map_err(|e| DecodeError::Unrecognized(e.to_string()))
}

fn audio_track(format: &dyn FormatReader) -> Result<&symphonia::core::formats::Track, DecodeError> {
    format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeError::NoAudioTrack)
}

fn layout(params: &CodecParameters) -> Result<(usize, u32), DecodeError> {
    let channels = params
        .channels
        .map(|c| c.count())
        .ok_or(DecodeError::MissingParameters("channel layout"))?;
    let sample_rate = params
        .sample_rate
        .ok_or(DecodeError::MissingParameters("sample rate"))?;
    if channels == 0 {
        return Err(DecodeError::MissingParameters("channel layout"));
    }
    if sample_rate == 0 {
        return Err(DecodeError::MissingParameters("sample rate"));
    }
    Ok((channels, sample_rate))
}
