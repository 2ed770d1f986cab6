//! Canonical 44-byte-header WAV encoder.
//!
//! Output layout (all integers little-endian):
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 4 | `RIFF` |
//! | 4 | 4 | `36 + data_size` |
//! | 8 | 4 | `WAVE` |
//! | 12 | 4 | `fmt ` |
//! | 16 | 4 | 16 |
//! | 20 | 2 | format tag (1 = PCM, 3 = IEEE float) |
//! | 22 | 2 | channels |
//! | 24 | 4 | sample rate |
//! | 28 | 4 | byte rate |
//! | 32 | 2 | block align |
//! | 34 | 2 | bits per sample |
//! | 36 | 4 | `data` |
//! | 40 | 4 | `data_size` |
//! | 44 | .. | frame-major interleaved samples |
//!
//! The header depends only on the buffer's channel count, sample rate, frame
//! count, and the bit depth. No timestamps or metadata chunks are written,
//! so encoding is deterministic.

use wavpress_core::{BitDepth, SampleBuffer};

use crate::{Result, TranscodeError};

/// Size of the header written by [`encode`].
pub const HEADER_LEN: usize = 44;

/// Scale applied to clamped samples for 16-bit output.
const INT16_SCALE: f32 = 32767.0;

/// Header fields of a canonical PCM/float WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    /// Number of interleaved channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Sample format.
    pub bit_depth: BitDepth,
    /// Size of the sample data in bytes.
    pub data_size: u32,
}

impl WavHeader {
    /// Header describing `buffer` encoded at `bit_depth`.
    ///
    /// Fails if any derived field overflows its header slot.
    pub fn for_buffer(buffer: &SampleBuffer, bit_depth: BitDepth) -> Result<Self> {
        let overflow = |field, value| TranscodeError::ContainerOverflow { field, value };

        let channel_count = buffer.channel_count() as u64;
        let channels =
            u16::try_from(channel_count).map_err(|_| overflow("channels", channel_count))?;

        let block_align = u64::from(channels) * u64::from(bit_depth.bytes_per_sample());
        u16::try_from(block_align).map_err(|_| overflow("block align", block_align))?;

        let byte_rate = u64::from(buffer.sample_rate()) * block_align;
        u32::try_from(byte_rate).map_err(|_| overflow("byte rate", byte_rate))?;

        let data_bytes = buffer.frame_count() as u64 * block_align;
        let data_size = u32::try_from(data_bytes)
            .ok()
            .filter(|size| size.checked_add(36).is_some())
            .ok_or(overflow("data size", data_bytes))?;

        Ok(Self {
            channels,
            sample_rate: buffer.sample_rate(),
            bit_depth,
            data_size,
        })
    }

    /// Bytes per frame across all channels.
    pub fn block_align(&self) -> u16 {
        self.channels * self.bit_depth.bytes_per_sample()
    }

    /// Bytes per second of audio.
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * u32::from(self.block_align())
    }

    fn checked_byte_rate(&self) -> Option<u32> {
        let block_align = self.channels.checked_mul(self.bit_depth.bytes_per_sample())?;
        self.sample_rate.checked_mul(u32::from(block_align))
    }

    /// Value of the RIFF chunk size field.
    pub fn chunk_size(&self) -> u32 {
        36 + self.data_size
    }

    /// Number of frames described by the data size.
    pub fn num_frames(&self) -> u32 {
        self.data_size / u32::from(self.block_align())
    }

    /// Serialize the 44 header bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..4].copy_from_slice(b"RIFF");
        out[4..8].copy_from_slice(&self.chunk_size().to_le_bytes());
        out[8..12].copy_from_slice(b"WAVE");
        out[12..16].copy_from_slice(b"fmt ");
        out[16..20].copy_from_slice(&16u32.to_le_bytes());
        out[20..22].copy_from_slice(&self.bit_depth.format_tag().to_le_bytes());
        out[22..24].copy_from_slice(&self.channels.to_le_bytes());
        out[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        out[28..32].copy_from_slice(&self.byte_rate().to_le_bytes());
        out[32..34].copy_from_slice(&self.block_align().to_le_bytes());
        out[34..36].copy_from_slice(&self.bit_depth.bits().to_le_bytes());
        out[36..40].copy_from_slice(b"data");
        out[40..44].copy_from_slice(&self.data_size.to_le_bytes());
        out
    }

    /// Parse a header in exactly the layout [`WavHeader::to_bytes`] writes.
    ///
    /// Returns `None` for anything else, including WAV files with extra
    /// chunks or extensible format headers.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let header = bytes.get(..HEADER_LEN)?;
        let u16_at = |i: usize| u16::from_le_bytes([header[i], header[i + 1]]);
        let u32_at =
            |i: usize| u32::from_le_bytes([header[i], header[i + 1], header[i + 2], header[i + 3]]);

        if &header[0..4] != b"RIFF"
            || &header[8..12] != b"WAVE"
            || &header[12..16] != b"fmt "
            || u32_at(16) != 16
            || &header[36..40] != b"data"
        {
            return None;
        }

        let bit_depth = match (u16_at(20), u16_at(34)) {
            (1, 16) => BitDepth::Int16,
            (3, 32) => BitDepth::Float32,
            _ => return None,
        };

        let parsed = Self {
            channels: u16_at(22),
            sample_rate: u32_at(24),
            bit_depth,
            data_size: u32_at(40),
        };

        let consistent = parsed.channels > 0
            && parsed.checked_byte_rate() == Some(u32_at(28))
            && parsed.block_align() == u16_at(32)
            && parsed.data_size.checked_add(36) == Some(u32_at(4));
        consistent.then_some(parsed)
    }
}

/// Quantize one sample to 16-bit: clamp to [-1, 1], scale by 32767,
/// truncate toward zero.
#[inline]
pub fn quantize_i16(sample: f32) -> i16 {
    // NaN clamps to NaN and casts to 0
    (sample.clamp(-1.0, 1.0) * INT16_SCALE) as i16
}

/// Serialize `buffer` as a WAV file at `bit_depth`.
///
/// 16-bit output clamps every sample to [-1, 1]; 32-bit float output writes
/// samples unchanged.
///
/// # Example
/// ```rust
/// use wavpress_core::{BitDepth, SampleBuffer};
/// use wavpress_io::encode;
///
/// let buffer = SampleBuffer::new(44100, vec![vec![0.0; 10], vec![0.0; 10]]).unwrap();
/// let wav = encode(&buffer, BitDepth::Int16).unwrap();
/// assert_eq!(wav.len(), 44 + 10 * 2 * 2);
/// assert_eq!(&wav[0..4], b"RIFF");
/// ```
pub fn encode(buffer: &SampleBuffer, bit_depth: BitDepth) -> Result<Vec<u8>> {
    let header = WavHeader::for_buffer(buffer, bit_depth)?;

    let mut out = Vec::with_capacity(HEADER_LEN + header.data_size as usize);
    out.extend_from_slice(&header.to_bytes());

    let channels: Vec<&[f32]> = buffer.channels().collect();
    for frame in 0..buffer.frame_count() {
        for channel in &channels {
            let sample = channel[frame];
            match bit_depth {
                BitDepth::Int16 => out.extend_from_slice(&quantize_i16(sample).to_le_bytes()),
                BitDepth::Float32 => out.extend_from_slice(&sample.to_le_bytes()),
            }
        }
    }

    tracing::debug!(
        channels = header.channels,
        sample_rate = header.sample_rate,
        bits = bit_depth.bits(),
        data_size = header.data_size,
        "encode"
    );

    Ok(out)
}
