//! Planar multi-channel sample buffer shared by every pipeline stage.

use crate::error::{Error, Result};

/// De-interleaved `f32` audio with a fixed channel layout and sample rate.
///
/// Samples are nominally normalized to `[-1.0, 1.0]` but may exceed that
/// range after gain processing; only 16-bit quantization clamps.
///
/// All channels hold the same number of frames. The layout and rate cannot
/// change after construction, so every stage that resamples or reshapes
/// audio returns a new buffer.
///
/// # Example
///
/// ```rust
/// use wavpress_core::SampleBuffer;
///
/// let buffer = SampleBuffer::new(48000, vec![vec![0.0, 0.5], vec![0.0, -0.5]]).unwrap();
/// assert_eq!(buffer.channel_count(), 2);
/// assert_eq!(buffer.frame_count(), 2);
/// assert_eq!(buffer.to_interleaved(), vec![0.0, 0.0, 0.5, -0.5]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl SampleBuffer {
    /// Build a buffer from per-channel sample vectors.
    ///
    /// Fails if `sample_rate` is zero, `channels` is empty, or the channels
    /// disagree on their length.
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::InvalidSampleRate(sample_rate));
        }
        let Some(first) = channels.first() else {
            return Err(Error::NoChannels);
        };
        let expected = first.len();
        if let Some((channel, found)) = channels
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != expected)
        {
            return Err(Error::FrameCountMismatch {
                channel,
                expected,
                found,
            });
        }

        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// Build a buffer from frame-major interleaved samples.
    ///
    /// A trailing partial frame is rejected as a frame count mismatch.
    pub fn from_interleaved(sample_rate: u32, channel_count: usize, samples: &[f32]) -> Result<Self> {
        if channel_count == 0 {
            return Err(Error::NoChannels);
        }
        let frames = samples.len() / channel_count;
        let remainder = samples.len() % channel_count;
        if remainder != 0 {
            return Err(Error::FrameCountMismatch {
                channel: remainder,
                expected: frames + 1,
                found: frames,
            });
        }

        let mut channels: Vec<Vec<f32>> = (0..channel_count)
            .map(|_| Vec::with_capacity(frames))
            .collect();
        for frame in samples.chunks_exact(channel_count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }

        Self::new(sample_rate, channels)
    }

    /// A buffer of `frames` zero samples on every channel.
    pub fn silence(sample_rate: u32, channel_count: usize, frames: usize) -> Result<Self> {
        Self::new(sample_rate, vec![vec![0.0; frames]; channel_count])
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels (always at least one).
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of frames (samples per channel).
    pub fn frame_count(&self) -> usize {
        self.channels[0].len()
    }

    /// Whether the buffer holds zero frames.
    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }

    /// Samples of one channel, or `None` if the index is out of range.
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Iterate over the channels in order.
    pub fn channels(&self) -> impl ExactSizeIterator<Item = &[f32]> {
        self.channels.iter().map(Vec::as_slice)
    }

    /// Consume the buffer and return its per-channel vectors.
    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }

    /// Frame-major interleaved copy of the samples.
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.frame_count() * self.channel_count());
        for frame in 0..self.frame_count() {
            out.extend(self.channels.iter().map(|channel| channel[frame]));
        }
        out
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / f64::from(self.sample_rate)
    }

    /// Largest absolute sample value across all channels.
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flatten()
            .fold(0.0f32, |peak, s| peak.max(s.abs()))
    }
}
