//! Offline sample-rate conversion.
//!
//! Renders a [`SampleBuffer`] at a new sample rate as a pure function of the
//! input samples, the source rate, and the target rate. Nothing depends on
//! wall-clock time or scheduling, so identical input always yields
//! bit-identical output.
//!
//! # Frame count
//!
//! The output holds `round(input_frames * target / source)` frames, computed
//! with exact integer arithmetic (halves round up). Output frame `i` reads
//! the input at fractional position `i * source / target`.
//!
//! # Interpolation
//!
//! | Kernel | Points | Notes |
//! |--------|--------|-------|
//! | [`Interpolation::Linear`] | 2 | Default, matches the reference renderer |
//! | [`Interpolation::Cubic`] | 4 | Lagrange, smoother on upsampling |
//!
//! Neither kernel band-limits the signal before decimation.

use crate::buffer::SampleBuffer;
use crate::error::{Error, Result};

/// Kernel used to read the source between sample positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Interpolation {
    /// Linear interpolation between two samples
    #[default]
    Linear,
    /// 4-point cubic Lagrange interpolation
    Cubic,
}

impl Interpolation {
    /// Every kernel, default first.
    pub const ALL: [Interpolation; 2] = [Interpolation::Linear, Interpolation::Cubic];

    /// Lowercase name used in preset files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Interpolation::Linear => "linear",
            Interpolation::Cubic => "cubic",
        }
    }

    /// Look up a kernel by [`name`](Self::name), ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kernel| kernel.name().eq_ignore_ascii_case(name))
    }
}

/// Number of frames produced when rendering `frames` from `source_rate` to
/// `target_rate`: `round(frames * target / source)`.
pub fn rendered_frame_count(frames: usize, source_rate: u32, target_rate: u32) -> usize {
    let numerator = frames as u128 * u128::from(target_rate);
    let source = u128::from(source_rate);
    ((2 * numerator + source) / (2 * source)) as usize
}

/// Render `buffer` at `target_sample_rate` using linear interpolation.
///
/// When the target equals the buffer's own rate the samples are returned
/// unchanged.
///
/// # Example
///
/// ```rust
/// use wavpress_core::{SampleBuffer, render};
///
/// let buffer = SampleBuffer::silence(48000, 2, 48000).unwrap();
/// let rendered = render(&buffer, 44100).unwrap();
/// assert_eq!(rendered.sample_rate(), 44100);
/// assert_eq!(rendered.frame_count(), 44100);
/// ```
pub fn render(buffer: &SampleBuffer, target_sample_rate: u32) -> Result<SampleBuffer> {
    render_with(buffer, target_sample_rate, Interpolation::Linear)
}

/// Render `buffer` at `target_sample_rate` with the given kernel.
pub fn render_with(
    buffer: &SampleBuffer,
    target_sample_rate: u32,
    interpolation: Interpolation,
) -> Result<SampleBuffer> {
    if target_sample_rate == 0 {
        return Err(Error::InvalidSampleRate(target_sample_rate));
    }

    let source_rate = buffer.sample_rate();
    if target_sample_rate == source_rate {
        return Ok(buffer.clone());
    }

    let out_frames = rendered_frame_count(buffer.frame_count(), source_rate, target_sample_rate);
    let step = f64::from(source_rate) / f64::from(target_sample_rate);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        source_rate,
        target_sample_rate,
        in_frames = buffer.frame_count(),
        out_frames,
        ?interpolation,
        "render"
    );

    let channels = buffer
        .channels()
        .map(|input| {
            (0..out_frames)
                .map(|i| read_at(input, i as f64 * step, interpolation))
                .collect()
        })
        .collect();

    SampleBuffer::new(target_sample_rate, channels)
}

/// Read `input` at a fractional frame position, clamping past either end.
#[inline]
fn read_at(input: &[f32], position: f64, interpolation: Interpolation) -> f32 {
    let Some(last) = input.len().checked_sub(1) else {
        return 0.0;
    };
    let index = (position.floor() as usize).min(last);
    let frac = (position - index as f64).clamp(0.0, 1.0) as f32;
    let at = |offset: isize| {
        let i = (index as isize + offset).clamp(0, last as isize) as usize;
        input[i]
    };

    match interpolation {
        Interpolation::Linear => {
            let a = at(0);
            let b = at(1);
            a + (b - a) * frac
        }

        Interpolation::Cubic => {
            let y0 = at(-1);
            let y1 = at(0);
            let y2 = at(1);
            let y3 = at(2);

            let t = frac;
            let c0 = -t * (t - 1.0) * (t - 2.0) / 6.0;
            let c1 = (t + 1.0) * (t - 1.0) * (t - 2.0) / 2.0;
            let c2 = -(t + 1.0) * t * (t - 2.0) / 2.0;
            let c3 = (t + 1.0) * t * (t - 1.0) / 6.0;

            c0 * y0 + c1 * y1 + c2 * y2 + c3 * y3
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(sample_rate: u32, frames: usize) -> SampleBuffer {
        let samples = (0..frames).map(|i| i as f32 / frames as f32).collect();
        SampleBuffer::new(sample_rate, vec![samples]).unwrap()
    }

    #[test]
    fn test_interpolation_names() {
        for kernel in Interpolation::ALL {
            assert_eq!(Interpolation::from_name(kernel.name()), Some(kernel));
        }
        assert_eq!(Interpolation::from_name("Cubic"), Some(Interpolation::Cubic));
        assert_eq!(Interpolation::from_name("sinc"), None);
    }

    #[test]
    fn test_frame_count_rounding() {
        assert_eq!(rendered_frame_count(48000, 48000, 44100), 44100);
        assert_eq!(rendered_frame_count(1000, 44100, 48000), 1088); // 1088.43
        assert_eq!(rendered_frame_count(3, 2, 1), 2); // 1.5 rounds up
        assert_eq!(rendered_frame_count(0, 44100, 8000), 0);
    }

    #[test]
    fn test_identity_is_exact() {
        let buffer = ramp(44100, 100);
        let rendered = render(&buffer, 44100).unwrap();
        assert_eq!(rendered, buffer);
    }

    #[test]
    fn test_zero_rate_rejected() {
        let buffer = ramp(44100, 10);
        assert_eq!(render(&buffer, 0).unwrap_err(), Error::InvalidSampleRate(0));
    }

    #[test]
    fn test_upsample_by_two_interpolates_midpoints() {
        let buffer = SampleBuffer::new(1000, vec![vec![0.0, 1.0, 0.0]]).unwrap();
        let rendered = render(&buffer, 2000).unwrap();
        assert_eq!(rendered.channel(0).unwrap(), &[0.0, 0.5, 1.0, 0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_downsample_by_two_picks_even_frames() {
        let buffer = SampleBuffer::new(2000, vec![vec![0.0, 0.1, 0.2, 0.3]]).unwrap();
        let rendered = render(&buffer, 1000).unwrap();
        assert_eq!(rendered.channel(0).unwrap(), &[0.0, 0.2]);
    }

    #[test]
    fn test_cubic_reproduces_linear_ramp() {
        let samples: Vec<f32> = (0..64).map(|i| i as f32 * 0.01).collect();
        let buffer = SampleBuffer::new(1000, vec![samples]).unwrap();
        let rendered = render_with(&buffer, 3000, Interpolation::Cubic).unwrap();

        // Interior points lie on the ramp; cubic Lagrange is exact for lines
        let out = rendered.channel(0).unwrap();
        for (i, &s) in out.iter().enumerate().skip(3).take(150) {
            let expected = i as f32 / 3.0 * 0.01;
            assert!((s - expected).abs() < 1e-4, "frame {i}: {s} vs {expected}");
        }
    }

    #[test]
    fn test_channels_rendered_independently() {
        let buffer = SampleBuffer::new(8000, vec![vec![0.5; 80], vec![-0.25; 80]]).unwrap();
        let rendered = render(&buffer, 11025).unwrap();
        assert_eq!(rendered.channel_count(), 2);
        assert!(rendered.channel(0).unwrap().iter().all(|&s| s == 0.5));
        assert!(rendered.channel(1).unwrap().iter().all(|&s| s == -0.25));
    }

    #[test]
    fn test_empty_buffer_renders_empty() {
        let buffer = SampleBuffer::silence(48000, 2, 0).unwrap();
        let rendered = render(&buffer, 22050).unwrap();
        assert!(rendered.is_empty());
        assert_eq!(rendered.channel_count(), 2);
    }
}
