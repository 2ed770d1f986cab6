//! Property tests for the WAV encoder.

use proptest::prelude::*;
use wavpress_io::{BitDepth, HEADER_LEN, SampleBuffer, WavHeader, encode, quantize_i16};

fn bit_depth() -> impl Strategy<Value = BitDepth> {
    prop_oneof![Just(BitDepth::Int16), Just(BitDepth::Float32)]
}

proptest! {
    #[test]
    fn encoded_length_matches_header(
        sample_rate in 1u32..200_000,
        channels in 1usize..8,
        frames in 0usize..512,
        depth in bit_depth(),
    ) {
        let buffer = SampleBuffer::silence(sample_rate, channels, frames).unwrap();
        let wav = encode(&buffer, depth).unwrap();

        let data_size = frames * channels * usize::from(depth.bytes_per_sample());
        prop_assert_eq!(wav.len(), HEADER_LEN + data_size);

        let header = WavHeader::parse(&wav).unwrap();
        prop_assert_eq!(usize::from(header.channels), channels);
        prop_assert_eq!(header.sample_rate, sample_rate);
        prop_assert_eq!(header.bit_depth, depth);
        prop_assert_eq!(header.data_size as usize, data_size);
        prop_assert_eq!(header.num_frames() as usize, frames);
    }

    #[test]
    fn quantize_stays_in_symmetric_range(sample in -10.0f32..10.0) {
        let q = quantize_i16(sample);
        prop_assert!((-32767..=32767).contains(&q));
        prop_assert_eq!(q.signum(), quantize_i16(sample.clamp(-1.0, 1.0)).signum());
    }

    #[test]
    fn quantize_is_monotonic(a in -2.0f32..2.0, b in -2.0f32..2.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(quantize_i16(lo) <= quantize_i16(hi));
    }
}
