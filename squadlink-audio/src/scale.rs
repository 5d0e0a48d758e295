//! Interleaved sample scaling: wide SSE2 path with a scalar fallback
//!
//! Every pipeline stage funnels its gain math through [`scale_interleaved`],
//! which runs the wide path over as much of the buffer as it can and finishes
//! the remainder one sample at a time. Both paths share one definition of the
//! arithmetic: widen to f32, multiply by the lane gain, truncate toward zero,
//! narrow back to i16 (saturating at the type bounds, which the gain ranges
//! this crate produces never reach).

/// Samples per wide block: eight i16 values fill one 128-bit lane.
pub const WIDE_BLOCK: usize = 8;

/// Four gain lanes applied cyclically to interleaved samples.
///
/// Lane `i % 4` scales sample `i`, so a stereo buffer uses
/// `[left, right, left, right]` and a uniform gain repeats one value.
/// Four lanes cover up to four interleaved channels; a surround center
/// channel would need a wider pattern.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GainPattern([f32; 4]);

impl GainPattern {
    /// The same gain on every lane.
    pub fn uniform(gain: f32) -> Self {
        Self([gain; 4])
    }

    /// Alternating left/right gains for a stereo-interleaved buffer.
    pub fn stereo(left: f32, right: f32) -> Self {
        Self([left, right, left, right])
    }

    /// The raw lane values.
    pub fn lanes(&self) -> [f32; 4] {
        self.0
    }
}

/// Strategy seam between the wide and scalar scaling paths.
///
/// Implementations must agree bit-for-bit on every input; the wide path is
/// purely a throughput optimization.
pub trait SampleScaler {
    /// Multiply each sample in place by its lane gain.
    fn scale(&self, samples: &mut [i16], pattern: GainPattern);
}

/// Portable per-sample path. Any length, any alignment.
pub struct ScalarScaler;

impl SampleScaler for ScalarScaler {
    fn scale(&self, samples: &mut [i16], pattern: GainPattern) {
        let lanes = pattern.lanes();
        for (i, sample) in samples.iter_mut().enumerate() {
            *sample = (f32::from(*sample) * lanes[i % 4]) as i16;
        }
    }
}

/// SSE2 path processing eight samples per iteration.
///
/// Only runs over slices that satisfy [`WideLaneScaler::supports`]; SSE2
/// itself is part of the x86-64 baseline, so the predicate is purely about
/// the slice, not the machine.
pub struct WideLaneScaler;

impl WideLaneScaler {
    /// Whether the wide path can run over this exact slice: a whole number
    /// of eight-sample blocks starting at a 16-byte boundary.
    pub fn supports(samples: &[i16]) -> bool {
        cfg!(target_arch = "x86_64")
            && samples.len() % WIDE_BLOCK == 0
            && samples.as_ptr() as usize % 16 == 0
    }
}

impl SampleScaler for WideLaneScaler {
    #[cfg(target_arch = "x86_64")]
    fn scale(&self, samples: &mut [i16], pattern: GainPattern) {
        debug_assert!(Self::supports(samples));
        // SAFETY: `supports` guarantees 16-byte alignment and a whole number
        // of blocks; SSE2 is unconditionally available on x86-64.
        unsafe { scale_blocks_sse2(samples, pattern) }
    }

    #[cfg(not(target_arch = "x86_64"))]
    fn scale(&self, samples: &mut [i16], pattern: GainPattern) {
        ScalarScaler.scale(samples, pattern);
    }
}

#[cfg(target_arch = "x86_64")]
unsafe fn scale_blocks_sse2(samples: &mut [i16], pattern: GainPattern) {
    use std::arch::x86_64::*;

    // SAFETY: the caller guarantees 16-byte alignment and len % 8 == 0, so
    // every aligned 128-bit load/store below stays inside the slice.
    unsafe {
        let gains = _mm_loadu_ps(pattern.lanes().as_ptr());
        let zero = _mm_setzero_si128();
        for start in (0..samples.len()).step_by(WIDE_BLOCK) {
            let block = samples.as_mut_ptr().add(start) as *mut __m128i;
            let v = _mm_load_si128(block);
            // Sign-extend the eight i16 lanes into two i32 quads.
            let sign = _mm_cmpgt_epi16(zero, v);
            let lo = _mm_unpacklo_epi16(v, sign);
            let hi = _mm_unpackhi_epi16(v, sign);
            // Multiply in f32 and truncate back toward zero. Both quads use
            // the same four gain lanes, which is exactly the cyclic pattern.
            let lo = _mm_cvttps_epi32(_mm_mul_ps(_mm_cvtepi32_ps(lo), gains));
            let hi = _mm_cvttps_epi32(_mm_mul_ps(_mm_cvtepi32_ps(hi), gains));
            _mm_store_si128(block, _mm_packs_epi32(lo, hi));
        }
    }
}

/// Scale every sample by its lane gain, wide path first.
///
/// The wide prefix covers the largest whole number of blocks the slice
/// supports; the remainder always goes through the scalar path. A prefix is
/// a multiple of eight samples, so the lane cycle stays in phase across the
/// split.
pub fn scale_interleaved(samples: &mut [i16], pattern: GainPattern) {
    let prefix = samples.len() - samples.len() % WIDE_BLOCK;
    let (head, tail) = samples.split_at_mut(prefix);
    if !head.is_empty() && WideLaneScaler::supports(head) {
        WideLaneScaler.scale(head, pattern);
    } else {
        ScalarScaler.scale(head, pattern);
    }
    ScalarScaler.scale(tail, pattern);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Backing store that forces the wide path's alignment requirement.
    #[repr(align(16))]
    struct AlignedSamples([i16; 64]);

    fn test_signal() -> AlignedSamples {
        let mut buf = AlignedSamples([0; 64]);
        for (i, s) in buf.0.iter_mut().enumerate() {
            *s = ((i as i32 * 1103 % 65536) - 32768) as i16;
        }
        buf.0[0] = i16::MAX;
        buf.0[1] = i16::MIN;
        buf.0[2] = -1;
        buf.0[3] = 1;
        buf
    }

    #[test]
    fn test_scalar_wide_equivalence() {
        for gains in [
            GainPattern::uniform(0.0),
            GainPattern::uniform(0.33),
            GainPattern::uniform(0.999),
            GainPattern::uniform(1.35),
            GainPattern::stereo(0.25, 1.0),
            GainPattern::stereo(0.9997, 0.2503),
        ] {
            let mut wide = test_signal();
            let mut scalar = test_signal();
            assert!(WideLaneScaler::supports(&wide.0) || !cfg!(target_arch = "x86_64"));
            WideLaneScaler.scale(&mut wide.0, gains);
            ScalarScaler.scale(&mut scalar.0, gains);
            assert_eq!(wide.0, scalar.0, "paths disagree for {gains:?}");
        }
    }

    #[test]
    fn test_split_path_matches_scalar_for_ragged_lengths() {
        // Lengths that are not multiples of 8 exercise the remainder loop.
        for len in [1, 7, 8, 9, 15, 16, 23, 61, 64] {
            let mut split = test_signal();
            let mut scalar = test_signal();
            let gains = GainPattern::stereo(0.625, 1.0002);
            scale_interleaved(&mut split.0[..len], gains);
            ScalarScaler.scale(&mut scalar.0[..len], gains);
            assert_eq!(split.0, scalar.0, "length {len}");
        }
    }

    #[test]
    fn test_misaligned_slice_falls_back() {
        // Starting one sample in breaks 16-byte alignment; the result must
        // still match the scalar reference exactly.
        let mut buf = test_signal();
        let mut reference = test_signal();
        let gains = GainPattern::uniform(0.77);
        assert!(!WideLaneScaler::supports(&buf.0[1..49]));
        scale_interleaved(&mut buf.0[1..49], gains);
        ScalarScaler.scale(&mut reference.0[1..49], gains);
        assert_eq!(buf.0, reference.0);
    }

    #[test]
    fn test_lane_cycling() {
        let mut buf = AlignedSamples([100; 64]);
        ScalarScaler.scale(&mut buf.0, GainPattern([1.0, 2.0, 3.0, 4.0]));
        for chunk in buf.0.chunks(4) {
            assert_eq!(chunk, [100, 200, 300, 400]);
        }
    }

    #[test]
    fn test_truncates_toward_zero() {
        let mut buf = [1001, -1001, 999, -999];
        ScalarScaler.scale(&mut buf, GainPattern::uniform(0.5));
        assert_eq!(buf, [500, -500, 499, -499]);
    }
}
