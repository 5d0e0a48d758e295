//! Owned interleaved PCM buffers

use glam::Vec3;
use thiserror::Error;

use crate::{gain, mix, pan};

/// Errors constructing a [`SampleBuffer`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    /// Sample data does not divide evenly into whole frames.
    #[error("{len} samples do not form whole frames of {channels} channel(s)")]
    LengthMismatch { len: usize, channels: usize },

    /// A buffer needs at least one channel.
    #[error("channel count must be at least 1")]
    NoChannels,
}

/// A mutable, exclusively owned run of interleaved 16-bit PCM.
///
/// Mono buffers carry source speech, stereo buffers carry the mixed
/// output. Pipeline stages mutate the samples in place and never resize
/// the buffer; `len == sample_count * channels` holds for the lifetime of
/// the value.
#[derive(Debug, PartialEq, Eq)]
pub struct SampleBuffer {
    samples: Vec<i16>,
    channels: usize,
}

impl SampleBuffer {
    /// Wrap existing interleaved samples.
    pub fn from_interleaved(samples: Vec<i16>, channels: usize) -> Result<Self, BufferError> {
        if channels == 0 {
            return Err(BufferError::NoChannels);
        }
        if samples.len() % channels != 0 {
            return Err(BufferError::LengthMismatch {
                len: samples.len(),
                channels,
            });
        }
        Ok(Self { samples, channels })
    }

    /// A silent buffer of `sample_count` frames.
    pub fn silence(sample_count: usize, channels: usize) -> Result<Self, BufferError> {
        Self::from_interleaved(vec![0; sample_count * channels], channels)
    }

    /// Interleaved channels per frame.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Frames per channel.
    pub fn sample_count(&self) -> usize {
        self.samples.len() / self.channels
    }

    pub fn as_slice(&self) -> &[i16] {
        &self.samples
    }

    pub fn as_mut_slice(&mut self) -> &mut [i16] {
        &mut self.samples
    }

    /// Copy into a freshly allocated buffer owned by the caller.
    pub fn duplicate(&self) -> Self {
        Self {
            samples: self.samples.clone(),
            channels: self.channels,
        }
    }

    /// Take the samples back out.
    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }

    /// Uniform gain over all channels; see [`gain::apply_gain`].
    pub fn apply_gain(&mut self, volume: f32) {
        gain::apply_gain(&mut self.samples, volume);
    }

    /// Heading-based stereo pan; see [`pan::apply_stereo_ild`].
    pub fn apply_stereo_ild(&mut self, direction: Vec3, view_angle: f32) {
        pan::apply_stereo_ild(&mut self.samples, self.channels, direction, view_angle);
    }

    /// Mix another buffer of the same shape into this one.
    pub fn mix_from(&mut self, other: &SampleBuffer) {
        debug_assert_eq!(self.channels, other.channels);
        mix::mix_into(&mut self.samples, &other.samples);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_frame_invariant() {
        assert!(SampleBuffer::from_interleaved(vec![0; 10], 2).is_ok());
        assert_eq!(
            SampleBuffer::from_interleaved(vec![0; 9], 2),
            Err(BufferError::LengthMismatch {
                len: 9,
                channels: 2
            })
        );
        assert_eq!(
            SampleBuffer::from_interleaved(vec![], 0),
            Err(BufferError::NoChannels)
        );
    }

    #[test]
    fn test_sample_count_is_frames() {
        let buf = SampleBuffer::silence(735, 2).unwrap();
        assert_eq!(buf.sample_count(), 735);
        assert_eq!(buf.as_slice().len(), 735 * 2);
    }

    #[test]
    fn test_duplicate_is_a_detached_copy() {
        let mut original = SampleBuffer::from_interleaved(vec![5, -5, 7, -7], 2).unwrap();
        let copy = original.duplicate();
        original.apply_gain(0.0);
        assert_eq!(copy.as_slice(), &[5, -5, 7, -7]);
        assert_eq!(original.as_slice(), &[0, 0, 0, 0]);
    }
}
