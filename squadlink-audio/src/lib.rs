//! Squadlink voice DSP
//!
//! Per-frame post-processing for radio voice streams in the squadlink
//! simulation backend. The surrounding pipeline hands each stage an
//! interleaved 16-bit PCM buffer it owns for the duration of the call;
//! stages mutate in place and never hold on to the buffer.
//!
//! Architecture:
//! - Every gain-applying stage funnels through [`scale::scale_interleaved`],
//!   which runs a wide SSE2 path over the aligned body of the buffer and a
//!   scalar path over the remainder, with identical arithmetic on both.
//! - [`gain`] applies a uniform volume with mute/unity fast paths.
//! - [`pan`] derives a cheap interaural level difference from a flat
//!   bearing, for line-of-sight direct speech.
//! - [`spatial`] derives the gain pair from full 3D geometry through a
//!   [`spatial::SpatialResponse`] query plus a per-radio distance curve.
//! - [`mix`] folds processed streams together with saturating addition.
//!
//! Audio format:
//! - Signed 16-bit PCM, interleaved by channel
//! - Mono source emitters, stereo output buffers

pub mod buffer;
pub mod gain;
pub mod mix;
pub mod pan;
pub mod scale;
pub mod spatial;


pub use buffer::{BufferError, SampleBuffer};
pub use gain::{apply_gain, volume_multiplier};
pub use mix::mix_into;
pub use pan::{apply_stereo_ild, polar_angle};
pub use scale::{GainPattern, SampleScaler, ScalarScaler, WideLaneScaler, scale_interleaved};
pub use spatial::{
    Cone, CurveError, DistanceCurve, Emitter, Listener, SpatialContext, SpatialResponse,
    SpeakerLayout, apply_spatial_ild, normalize_gain_pair,
};
