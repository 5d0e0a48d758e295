//! Directional stereo panning from a flat heading angle
//!
//! The cheap model for line-of-sight direct speech: no positions, no
//! occlusion, just the bearing between speaker and listener projected onto
//! a loudness tilt between the ears.

use glam::Vec3;

use crate::scale::{GainPattern, scale_interleaved};

/// Half-angle of the interaural loudness tilt, in degrees.
const ILD_TILT_DEGREES: f32 = 21.5;

/// Gain both ears share where the tilt term crosses zero.
const ILD_BASE_GAIN: f32 = 0.625;

/// Heading of a direction vector in the horizontal plane, in radians.
pub fn polar_angle(direction: Vec3) -> f32 {
    direction.y.atan2(direction.x)
}

/// Pan a stereo buffer by the speaker's bearing relative to the listener.
///
/// The gain pair is `cos(dir) * radians(±21.5°) + 0.625` with the left ear
/// on the negative tilt; values run 0.25..=1.0 and are deliberately left
/// unclamped. No heading produces a unity pair on both ears at once — each
/// side peaks at 1.0 alone — so this stage always colors the signal.
///
/// Buffers with any other channel count pass through untouched.
pub fn apply_stereo_ild(samples: &mut [i16], channels: usize, direction: Vec3, view_angle: f32) {
    if channels != 2 {
        return;
    }
    let dir = polar_angle(direction) + view_angle;
    let gain_left = (-ILD_TILT_DEGREES).to_radians() * dir.cos() + ILD_BASE_GAIN;
    let gain_right = ILD_TILT_DEGREES.to_radians() * dir.cos() + ILD_BASE_GAIN;
    scale_interleaved(samples, GainPattern::stereo(gain_left, gain_right));
}
