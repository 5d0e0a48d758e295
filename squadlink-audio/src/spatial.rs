//! 3D positional panning through a spatial response model
//!
//! The full-geometry path for voice that is not line-of-sight simple: the
//! host hands over both players' positions and view directions plus the
//! per-radio loudness settings, and the stage derives a stereo gain pair
//! from a listener/emitter response query, normalizes it, and burns it into
//! the buffer through the vectorized scaler.
//!
//! The response computation itself sits behind the [`SpatialResponse`]
//! trait. [`SpatialContext`] is the shipped implementation — an immutable
//! value the host builds once at startup and shares freely across threads;
//! there is no hidden global handle to initialize.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use glam::Vec3;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::warn;

use crate::scale::{GainPattern, scale_interleaved};

/// Speed of sound in metres per second at sea level.
///
/// Reserved for Doppler once the response model computes it; the
/// matrix-only path does not consume it.
pub const SPEED_OF_SOUND: f32 = 343.5;

/// Post-normalization loudness boost. A lone clearly audible speaker is
/// deliberately louder than a unity gain pair spread over both ears; the
/// pair is clamped to a unity sum first and boosted second, never the
/// other way around.
const HEADROOM: f32 = 1.35;

/// Control points in a voice distance curve.
const VOICE_CURVE_POINTS: usize = 20;

/// Directional loudness falloff around a front axis.
///
/// Angles are measured in radians between the front axis and the ray to
/// the other party; gain blends linearly from `inner_volume` to
/// `outer_volume` between the two angles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cone {
    pub inner_angle: f32,
    pub outer_angle: f32,
    pub inner_volume: f32,
    pub outer_volume: f32,
}

impl Cone {
    /// Mouth directivity for spoken voice: presence boost ahead of the
    /// speaker, flat to the sides and behind.
    pub const VOICE: Self = Self {
        inner_angle: FRAC_PI_2,       // 90°
        outer_angle: 3.0 * FRAC_PI_4, // 135°
        inner_volume: 1.8,
        outer_volume: 1.0,
    };

    /// Gain for a ray `angle` radians off the front axis.
    pub fn gain(&self, angle: f32) -> f32 {
        if angle <= self.inner_angle {
            self.inner_volume
        } else if angle >= self.outer_angle {
            self.outer_volume
        } else {
            let t = (angle - self.inner_angle) / (self.outer_angle - self.inner_angle);
            self.inner_volume + t * (self.outer_volume - self.inner_volume)
        }
    }
}

/// Errors constructing a [`DistanceCurve`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CurveError {
    #[error("distance curve needs at least one control point")]
    Empty,

    #[error("distance curve points must be ordered by increasing distance")]
    Unordered,
}

/// Ordered `(distance, gain)` control points, linearly interpolated.
///
/// Gain outside the covered distance range clamps to the end points.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceCurve {
    points: Vec<(f32, f32)>,
}

impl DistanceCurve {
    /// Build a curve from control points ordered by distance.
    pub fn new(points: Vec<(f32, f32)>) -> Result<Self, CurveError> {
        if points.is_empty() {
            return Err(CurveError::Empty);
        }
        if points.windows(2).any(|w| w[1].0 < w[0].0) {
            return Err(CurveError::Unordered);
        }
        Ok(Self { points })
    }

    /// Per-radio voice falloff: unity at the mouth, then nineteen samples
    /// of the caller's attenuation model spaced `voice_volume / 19` metres
    /// apart. This replaces any default inverse-distance law with the
    /// radio-range logic's own curve.
    pub fn voice<F>(voice_volume: i32, should_hear: bool, attenuation: F) -> Self
    where
        F: Fn(f32, bool, i32) -> f32,
    {
        let step = voice_volume as f32 / (VOICE_CURVE_POINTS - 1) as f32;
        let mut points = Vec::with_capacity(VOICE_CURVE_POINTS);
        points.push((0.0, 1.0));
        for k in 1..VOICE_CURVE_POINTS {
            let distance = step * k as f32;
            points.push((distance, attenuation(distance, should_hear, voice_volume)));
        }
        Self { points }
    }

    /// Interpolated gain at `distance`.
    pub fn gain(&self, distance: f32) -> f32 {
        let first = self.points[0];
        if distance <= first.0 {
            return first.1;
        }
        for pair in self.points.windows(2) {
            let (d0, g0) = pair[0];
            let (d1, g1) = pair[1];
            if distance <= d1 {
                if d1 <= d0 {
                    return g1;
                }
                let t = (distance - d0) / (d1 - d0);
                return g0 + t * (g1 - g0);
            }
        }
        self.points[self.points.len() - 1].1
    }

    /// The control points, ordered by distance.
    pub fn points(&self) -> &[(f32, f32)] {
        &self.points
    }
}

/// The receiving side of a response query.
#[derive(Clone, Debug)]
pub struct Listener {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    pub cone: Option<Cone>,
}

/// The emitting side: mono voice with a directional cone and a custom
/// distance falloff.
#[derive(Clone, Debug)]
pub struct Emitter {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    pub channel_count: u32,
    pub channel_radius: f32,
    pub curve_distance_scaler: f32,
    pub cone: Option<Cone>,
    pub volume_curve: DistanceCurve,
}

/// Destination speaker arrangement for the response matrix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpeakerLayout {
    /// Front-left / front-right pair.
    #[default]
    Stereo,
}

impl SpeakerLayout {
    /// Destination channels the layout carries.
    pub fn channels(&self) -> usize {
        match self {
            SpeakerLayout::Stereo => 2,
        }
    }
}

/// Computes a source-channel × destination-channel gain matrix from
/// listener/emitter geometry.
///
/// The pan stage consumes columns 0 and 1 of the first source row;
/// implementations may fill more for wider layouts.
pub trait SpatialResponse {
    /// Fill `matrix` (row-major, `emitter.channel_count` rows of
    /// `dst_channels` columns) with mix gains.
    fn mix_matrix(
        &self,
        listener: &Listener,
        emitter: &Emitter,
        dst_channels: usize,
        matrix: &mut [f32],
    );
}

/// Shipped spatial response state.
///
/// Built once by the host and passed by reference into every positional
/// pan call. The struct is immutable, so it is `Send + Sync` and safe to
/// share between voice threads without any locking.
#[derive(Clone, Debug)]
pub struct SpatialContext {
    layout: SpeakerLayout,
    speed_of_sound: f32,
}

impl SpatialContext {
    pub fn new(layout: SpeakerLayout) -> Self {
        Self {
            layout,
            speed_of_sound: SPEED_OF_SOUND,
        }
    }

    pub fn layout(&self) -> SpeakerLayout {
        self.layout
    }

    pub fn speed_of_sound(&self) -> f32 {
        self.speed_of_sound
    }
}

impl Default for SpatialContext {
    fn default() -> Self {
        Self::new(SpeakerLayout::Stereo)
    }
}

impl SpatialResponse for SpatialContext {
    /// Level-only response model: distance falloff from the emitter's own
    /// curve, cone directivity on both parties, and equal-power panning of
    /// the lateral component in the listener's frame. Front and back pan
    /// identically — a stereo pair cannot convey that axis.
    fn mix_matrix(
        &self,
        listener: &Listener,
        emitter: &Emitter,
        dst_channels: usize,
        matrix: &mut [f32],
    ) {
        debug_assert!(matrix.len() >= emitter.channel_count as usize * dst_channels);
        matrix.fill(0.0);

        let offset = emitter.position - listener.position;
        let distance = offset.length();

        let mut gain = emitter.volume_curve.gain(distance / emitter.curve_distance_scaler);

        if let Some(cone) = &emitter.cone {
            gain *= if distance > f32::EPSILON {
                let to_listener = -offset / distance;
                let cos = emitter.front.normalize_or_zero().dot(to_listener);
                cone.gain(cos.clamp(-1.0, 1.0).acos())
            } else {
                cone.inner_volume
            };
        }

        if let Some(cone) = &listener.cone {
            if distance > f32::EPSILON {
                let to_emitter = offset / distance;
                let cos = listener.front.normalize_or_zero().dot(to_emitter);
                gain *= cone.gain(cos.clamp(-1.0, 1.0).acos());
            }
        }

        // Lateral pan position in the listener's frame. sin(azimuth) keeps
        // directly-ahead and directly-behind both centered.
        let front = listener.front.normalize_or_zero();
        let right = front.cross(listener.up).normalize_or_zero();
        let lateral = offset.dot(right);
        let ahead = offset.dot(front);
        let pan = lateral.atan2(ahead).sin();

        // Equal-power spread across the front pair.
        let spread = (pan + 1.0) * FRAC_PI_4;
        match self.layout {
            SpeakerLayout::Stereo => {
                matrix[0] = gain * spread.cos();
                if dst_channels > 1 {
                    matrix[1] = gain * spread.sin();
                }
            }
        }
    }
}

/// Up vector for a view direction with world Z up:
/// `right = front × Z`, `up = right × front`.
fn derived_up(front: Vec3) -> Vec3 {
    front.cross(Vec3::Z).cross(front)
}

/// Clamp a raw response gain pair, then boost it by the fixed headroom.
///
/// A pair summing past 1.0 is first scaled back to exactly a unity sum so
/// stacked sources cannot run away; every pair then gets the 1.35 boost,
/// so a raw pair that already summed below unity comes out exactly 1.35×
/// its input.
pub fn normalize_gain_pair(left: f32, right: f32) -> (f32, f32) {
    let total = left + right;
    let mut mult = HEADROOM;
    if total > 1.0 {
        mult *= 1.0 / total;
    }
    (left * mult, right * mult)
}

/// Place a mono speaker's stream in the stereo field from full 3D geometry.
///
/// Builds the response query the way the game feeds it: the response
/// listener rides at the *speaker's* position with our view direction, and
/// the response emitter at *our* position with the speaker's view direction
/// flipped on X and Y — the inverted convention the response levels were
/// tuned against, kept verbatim. The emitter carries the spoken-voice cone
/// and a twenty-point distance curve sampled from the caller's
/// `attenuation(distance, should_hear, voice_volume)` model.
///
/// The resulting gain pair is normalized (unity-sum clamp, then the 1.35
/// headroom boost) and applied through the vectorized scaler. Needs a
/// stereo destination; other channel counts log a warning and pass the
/// buffer through untouched.
#[allow(clippy::too_many_arguments)]
pub fn apply_spatial_ild<R, F>(
    response: &R,
    samples: &mut [i16],
    channels: usize,
    my_position: Vec3,
    my_view_direction: Vec3,
    emitter_position: Vec3,
    emitter_view_direction: Vec3,
    should_hear: bool,
    voice_volume: i32,
    attenuation: F,
) where
    R: SpatialResponse + ?Sized,
    F: Fn(f32, bool, i32) -> f32,
{
    if channels < 2 {
        warn!("positional pan needs a stereo destination, got {channels} channel(s)");
        return;
    }

    let listener = Listener {
        position: emitter_position,
        front: my_view_direction,
        up: derived_up(my_view_direction),
        cone: None,
    };

    let emitter_front = emitter_view_direction.normalize_or_zero();
    let emitter = Emitter {
        position: my_position,
        front: Vec3::new(-emitter_front.x, -emitter_front.y, emitter_front.z),
        up: derived_up(emitter_front),
        channel_count: 1,
        channel_radius: 1.0,
        curve_distance_scaler: 1.0,
        cone: Some(Cone::VOICE),
        volume_curve: DistanceCurve::voice(voice_volume, should_hear, attenuation),
    };

    // Scratch for one source row; lives for this call only.
    let mut matrix: SmallVec<[f32; 8]> = SmallVec::from_elem(0.0, channels);
    response.mix_matrix(&listener, &emitter, channels, &mut matrix);

    let (gain_left, gain_right) = normalize_gain_pair(matrix[0], matrix[1]);
    scale_interleaved(samples, GainPattern::stereo(gain_left, gain_right));
}
