//! Uniform gain and the perceptual volume curve

use crate::scale::{GainPattern, scale_interleaved};

/// Apply one volume multiplier to every sample in the buffer.
///
/// Zero volume clears the buffer outright and unity volume leaves it
/// untouched; anything in between goes through the vectorized scaler.
/// The gain is channel-agnostic, so interleaving does not matter here.
///
/// Volume is expected to be finite and non-negative; a negative value
/// would invert the waveform's phase and is left undefined.
pub fn apply_gain(samples: &mut [i16], volume: f32) {
    if volume == 0.0 {
        samples.fill(0);
        return;
    }
    if volume == 1.0 {
        return;
    }
    scale_interleaved(samples, GainPattern::uniform(volume));
}

/// Map a nominal `[-1, 1]` volume setting to a gain multiplier.
///
/// `((v + 1) / 10)^4` — steep by intent: most of the setting's range stays
/// near silence and the loud end grows quickly.
pub fn volume_multiplier(value: f32) -> f32 {
    let normalized = (value + 1.0) / 10.0;
    normalized.powi(4)
}
