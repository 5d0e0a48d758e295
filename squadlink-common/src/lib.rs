//! Shared game-data glue for the squadlink voice backend
//!
//! The game engine reports state as strings in a bracketed, pipe-separated
//! micro-format. This crate decodes the scalar leaves and the handful of
//! tables the voice pipeline needs: per-frequency radio settings, vehicle
//! sound-isolation descriptors, and environment-driven range limits.
//!
//! Decoding is deliberately permissive — a malformed entry is skipped, a
//! malformed scalar parses as zero — because a stale or hand-edited
//! mission config must degrade to silence, not take the voice backend
//! down with it.

pub mod frequencies;
pub mod parse;
pub mod range;
pub mod vehicle;

pub use frequencies::{FrequencySettings, StereoMode, parse_frequencies};
pub use parse::{is_true, parse_number, parse_number_rounded};
pub use range::diver_radio_distance;
pub use vehicle::VehicleDescriptor;
