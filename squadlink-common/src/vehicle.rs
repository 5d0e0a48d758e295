//! Vehicle descriptors reported by the engine

use serde::{Deserialize, Serialize};

use crate::parse::parse_number;

/// Sound-isolation info for the vehicle a player occupies.
///
/// The engine encodes it in the vehicle ID string: `"<name>_turnout"` for
/// turned-out crew (who hear the outside unattenuated),
/// `"<name>_<isolation>"` with a trailing attenuation factor otherwise,
/// or a bare name for vehicles without isolation data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleDescriptor {
    pub vehicle_name: String,
    /// How strongly the hull attenuates outside audio; 0.0 = not at all.
    pub isolation: f32,
}

impl VehicleDescriptor {
    /// Split an engine vehicle ID into name and isolation factor.
    pub fn parse(vehicle_id: &str) -> Self {
        if let Some(pos) = vehicle_id.find("_turnout") {
            return Self {
                vehicle_name: vehicle_id[..pos].to_string(),
                isolation: 0.0,
            };
        }
        match vehicle_id.rfind('_') {
            Some(pos) => Self {
                vehicle_name: vehicle_id[..pos].to_string(),
                isolation: parse_number(&vehicle_id[pos + 1..]),
            },
            None => Self {
                vehicle_name: vehicle_id.to_string(),
                isolation: 0.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turned_out_crew_has_no_isolation() {
        let desc = VehicleDescriptor::parse("btr80_turnout");
        assert_eq!(desc.vehicle_name, "btr80");
        assert_eq!(desc.isolation, 0.0);
    }

    #[test]
    fn test_trailing_isolation_factor() {
        let desc = VehicleDescriptor::parse("btr80_0.85");
        assert_eq!(desc.vehicle_name, "btr80");
        assert!((desc.isolation - 0.85).abs() < 1e-6);
    }

    #[test]
    fn test_name_with_underscores_keeps_all_but_the_last_segment() {
        let desc = VehicleDescriptor::parse("b_apc_tracked_01_0.5");
        assert_eq!(desc.vehicle_name, "b_apc_tracked_01");
        assert!((desc.isolation - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_bare_name() {
        let desc = VehicleDescriptor::parse("quadbike");
        assert_eq!(desc.vehicle_name, "quadbike");
        assert_eq!(desc.isolation, 0.0);
    }
}
