//! Per-frequency radio settings table

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::parse::parse_number_rounded;

/// How a radio feeds its signal into the stereo field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StereoMode {
    /// Both ears.
    #[default]
    Both,
    /// Left ear only.
    LeftOnly,
    /// Right ear only.
    RightOnly,
}

impl StereoMode {
    /// Decode the engine's wire value (0/1/2); anything unknown plays on
    /// both ears.
    pub fn from_wire(value: i32) -> Self {
        match value {
            1 => StereoMode::LeftOnly,
            2 => StereoMode::RightOnly,
            _ => StereoMode::Both,
        }
    }
}

/// Listening settings for one tuned frequency.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencySettings {
    pub volume: i32,
    pub stereo_mode: StereoMode,
    /// Classname of the radio tuned here, when the engine reports it.
    pub radio_classname: Option<String>,
}

/// Decode the engine's tuned-frequency table.
///
/// Input looks like `"[[30000.0|9|0|anprc152],[31000.0|7|1]]"`: a
/// bracketed list of bracketed `|`-separated entries, three or four
/// fields each (the optional fourth is the radio classname). Entries
/// with any other field count are skipped; a frequency repeated later in
/// the list replaces the earlier one.
pub fn parse_frequencies(value: &str) -> HashMap<String, FrequencySettings> {
    let mut result = HashMap::new();
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .unwrap_or("");
    if inner.is_empty() {
        return result;
    }

    for entry in inner.split(',') {
        let entry = entry
            .strip_prefix('[')
            .and_then(|e| e.strip_suffix(']'))
            .unwrap_or(entry);
        let fields: Vec<&str> = entry.split('|').collect();
        if !(3..=4).contains(&fields.len()) {
            debug!("skipping malformed frequency entry {entry:?}");
            continue;
        }
        result.insert(
            fields[0].to_string(),
            FrequencySettings {
                volume: parse_number_rounded(fields[1]),
                stereo_mode: StereoMode::from_wire(parse_number_rounded(fields[2])),
                radio_classname: fields.get(3).map(|s| (*s).to_string()),
            },
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_three_field_entries() {
        let map = parse_frequencies("[[30000.0|9|0],[31000.0|7|2]]");
        assert_eq!(map.len(), 2);

        let first = &map["30000.0"];
        assert_eq!(first.volume, 9);
        assert_eq!(first.stereo_mode, StereoMode::Both);
        assert_eq!(first.radio_classname, None);

        let second = &map["31000.0"];
        assert_eq!(second.volume, 7);
        assert_eq!(second.stereo_mode, StereoMode::RightOnly);
    }

    #[test]
    fn test_fourth_field_is_the_radio_classname() {
        let map = parse_frequencies("[[30000.0|9|1|anprc152]]");
        let settings = &map["30000.0"];
        assert_eq!(settings.stereo_mode, StereoMode::LeftOnly);
        assert_eq!(settings.radio_classname.as_deref(), Some("anprc152"));
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let map = parse_frequencies("[[30000.0|9],[31000.0|7|0],[32000.0|1|2|x|extra]]");
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("31000.0"));
    }

    #[test]
    fn test_repeated_frequency_takes_the_last_entry() {
        let map = parse_frequencies("[[30000.0|9|0],[30000.0|2|1]]");
        assert_eq!(map.len(), 1);
        assert_eq!(map["30000.0"].volume, 2);
        assert_eq!(map["30000.0"].stereo_mode, StereoMode::LeftOnly);
    }

    #[test]
    fn test_empty_and_degenerate_input() {
        assert!(parse_frequencies("[]").is_empty());
        assert!(parse_frequencies("").is_empty());
        assert!(parse_frequencies("garbage").is_empty());
    }

    #[test]
    fn test_unknown_stereo_wire_value_falls_back() {
        let map = parse_frequencies("[[30000.0|9|7]]");
        assert_eq!(map["30000.0"].stereo_mode, StereoMode::Both);
    }
}
