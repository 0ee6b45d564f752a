//! Weather selection.
//!
//! Each variant has two stable tags: a numeric button id and a serialized
//! name. Both mappings are total over the three variants and return `None`
//! for anything else.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Weather a selector can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum WeatherSelection {
    Clear = 0,
    Rain = 1,
    Thunder = 2,
}

impl WeatherSelection {
    pub const ALL: [Self; 3] = [Self::Clear, Self::Rain, Self::Thunder];

    #[must_use]
    pub const fn from_button_id(id: i32) -> Option<Self> {
        match id {
            0 => Some(Self::Clear),
            1 => Some(Self::Rain),
            2 => Some(Self::Thunder),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_serialized_name(name: &str) -> Option<Self> {
        match name {
            "clear" => Some(Self::Clear),
            "rain" => Some(Self::Rain),
            "thunder" => Some(Self::Thunder),
            _ => None,
        }
    }

    #[must_use]
    pub const fn button_id(self) -> i32 {
        self as i32
    }

    #[must_use]
    pub const fn serialized_name(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Rain => "rain",
            Self::Thunder => "thunder",
        }
    }

    /// Accepts either tag form, as typed in a command.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        Self::from_serialized_name(input)
            .or_else(|| input.parse().ok().and_then(Self::from_button_id))
    }
}

impl fmt::Display for WeatherSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.serialized_name())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_both_tags_round_trip() {
        for weather in WeatherSelection::ALL {
            assert_eq!(
                WeatherSelection::from_button_id(weather.button_id()),
                Some(weather)
            );
            assert_eq!(
                WeatherSelection::from_serialized_name(weather.serialized_name()),
                Some(weather)
            );
        }
    }

    #[test]
    fn test_tags_are_distinct() {
        let ids: HashSet<_> = WeatherSelection::ALL.iter().map(|w| w.button_id()).collect();
        let names: HashSet<_> = WeatherSelection::ALL
            .iter()
            .map(|w| w.serialized_name())
            .collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_invalid_tags() {
        assert_eq!(WeatherSelection::from_button_id(99), None);
        assert_eq!(WeatherSelection::from_button_id(-1), None);
        assert_eq!(WeatherSelection::from_serialized_name("bogus"), None);
        assert_eq!(WeatherSelection::from_serialized_name("Clear"), None);
        assert_eq!(WeatherSelection::from_serialized_name(""), None);
    }

    #[test]
    fn test_parse_accepts_either_form() {
        assert_eq!(WeatherSelection::parse("rain"), Some(WeatherSelection::Rain));
        assert_eq!(WeatherSelection::parse("2"), Some(WeatherSelection::Thunder));
        assert_eq!(WeatherSelection::parse("7"), None);
        assert_eq!(WeatherSelection::parse("storm"), None);
    }

    #[test]
    fn test_bincode_variant_index_matches_button_id() {
        // bincode encodes the variant index, which matches the button id.
        let bytes = bincode::serialize(&WeatherSelection::Thunder).unwrap();
        assert_eq!(bytes, 2u32.to_le_bytes());
        let back: WeatherSelection = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, WeatherSelection::Thunder);
    }
}
