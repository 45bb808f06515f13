//! Lamp state — the one durable fact about the physical world.

use serde::{Deserialize, Serialize};

use crate::daytime::DaytimeLevel;

/// Whether the lamp is lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LampState {
    On,
    #[default]
    Off,
}

impl LampState {
    /// Level written to the relay output (`true` energises the lamp).
    #[must_use]
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    /// Sensor-only verdict: the lamp belongs on when it is actually night.
    #[must_use]
    pub fn for_daytime(level: DaytimeLevel) -> Self {
        if level == DaytimeLevel::Night {
            Self::On
        } else {
            Self::Off
        }
    }
}

impl std::fmt::Display for LampState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_off() {
        assert_eq!(LampState::default(), LampState::Off);
    }

    #[test]
    fn should_want_light_only_at_night() {
        assert_eq!(LampState::for_daytime(DaytimeLevel::Night), LampState::On);
        assert_eq!(LampState::for_daytime(DaytimeLevel::Evening), LampState::Off);
        assert_eq!(LampState::for_daytime(DaytimeLevel::Day), LampState::Off);
    }

    #[test]
    fn should_display_lowercase_variant_name() {
        assert_eq!(LampState::On.to_string(), "on");
        assert_eq!(LampState::Off.to_string(), "off");
    }

    #[test]
    fn should_serialize_lowercase() {
        let json = serde_json::to_string(&LampState::On).unwrap();
        assert_eq!(json, "\"on\"");
    }
}
