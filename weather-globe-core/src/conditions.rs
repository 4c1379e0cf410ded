//! Weather condition registry.
//!
//! One table maps WMO weather codes to display metadata. The result card and
//! the globe annotations both read from here, so icons and colors never drift
//! apart between the two.

use std::fmt;

use crate::model::WeatherCode;

/// An sRGB color, displayed as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const GOLD: Color = Color::rgb(0xFF, 0xD7, 0x00);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const ORANGE: Color = Color::rgb(0xFF, 0xA5, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Display metadata for one weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionInfo {
    pub label: &'static str,
    pub icon: &'static str,
    /// Accent color, used for arcs on the globe.
    pub color: Color,
    pub particle_color: Color,
}

const CLEAR: ConditionInfo = ConditionInfo {
    label: "Clear",
    icon: "☀️",
    color: Color::GOLD,
    particle_color: Color::GOLD,
};

const CONDITIONS: &[(u16, ConditionInfo)] = &[
    (0, CLEAR),
    (
        1,
        ConditionInfo {
            label: "Mostly Clear",
            icon: "🌤️",
            color: Color::rgb(0x87, 0xCE, 0xEB),
            particle_color: Color::rgb(0x87, 0xCE, 0xEB),
        },
    ),
    (
        2,
        ConditionInfo {
            label: "Partly Cloudy",
            icon: "⛅",
            color: Color::rgb(0xB0, 0xC4, 0xDE),
            particle_color: Color::rgb(0xB0, 0xC4, 0xDE),
        },
    ),
    (
        3,
        ConditionInfo {
            label: "Overcast",
            icon: "☁️",
            color: Color::GOLD,
            particle_color: Color::GOLD,
        },
    ),
    (
        45,
        ConditionInfo {
            label: "Fog",
            icon: "🌫️",
            color: Color::rgb(0xD3, 0xD3, 0xD3),
            particle_color: Color::rgb(0xD3, 0xD3, 0xD3),
        },
    ),
    (
        61,
        ConditionInfo {
            label: "Rain",
            icon: "🌧️",
            color: Color::rgb(0x46, 0x82, 0xB4),
            particle_color: Color::rgb(0x46, 0x82, 0xB4),
        },
    ),
    (
        71,
        ConditionInfo {
            label: "Snow",
            icon: "❄️",
            color: Color::rgb(0xF0, 0xF8, 0xFF),
            particle_color: Color::WHITE,
        },
    ),
    (
        95,
        ConditionInfo {
            label: "Thunderstorm",
            icon: "⛈️",
            color: Color::ORANGE,
            particle_color: Color::GOLD,
        },
    ),
];

/// Look up display metadata for a weather code.
///
/// Codes missing from the table resolve to the "Clear" entry.
pub fn lookup(code: WeatherCode) -> &'static ConditionInfo {
    CONDITIONS
        .iter()
        .find(|(known, _)| *known == code.0)
        .map(|(_, info)| info)
        .unwrap_or(&CLEAR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn known_codes_resolve_to_their_entry() {
        assert_eq!(lookup(WeatherCode(1)).label, "Mostly Clear");
        assert_eq!(lookup(WeatherCode(45)).label, "Fog");
        assert_eq!(lookup(WeatherCode(95)).icon, "⛈️");
        assert_eq!(lookup(WeatherCode(71)).particle_color, Color::WHITE);
    }

    #[test]
    fn unknown_codes_fall_back_to_clear() {
        for code in [4, 44, 48, 51, 80, 96, 99, 1000, u16::MAX] {
            assert_eq!(*lookup(WeatherCode(code)), CLEAR, "code {code}");
        }
    }

    #[test]
    fn table_has_no_duplicate_codes() {
        let codes: HashSet<u16> = CONDITIONS.iter().map(|(code, _)| *code).collect();
        assert_eq!(codes.len(), CONDITIONS.len());
        assert_eq!(codes.len(), 8);
    }

    #[test]
    fn every_table_entry_is_reachable() {
        for (code, info) in CONDITIONS {
            assert_eq!(lookup(WeatherCode(*code)), info, "code {code}");
        }
    }

    #[test]
    fn color_displays_as_hex() {
        assert_eq!(Color::GOLD.to_string(), "#FFD700");
        assert_eq!(Color::rgb(0x46, 0x82, 0xB4).to_string(), "#4682B4");
    }
}
