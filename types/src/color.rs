//! Beacon beam colors
//!
//! A beacon beam is tinted by the glass block placed on top of it, so every
//! color maps to exactly one glass material. `Clear` uses plain glass and
//! leaves the beam white.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Material, UnknownSymbol};

/// Color of a rendered waypoint beacon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BeaconColor {
    Clear,
    White,
    Orange,
    Magenta,
    LightBlue,
    Yellow,
    Lime,
    Pink,
    Gray,
    LightGray,
    Cyan,
    Purple,
    Blue,
    Brown,
    Green,
    Red,
    Black,
}

impl BeaconColor {
    pub const ALL: &'static [BeaconColor] = &[
        Self::Clear,
        Self::White,
        Self::Orange,
        Self::Magenta,
        Self::LightBlue,
        Self::Yellow,
        Self::Lime,
        Self::Pink,
        Self::Gray,
        Self::LightGray,
        Self::Cyan,
        Self::Purple,
        Self::Blue,
        Self::Brown,
        Self::Green,
        Self::Red,
        Self::Black,
    ];

    /// Canonical symbolic name used in config and persisted tags
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "CLEAR",
            Self::White => "WHITE",
            Self::Orange => "ORANGE",
            Self::Magenta => "MAGENTA",
            Self::LightBlue => "LIGHT_BLUE",
            Self::Yellow => "YELLOW",
            Self::Lime => "LIME",
            Self::Pink => "PINK",
            Self::Gray => "GRAY",
            Self::LightGray => "LIGHT_GRAY",
            Self::Cyan => "CYAN",
            Self::Purple => "PURPLE",
            Self::Blue => "BLUE",
            Self::Brown => "BROWN",
            Self::Green => "GREEN",
            Self::Red => "RED",
            Self::Black => "BLACK",
        }
    }

    /// Glass block that tints the beam to this color
    pub fn glass(self) -> Material {
        match self {
            Self::Clear => Material::Glass,
            Self::White => Material::WhiteStainedGlass,
            Self::Orange => Material::OrangeStainedGlass,
            Self::Magenta => Material::MagentaStainedGlass,
            Self::LightBlue => Material::LightBlueStainedGlass,
            Self::Yellow => Material::YellowStainedGlass,
            Self::Lime => Material::LimeStainedGlass,
            Self::Pink => Material::PinkStainedGlass,
            Self::Gray => Material::GrayStainedGlass,
            Self::LightGray => Material::LightGrayStainedGlass,
            Self::Cyan => Material::CyanStainedGlass,
            Self::Purple => Material::PurpleStainedGlass,
            Self::Blue => Material::BlueStainedGlass,
            Self::Brown => Material::BrownStainedGlass,
            Self::Green => Material::GreenStainedGlass,
            Self::Red => Material::RedStainedGlass,
            Self::Black => Material::BlackStainedGlass,
        }
    }

    /// RGB used for particles and leather-tinted icons
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Self::Clear => [255, 255, 255],
            Self::White => [249, 255, 254],
            Self::Orange => [249, 128, 29],
            Self::Magenta => [199, 78, 189],
            Self::LightBlue => [58, 179, 218],
            Self::Yellow => [254, 216, 61],
            Self::Lime => [128, 199, 31],
            Self::Pink => [243, 139, 170],
            Self::Gray => [71, 79, 82],
            Self::LightGray => [157, 157, 151],
            Self::Cyan => [22, 156, 156],
            Self::Purple => [137, 50, 184],
            Self::Blue => [60, 68, 170],
            Self::Brown => [131, 84, 50],
            Self::Green => [94, 124, 22],
            Self::Red => [176, 46, 38],
            Self::Black => [29, 29, 33],
        }
    }
}

impl BeaconColor {
    /// Exact canonical name only, as written by [`BeaconColor::as_str`]
    pub fn from_canonical(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|color| color.as_str() == name)
    }
}

impl FromStr for BeaconColor {
    type Err = UnknownSymbol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let canonical: String = s
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();
        Self::ALL
            .iter()
            .copied()
            .find(|color| color.as_str() == canonical)
            .ok_or_else(|| UnknownSymbol::beacon_color(s))
    }
}

impl TryFrom<String> for BeaconColor {
    type Error = UnknownSymbol;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BeaconColor> for String {
    fn from(color: BeaconColor) -> Self {
        color.as_str().to_string()
    }
}

impl fmt::Display for BeaconColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_color_has_beam_glass() {
        for color in BeaconColor::ALL {
            assert!(color.glass().tints_beacon_beam(), "{color} has no beam glass");
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("LIGHT_BLUE".parse::<BeaconColor>().unwrap(), BeaconColor::LightBlue);
        assert_eq!("light blue".parse::<BeaconColor>().unwrap(), BeaconColor::LightBlue);
        assert!("CHARTREUSE".parse::<BeaconColor>().is_err());
    }

    #[test]
    fn test_canonical_lookup_is_exact() {
        assert_eq!(BeaconColor::from_canonical("LIGHT_BLUE"), Some(BeaconColor::LightBlue));
        assert_eq!(BeaconColor::from_canonical("light blue"), None);
    }
}
