//! Shared value and configuration types for the waypoints workspace.

mod category;
mod color;
mod config;
pub mod formatting;
mod material;

pub use category::{CategoryTable, WaypointCategory};
pub use color::BeaconColor;
pub use config::{
    BeaconConfig, DisplayConfig, DisplayKind, InventoryConfig, ParticleConfig, WaypointMenuConfig,
    WaypointsConfig,
};
pub use material::Material;

use std::fmt;

/// A symbolic name (material, color, category) that matches nothing known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSymbol {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownSymbol {
    fn material(value: &str) -> Self {
        Self { kind: "material", value: value.to_string() }
    }

    fn beacon_color(value: &str) -> Self {
        Self { kind: "beacon color", value: value.to_string() }
    }

    fn category(value: &str) -> Self {
        Self { kind: "waypoint category", value: value.to_string() }
    }
}

impl fmt::Display for UnknownSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} {:?}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownSymbol {}
