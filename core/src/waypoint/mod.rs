//! Waypoint entity model
//!
//! A waypoint is a named, world-anchored marker owned by a user. It stores
//! optional per-waypoint overrides for its icon material and beacon color;
//! the effective values are resolved on every call against the current
//! [`ConfigResolver`], falling back to the category default when the
//! override is unset.
//!
//! ```text
//!   Waypoint { category, overrides }  ──resolve──▶  override
//!                     │                               or
//!                     └──────▶ CategoryTraits ──────▶ category default (config)
//! ```

mod category;
mod codec;
mod list;
mod location;

pub use category::{CategoryTraits, traits};
pub use codec::keys;
pub use list::{LoadFailure, SharedWaypoint, WaypointList, read_waypoint};
pub use location::{BlockPos, Location};

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;
use waypoints_types::{BeaconColor, Material, WaypointCategory};

use crate::config::ConfigResolver;
use crate::translation::TranslationKey;

/// Stable identity of a waypoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WaypointId(Uuid);

impl WaypointId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for WaypointId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for WaypointId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for WaypointId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for WaypointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A waypoint could not be reconstituted or modified
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WaypointError {
    #[error("missing mandatory field '{field}'")]
    MissingField { field: &'static str },

    #[error("field '{field}' has type {found}, expected {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("field '{field}' is not a finite number")]
    NonFinite { field: &'static str },

    #[error("unknown material '{0}'")]
    UnknownMaterial(String),

    #[error("unknown beacon color '{0}'")]
    UnknownBeaconColor(String),

    #[error("unknown waypoint category '{0}'")]
    UnknownCategory(String),

    #[error("invalid waypoint id '{0}'")]
    InvalidId(String),

    #[error("duplicate waypoint id {0}")]
    DuplicateId(WaypointId),

    #[error("waypoint name must not be empty")]
    EmptyName,
}

/// A persistent location marker
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    id: WaypointId,
    category: WaypointCategory,
    name: String,
    location: Location,
    material: Option<Material>,
    beacon_color: Option<BeaconColor>,
}

impl Waypoint {
    /// Fresh waypoint with no overrides
    pub fn new(
        category: WaypointCategory,
        name: impl Into<String>,
        location: Location,
    ) -> Result<Self, WaypointError> {
        let name = validate_name(name.into())?;
        validate_location(&location)?;
        Ok(Self {
            id: WaypointId::new(),
            category,
            name,
            location,
            material: None,
            beacon_color: None,
        })
    }

    pub fn private(name: impl Into<String>, location: Location) -> Result<Self, WaypointError> {
        Self::new(WaypointCategory::Private, name, location)
    }

    pub fn id(&self) -> WaypointId {
        self.id
    }

    pub fn category(&self) -> WaypointCategory {
        self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), WaypointError> {
        self.name = validate_name(name.into())?;
        Ok(())
    }

    pub fn relocate(&mut self, location: Location) -> Result<(), WaypointError> {
        validate_location(&location)?;
        self.location = location;
        Ok(())
    }

    // ─── Overrides ──────────────────────────────────────────────────────────

    /// Explicit icon override, `None` when the category default applies
    pub fn material_override(&self) -> Option<Material> {
        self.material
    }

    /// Explicit beacon color override, `None` when the category default applies
    pub fn beacon_color_override(&self) -> Option<BeaconColor> {
        self.beacon_color
    }

    /// Set or clear (`None`) the icon override
    pub fn set_material(&mut self, material: Option<Material>) {
        self.material = material;
    }

    /// Set or clear (`None`) the beacon color override
    pub fn set_beacon_color(&mut self, color: Option<BeaconColor>) {
        self.beacon_color = color;
    }

    // ─── Resolution ─────────────────────────────────────────────────────────

    /// Effective icon: override, else the category default from `config`
    pub fn resolve_material(&self, config: &ConfigResolver) -> Material {
        self.material
            .unwrap_or_else(|| (traits(self.category).default_icon)(config))
    }

    /// Effective beacon color: override, else the category default from `config`
    pub fn resolve_beacon_color(&self, config: &ConfigResolver) -> BeaconColor {
        self.beacon_color
            .unwrap_or_else(|| (traits(self.category).default_beacon_color)(config))
    }

    /// Display-name key of this waypoint's category
    pub fn translation_key(&self) -> TranslationKey {
        traits(self.category).translation_key
    }
}

fn validate_name(name: String) -> Result<String, WaypointError> {
    if name.trim().is_empty() {
        return Err(WaypointError::EmptyName);
    }
    Ok(name)
}

fn validate_location(location: &Location) -> Result<(), WaypointError> {
    match location.non_finite_axis() {
        Some(field) => Err(WaypointError::NonFinite { field }),
        None => Ok(()),
    }
}
