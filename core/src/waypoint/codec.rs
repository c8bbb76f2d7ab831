//! Compound tag encoding of a waypoint.
//!
//! Mandatory fields (`type`, `name`, `world`, `x`, `y`, `z`) must be present
//! and well-typed; nothing is substituted for them. `material` and
//! `beaconColor` are written only when the override is set and read back as
//! `None` when absent. `id` is always written; a tag without one predates
//! stable identities and is given a fresh id.

use waypoints_types::{BeaconColor, Material, WaypointCategory};

use super::{Location, Waypoint, WaypointError, WaypointId};
use crate::tag::{CompoundTag, Tag};

/// Field names used in the persisted compound
pub mod keys {
    pub const ID: &str = "id";
    pub const CATEGORY: &str = "type";
    pub const NAME: &str = "name";
    pub const WORLD: &str = "world";
    pub const X: &str = "x";
    pub const Y: &str = "y";
    pub const Z: &str = "z";
    pub const MATERIAL: &str = "material";
    pub const BEACON_COLOR: &str = "beaconColor";
}

impl Waypoint {
    pub fn to_tag(&self) -> CompoundTag {
        let mut tag = CompoundTag::new();
        tag.put(keys::ID, self.id.to_string());
        tag.put(keys::CATEGORY, self.category.as_str());
        tag.put(keys::NAME, self.name.as_str());
        tag.put(keys::WORLD, self.location.world.as_str());
        tag.put(keys::X, self.location.x);
        tag.put(keys::Y, self.location.y);
        tag.put(keys::Z, self.location.z);
        if let Some(material) = self.material {
            tag.put(keys::MATERIAL, material.as_str());
        }
        if let Some(color) = self.beacon_color {
            tag.put(keys::BEACON_COLOR, color.as_str());
        }
        tag
    }

    pub fn from_tag(tag: &CompoundTag) -> Result<Self, WaypointError> {
        let category = required_str(tag, keys::CATEGORY)?;
        let category = category
            .parse::<WaypointCategory>()
            .map_err(|_| WaypointError::UnknownCategory(category.to_string()))?;

        let name = required_str(tag, keys::NAME)?;
        if name.trim().is_empty() {
            return Err(WaypointError::EmptyName);
        }

        let location = Location::new(
            required_str(tag, keys::WORLD)?,
            required_f64(tag, keys::X)?,
            required_f64(tag, keys::Y)?,
            required_f64(tag, keys::Z)?,
        );

        let id = match optional_str(tag, keys::ID)? {
            Some(raw) => raw
                .parse::<WaypointId>()
                .map_err(|_| WaypointError::InvalidId(raw.to_string()))?,
            None => WaypointId::new(),
        };

        let material = optional_str(tag, keys::MATERIAL)?
            .map(|raw| {
                Material::from_canonical(raw)
                    .ok_or_else(|| WaypointError::UnknownMaterial(raw.to_string()))
            })
            .transpose()?;

        let beacon_color = optional_str(tag, keys::BEACON_COLOR)?
            .map(|raw| {
                BeaconColor::from_canonical(raw)
                    .ok_or_else(|| WaypointError::UnknownBeaconColor(raw.to_string()))
            })
            .transpose()?;

        Ok(Self {
            id,
            category,
            name: name.to_string(),
            location,
            material,
            beacon_color,
        })
    }
}

fn required<'a>(tag: &'a CompoundTag, field: &'static str) -> Result<&'a Tag, WaypointError> {
    tag.get(field).ok_or(WaypointError::MissingField { field })
}

fn required_str<'a>(tag: &'a CompoundTag, field: &'static str) -> Result<&'a str, WaypointError> {
    let value = required(tag, field)?;
    value.as_str().ok_or(WaypointError::WrongType {
        field,
        expected: "string",
        found: value.type_name(),
    })
}

fn optional_str<'a>(
    tag: &'a CompoundTag,
    field: &'static str,
) -> Result<Option<&'a str>, WaypointError> {
    match tag.get(field) {
        None => Ok(None),
        Some(value) => value.as_str().map(Some).ok_or(WaypointError::WrongType {
            field,
            expected: "string",
            found: value.type_name(),
        }),
    }
}

fn required_f64(tag: &CompoundTag, field: &'static str) -> Result<f64, WaypointError> {
    let value = required(tag, field)?;
    let n = value.as_f64().ok_or(WaypointError::WrongType {
        field,
        expected: "number",
        found: value.type_name(),
    })?;
    if !n.is_finite() {
        return Err(WaypointError::NonFinite { field });
    }
    Ok(n)
}
