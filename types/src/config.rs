//! Raw configuration tree as it appears in `config.toml`.
//!
//! These types only describe shape and serde defaults. Validation (every
//! category present, sane intervals) happens in `waypoints-core` when the
//! tree is turned into a resolver.

use serde::{Deserialize, Serialize};

use crate::{BeaconColor, CategoryTable, Material, WaypointCategory};

/// Root of the plugin configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WaypointsConfig {
    /// Format numbers with `,` as the decimal separator
    #[serde(default)]
    pub european_number_format: bool,

    #[serde(default)]
    pub inventory: InventoryConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

// ─────────────────────────────────────────────────────────────────────────────
// Inventory / menu
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Per-category waypoint menu items
    #[serde(default)]
    pub waypoints: CategoryTable<WaypointMenuConfig>,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            waypoints: CategoryTable::from_fn(WaypointMenuConfig::default_for),
        }
    }
}

/// Items used by the menu of a single waypoint category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaypointMenuConfig {
    /// Icon for waypoints of this category that have no icon override
    pub default_item: Material,
    pub background_item: Material,
    pub select_item: Material,
    pub delete_item: Material,
    pub rename_item: Material,
    pub move_to_folder_item: Material,
    pub teleport_item: Material,
    pub select_beacon_color_item: Material,
}

impl WaypointMenuConfig {
    /// Shipped defaults for a category
    pub fn default_for(category: WaypointCategory) -> Self {
        let default_item = match category {
            WaypointCategory::Private => Material::Compass,
            WaypointCategory::Public => Material::EnderEye,
            WaypointCategory::Permission => Material::Emerald,
            WaypointCategory::Death => Material::SkeletonSkull,
        };
        Self {
            default_item,
            background_item: Material::GrayStainedGlassPane,
            select_item: Material::Beacon,
            delete_item: Material::LavaBucket,
            rename_item: Material::NameTag,
            move_to_folder_item: Material::Chest,
            teleport_item: Material::EnderPearl,
            select_beacon_color_item: Material::LightBlueStainedGlass,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Period of the refresh sweep in milliseconds
    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,

    /// Which strategy renders waypoint indicators
    #[serde(default)]
    pub kind: DisplayKind,

    #[serde(default)]
    pub beacon: BeaconConfig,

    #[serde(default)]
    pub particle: ParticleConfig,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: default_update_interval_ms(),
            kind: DisplayKind::default(),
            beacon: BeaconConfig::default(),
            particle: ParticleConfig::default(),
        }
    }
}

/// Rendering strategy chosen at deployment time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayKind {
    #[default]
    Beacon,
    Particle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeaconConfig {
    /// Block the beacon stands on
    #[serde(default = "default_base_block")]
    pub base_block: Material,

    /// Beam color for waypoints without a color override
    #[serde(default)]
    pub default_color: CategoryTable<BeaconColor>,
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self {
            base_block: default_base_block(),
            default_color: CategoryTable::from_fn(|category| match category {
                WaypointCategory::Private => BeaconColor::LightBlue,
                WaypointCategory::Public => BeaconColor::Green,
                WaypointCategory::Permission => BeaconColor::Yellow,
                WaypointCategory::Death => BeaconColor::Black,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleConfig {
    /// Particles spawned at every trail point
    #[serde(default = "default_particle_amount")]
    pub amount: u32,

    /// Distance between trail points in blocks
    #[serde(default = "default_particle_spacing")]
    pub spacing: f64,

    /// Length of the trail in blocks
    #[serde(default = "default_particle_length")]
    pub length: f64,

    /// Height above the viewer's feet where the trail starts
    #[serde(default = "default_particle_vertical_offset")]
    pub vertical_offset: f64,

    /// Emit the trail every N sweeps (1 = every sweep)
    #[serde(default = "default_particle_every_ticks")]
    pub every_ticks: u32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            amount: default_particle_amount(),
            spacing: default_particle_spacing(),
            length: default_particle_length(),
            vertical_offset: default_particle_vertical_offset(),
            every_ticks: default_particle_every_ticks(),
        }
    }
}

fn default_update_interval_ms() -> u64 {
    1000
}

fn default_base_block() -> Material {
    Material::IronBlock
}

fn default_particle_amount() -> u32 {
    1
}

fn default_particle_spacing() -> f64 {
    0.5
}

fn default_particle_length() -> f64 {
    4.0
}

fn default_particle_vertical_offset() -> f64 {
    1.5
}

fn default_particle_every_ticks() -> u32 {
    1
}
