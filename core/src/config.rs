//! Configuration loading and the category-default resolver.
//!
//! The raw tree lives in `waypoints-types`. This module loads it (explicit
//! TOML path, or the platform config dir through `confy`) and validates it
//! into a [`ConfigResolver`], whose getters are total over every
//! [`WaypointCategory`]. A category missing from the file is a startup
//! error, never a display-time surprise.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use waypoints_types::{
    BeaconColor, CategoryTable, DisplayConfig, Material, WaypointCategory, WaypointMenuConfig,
    WaypointsConfig,
};

const APP_NAME: &str = "waypoints";

/// Smallest gap between particle trail points, in blocks
pub const MIN_PARTICLE_SPACING: f64 = 0.05;

/// Longest particle trail, in blocks
pub const MAX_PARTICLE_LENGTH: f64 = 128.0;

/// Errors that can occur while loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no {section} entry for waypoint category '{category}'")]
    MissingCategory {
        section: &'static str,
        category: WaypointCategory,
    },

    #[error("invalid value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },

    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("serialize error for {path:?}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },

    #[error("failed to load configuration: {0}")]
    Load(#[from] confy::ConfyError),
}

// ─────────────────────────────────────────────────────────────────────────────
// Loading
// ─────────────────────────────────────────────────────────────────────────────

/// Load/save helpers for the raw configuration tree
pub trait WaypointsConfigExt: Sized {
    /// Load from the platform config directory, writing defaults on first run
    fn load() -> Result<Self, ConfigError>;

    /// Load a specific TOML file
    fn load_from(path: &Path) -> Result<Self, ConfigError>;

    /// Write as pretty TOML
    fn save_to(&self, path: &Path) -> Result<(), ConfigError>;

    /// Validate into a resolver
    fn resolve(&self) -> Result<ConfigResolver, ConfigError>;
}

impl WaypointsConfigExt for WaypointsConfig {
    fn load() -> Result<Self, ConfigError> {
        let config: WaypointsConfig = confy::load(APP_NAME, None)?;
        Ok(config)
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            path: path.to_path_buf(),
            source: e,
        })?;

        fs::write(path, contents).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn resolve(&self) -> Result<ConfigResolver, ConfigError> {
        ConfigResolver::new(self)
    }
}

/// Location `confy` uses for the configuration file
pub fn default_config_path() -> Option<PathBuf> {
    confy::get_configuration_file_path(APP_NAME, None).ok()
}

/// Default directory for translation tables
pub fn default_translations_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_NAME).join("translations"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolver
// ─────────────────────────────────────────────────────────────────────────────

/// Validated, read-many view over the configuration.
///
/// Built once per (re)load. Every per-category getter is total.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    menus: [WaypointMenuConfig; 4],
    beacon_colors: [BeaconColor; 4],
    display: DisplayConfig,
    european_number_format: bool,
}

impl ConfigResolver {
    pub fn new(config: &WaypointsConfig) -> Result<Self, ConfigError> {
        let menus = require_all(&config.inventory.waypoints, "inventory.waypoints")?;
        let beacon_colors = require_all(
            &config.display.beacon.default_color,
            "display.beacon.default_color",
        )?;

        let display = &config.display;
        if display.update_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "display.update_interval_ms",
                reason: "must be greater than zero",
            });
        }
        if display.particle.every_ticks == 0 {
            return Err(ConfigError::Invalid {
                field: "display.particle.every_ticks",
                reason: "must be greater than zero",
            });
        }
        let particle = &display.particle;
        if !(particle.spacing >= MIN_PARTICLE_SPACING && particle.spacing.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "display.particle.spacing",
                reason: "must be a finite number of blocks, at least 0.05",
            });
        }
        if !(0.0..=MAX_PARTICLE_LENGTH).contains(&particle.length) {
            return Err(ConfigError::Invalid {
                field: "display.particle.length",
                reason: "must be between 0 and 128 blocks",
            });
        }
        if !particle.vertical_offset.is_finite() {
            return Err(ConfigError::Invalid {
                field: "display.particle.vertical_offset",
                reason: "must be a finite number of blocks",
            });
        }
        if !display.beacon.base_block.is_block() {
            return Err(ConfigError::Invalid {
                field: "display.beacon.base_block",
                reason: "must be a placeable block",
            });
        }

        Ok(Self {
            menus,
            beacon_colors,
            display: display.clone(),
            european_number_format: config.european_number_format,
        })
    }

    /// Icon for waypoints of `category` without an icon override
    pub fn default_icon(&self, category: WaypointCategory) -> Material {
        self.menus[category.index()].default_item
    }

    /// Beam color for waypoints of `category` without a color override
    pub fn default_beacon_color(&self, category: WaypointCategory) -> BeaconColor {
        self.beacon_colors[category.index()]
    }

    pub fn menu(&self, category: WaypointCategory) -> &WaypointMenuConfig {
        &self.menus[category.index()]
    }

    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.display.update_interval_ms)
    }

    pub fn european_number_format(&self) -> bool {
        self.european_number_format
    }
}

impl Default for ConfigResolver {
    /// Resolver over the shipped defaults
    fn default() -> Self {
        let config = WaypointsConfig::default();
        let value = |category: WaypointCategory| {
            (
                WaypointMenuConfig::default_for(category),
                config
                    .display
                    .beacon
                    .default_color
                    .get(category)
                    .copied()
                    .unwrap_or(BeaconColor::Clear),
            )
        };
        let rows = WaypointCategory::ALL.map(value);
        Self {
            menus: rows.map(|(menu, _)| menu),
            beacon_colors: rows.map(|(_, color)| color),
            display: config.display,
            european_number_format: config.european_number_format,
        }
    }
}

/// Collect one value per category, in `WaypointCategory::index` order
fn require_all<T: Copy>(
    table: &CategoryTable<T>,
    section: &'static str,
) -> Result<[T; 4], ConfigError> {
    let lookup = |category: WaypointCategory| {
        table
            .get(category)
            .copied()
            .ok_or(ConfigError::MissingCategory { section, category })
    };
    Ok([
        lookup(WaypointCategory::Private)?,
        lookup(WaypointCategory::Public)?,
        lookup(WaypointCategory::Permission)?,
        lookup(WaypointCategory::Death)?,
    ])
}
