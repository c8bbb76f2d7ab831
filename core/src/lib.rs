pub mod config;
pub mod display;
pub mod icon;
pub mod tag;
pub mod translation;
pub mod waypoint;

// Re-exports for convenience
pub use config::{ConfigError, ConfigResolver, WaypointsConfigExt};
pub use display::{
    BeaconDisplay, DisplayEngine, EngineConfig, ParticleDisplay, RenderError, ShowOutcome,
    SweepReport, ViewerId, ViewerPresence, WaypointDisplay, spawn_scheduler,
};
pub use icon::{Icon, IconBuilder, waypoint_icon};
pub use tag::{CompoundTag, Tag};
pub use translation::{TranslationKey, TranslationTable, Translations};
pub use waypoint::{Location, SharedWaypoint, Waypoint, WaypointError, WaypointId, WaypointList};
pub use waypoints_types::{BeaconColor, Material, WaypointCategory, WaypointsConfig};
