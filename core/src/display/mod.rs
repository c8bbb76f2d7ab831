//! Waypoint display engine
//!
//! Owns the (viewer, waypoint) → render session table and drives periodic
//! refresh. Rendering itself is delegated to a [`WaypointDisplay`]
//! strategy (beacon or particle), which only ever sees one session at a
//! time and never touches the table.
//!
//! Per pair the lifecycle is Hidden (no record) → Shown (record exists) →
//! Disabled (record removed). The engine ends sessions itself when the
//! viewer disappears, the waypoint is deleted or the backend fails.

mod beacon;
mod engine;
mod particle;
mod scheduler;
mod session;
mod viewer;

#[cfg(test)]
mod engine_tests;

pub use beacon::{BeaconDisplay, BeaconMarker, BeaconRenderer, BeaconState};
pub use engine::{DisplayEngine, EngineConfig, ShowOutcome, SweepReport, UpdateOutcome};
pub use particle::{ParticleDisplay, ParticleRenderer, ParticleState, ParticleTrail};
pub use scheduler::spawn_scheduler;
pub use session::{SessionEnd, SessionKey};
pub use viewer::{Viewer, ViewerId, ViewerPresence};

use crate::config::ConfigResolver;
use crate::waypoint::Waypoint;

/// A rendering backend failure.
///
/// The engine logs it and force-disables the session; it is never retried
/// on the next sweep.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{primitive} render failed: {message}")]
pub struct RenderError {
    /// What was being rendered (e.g. `beacon`, `particles`)
    pub primitive: &'static str,
    pub message: String,
}

impl RenderError {
    pub fn new(primitive: &'static str, message: impl Into<String>) -> Self {
        Self {
            primitive,
            message: message.into(),
        }
    }
}

/// A rendering strategy for waypoint indicators.
///
/// Implementations are stateless apart from [`Self::State`], which the
/// engine stores per session and hands back on every call.
pub trait WaypointDisplay: Send + Sync {
    type State: Send;

    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Initial render for a newly Shown session
    fn show(
        &self,
        viewer: &Viewer,
        waypoint: &Waypoint,
        config: &ConfigResolver,
    ) -> Result<Self::State, RenderError>;

    /// Recurring refresh while Shown
    fn update(
        &self,
        viewer: &Viewer,
        waypoint: &Waypoint,
        config: &ConfigResolver,
        state: &mut Self::State,
    ) -> Result<(), RenderError>;

    /// Tear down whatever `show`/`update` left behind for this viewer
    fn disable(&self, viewer: ViewerId, state: Self::State) -> Result<(), RenderError>;
}
