//! Particle strategy: a short dust trail from the viewer toward the waypoint.
//!
//! Nothing persists client-side, so there is nothing to remove on disable.
//! The trail is colored with the resolved beacon color and emitted every
//! `display.particle.every_ticks` sweeps.

use super::viewer::{Viewer, ViewerId};
use super::{RenderError, WaypointDisplay};
use crate::config::ConfigResolver;
use crate::waypoint::Waypoint;

/// One emission of trail points
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleTrail {
    pub world: String,
    pub points: Vec<[f64; 3]>,
    pub color: [u8; 3],
    /// Particles per point
    pub amount: u32,
}

pub trait ParticleRenderer: Send + Sync {
    fn emit(&self, viewer: ViewerId, trail: &ParticleTrail) -> Result<(), RenderError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticleState {
    /// Sweeps since the last emission
    pub ticks_since_emit: u32,
}

pub struct ParticleDisplay<R> {
    renderer: R,
}

impl<R: ParticleRenderer> ParticleDisplay<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    fn emit(
        &self,
        viewer: &Viewer,
        waypoint: &Waypoint,
        config: &ConfigResolver,
    ) -> Result<(), RenderError> {
        let particle = &config.display().particle;
        let from = &viewer.location;
        let to = waypoint.location();
        if !from.same_world(to) {
            return Ok(());
        }

        let start = [from.x, from.y + particle.vertical_offset, from.z];
        let delta = [to.x - start[0], to.y - start[1], to.z - start[2]];
        let distance = (delta[0] * delta[0] + delta[1] * delta[1] + delta[2] * delta[2]).sqrt();
        let reach = particle.length.min(distance);
        let count = (reach / particle.spacing).floor() as usize;
        if count == 0 {
            return Ok(());
        }

        let dir = delta.map(|d| d / distance);
        let points = (1..=count)
            .map(|i| {
                let t = i as f64 * particle.spacing;
                [start[0] + dir[0] * t, start[1] + dir[1] * t, start[2] + dir[2] * t]
            })
            .collect();

        let trail = ParticleTrail {
            world: to.world.clone(),
            points,
            color: waypoint.resolve_beacon_color(config).rgb(),
            amount: particle.amount,
        };
        self.renderer.emit(viewer.id, &trail)
    }
}

impl<R: ParticleRenderer> WaypointDisplay for ParticleDisplay<R> {
    type State = ParticleState;

    fn name(&self) -> &'static str {
        "particle"
    }

    fn show(
        &self,
        viewer: &Viewer,
        waypoint: &Waypoint,
        config: &ConfigResolver,
    ) -> Result<ParticleState, RenderError> {
        self.emit(viewer, waypoint, config)?;
        Ok(ParticleState::default())
    }

    fn update(
        &self,
        viewer: &Viewer,
        waypoint: &Waypoint,
        config: &ConfigResolver,
        state: &mut ParticleState,
    ) -> Result<(), RenderError> {
        state.ticks_since_emit += 1;
        if state.ticks_since_emit < config.display().particle.every_ticks {
            return Ok(());
        }
        state.ticks_since_emit = 0;
        self.emit(viewer, waypoint, config)
    }

    fn disable(&self, _viewer: ViewerId, _state: ParticleState) -> Result<(), RenderError> {
        Ok(())
    }
}
