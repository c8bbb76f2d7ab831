//! Render backends that only log, for dry runs outside a server

use std::sync::atomic::{AtomicUsize, Ordering};

use waypoints_core::display::{
    BeaconMarker, BeaconRenderer, ParticleRenderer, ParticleTrail, RenderError, ViewerId,
    ViewerPresence,
};
use waypoints_core::Location;

#[derive(Default)]
pub struct LoggingBeacons {
    pub sent: AtomicUsize,
}

impl BeaconRenderer for LoggingBeacons {
    fn place(&self, viewer: ViewerId, marker: &BeaconMarker) -> Result<(), RenderError> {
        self.sent.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            %viewer,
            world = %marker.world,
            position = %marker.position,
            base = %marker.base_block,
            glass = %marker.glass(),
            "place beacon"
        );
        Ok(())
    }

    fn remove(&self, viewer: ViewerId, marker: &BeaconMarker) -> Result<(), RenderError> {
        self.sent.fetch_add(1, Ordering::Relaxed);
        tracing::info!(%viewer, world = %marker.world, position = %marker.position, "remove beacon");
        Ok(())
    }
}

#[derive(Default)]
pub struct LoggingParticles {
    pub sent: AtomicUsize,
}

impl ParticleRenderer for LoggingParticles {
    fn emit(&self, viewer: ViewerId, trail: &ParticleTrail) -> Result<(), RenderError> {
        self.sent.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            %viewer,
            world = %trail.world,
            points = trail.points.len(),
            color = ?trail.color,
            "emit particles"
        );
        Ok(())
    }
}

/// A single viewer standing still at a fixed location
pub struct FixedViewer {
    pub id: ViewerId,
    pub location: Location,
}

impl ViewerPresence for FixedViewer {
    fn locate(&self, viewer: ViewerId) -> Option<Location> {
        (viewer == self.id).then(|| self.location.clone())
    }
}
