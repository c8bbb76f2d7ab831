//! Beacon strategy: a client-side beacon with a tinted glass block on top,
//! placed at the waypoint's block position for one viewer.

use waypoints_types::{BeaconColor, Material};

use super::viewer::{Viewer, ViewerId};
use super::{RenderError, WaypointDisplay};
use crate::config::ConfigResolver;
use crate::waypoint::{BlockPos, Waypoint};

/// Blocks making up one rendered beacon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeaconMarker {
    pub world: String,
    /// Position of the beacon block; the base sits one below, the glass one above
    pub position: BlockPos,
    pub base_block: Material,
    pub color: BeaconColor,
}

impl BeaconMarker {
    fn for_waypoint(waypoint: &Waypoint, config: &ConfigResolver) -> Self {
        let location = waypoint.location();
        Self {
            world: location.world.clone(),
            position: location.block(),
            base_block: config.display().beacon.base_block,
            color: waypoint.resolve_beacon_color(config),
        }
    }

    pub fn glass(&self) -> Material {
        self.color.glass()
    }

    /// 3x3 base layer under the beacon
    pub fn base_positions(&self) -> impl Iterator<Item = BlockPos> + '_ {
        (-1..=1).flat_map(move |dx| (-1..=1).map(move |dz| self.position.offset(dx, -1, dz)))
    }

    pub fn glass_position(&self) -> BlockPos {
        self.position.offset(0, 1, 0)
    }
}

/// Client-side block sender used by [`BeaconDisplay`]
pub trait BeaconRenderer: Send + Sync {
    /// Send (or overwrite) the marker's blocks to the viewer
    fn place(&self, viewer: ViewerId, marker: &BeaconMarker) -> Result<(), RenderError>;

    /// Restore the real blocks where the marker was sent
    fn remove(&self, viewer: ViewerId, marker: &BeaconMarker) -> Result<(), RenderError>;
}

/// What the viewer currently has on screen. `None` while the viewer is in
/// another world than the waypoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeaconState {
    pub placed: Option<BeaconMarker>,
}

pub struct BeaconDisplay<R> {
    renderer: R,
}

impl<R: BeaconRenderer> BeaconDisplay<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

impl<R: BeaconRenderer> WaypointDisplay for BeaconDisplay<R> {
    type State = BeaconState;

    fn name(&self) -> &'static str {
        "beacon"
    }

    fn show(
        &self,
        viewer: &Viewer,
        waypoint: &Waypoint,
        config: &ConfigResolver,
    ) -> Result<BeaconState, RenderError> {
        let mut state = BeaconState::default();
        self.update(viewer, waypoint, config, &mut state)?;
        Ok(state)
    }

    fn update(
        &self,
        viewer: &Viewer,
        waypoint: &Waypoint,
        config: &ConfigResolver,
        state: &mut BeaconState,
    ) -> Result<(), RenderError> {
        let visible = viewer.location.same_world(waypoint.location());
        let wanted = BeaconMarker::for_waypoint(waypoint, config);

        // `state.placed` always covers every block the viewer may have been
        // sent, so a teardown after a failed call still restores them.
        match (&state.placed, visible) {
            (Some(current), true) if *current == wanted => {}
            (Some(current), true) => {
                // A moved beacon leaves its old blocks behind unless removed;
                // a recolor just overwrites in place.
                if current.position != wanted.position || current.world != wanted.world {
                    self.renderer.remove(viewer.id, current)?;
                }
                let wanted = state.placed.insert(wanted);
                self.renderer.place(viewer.id, wanted)?;
            }
            (Some(current), false) => {
                self.renderer.remove(viewer.id, current)?;
                state.placed = None;
            }
            (None, true) => {
                let wanted = state.placed.insert(wanted);
                self.renderer.place(viewer.id, wanted)?;
            }
            (None, false) => {}
        }
        Ok(())
    }

    fn disable(&self, viewer: ViewerId, state: BeaconState) -> Result<(), RenderError> {
        match state.placed {
            Some(marker) => self.renderer.remove(viewer, &marker),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::waypoint::Location;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Place(BeaconMarker),
        Remove(BeaconMarker),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<Call>>,
        refuse_place: AtomicBool,
        refuse_remove: AtomicBool,
    }

    impl Recorder {
        fn take(&self) -> Vec<Call> {
            std::mem::take(&mut *self.calls.lock().unwrap())
        }
    }

    impl BeaconRenderer for Recorder {
        fn place(&self, _: ViewerId, marker: &BeaconMarker) -> Result<(), RenderError> {
            if self.refuse_place.load(Ordering::SeqCst) {
                return Err(RenderError::new("place", "connection reset"));
            }
            self.calls.lock().unwrap().push(Call::Place(marker.clone()));
            Ok(())
        }

        fn remove(&self, _: ViewerId, marker: &BeaconMarker) -> Result<(), RenderError> {
            if self.refuse_remove.load(Ordering::SeqCst) {
                return Err(RenderError::new("remove", "connection reset"));
            }
            self.calls.lock().unwrap().push(Call::Remove(marker.clone()));
            Ok(())
        }
    }

    fn viewer_in(world: &str) -> Viewer {
        Viewer {
            id: ViewerId::new(),
            location: Location::new(world, 0.0, 64.0, 0.0),
        }
    }

    #[test]
    fn test_show_places_with_category_color() {
        let display = BeaconDisplay::new(Recorder::default());
        let config = ConfigResolver::default();
        let waypoint = Waypoint::private("Home", Location::new("world", 5.5, 70.0, -3.2)).unwrap();

        let state = display.show(&viewer_in("world"), &waypoint, &config).unwrap();
        let marker = state.placed.clone().unwrap();
        assert_eq!(marker.position, BlockPos::new(5, 70, -4));
        assert_eq!(marker.color, BeaconColor::LightBlue);
        assert_eq!(marker.glass(), Material::LightBlueStainedGlass);
        assert_eq!(marker.base_positions().count(), 9);
        assert_eq!(display.renderer().take(), vec![Call::Place(marker)]);
    }

    #[test]
    fn test_unchanged_update_sends_nothing() {
        let display = BeaconDisplay::new(Recorder::default());
        let config = ConfigResolver::default();
        let viewer = viewer_in("world");
        let waypoint = Waypoint::private("Home", Location::new("world", 0.0, 0.0, 0.0)).unwrap();

        let mut state = display.show(&viewer, &waypoint, &config).unwrap();
        display.renderer().take();
        display.update(&viewer, &waypoint, &config, &mut state).unwrap();
        assert!(display.renderer().take().is_empty());
    }

    #[test]
    fn test_recolor_overwrites_and_move_removes_old() {
        let display = BeaconDisplay::new(Recorder::default());
        let config = ConfigResolver::default();
        let viewer = viewer_in("world");
        let mut waypoint = Waypoint::private("Home", Location::new("world", 0.0, 0.0, 0.0)).unwrap();
        let mut state = display.show(&viewer, &waypoint, &config).unwrap();
        let first = state.placed.clone().unwrap();
        display.renderer().take();

        waypoint.set_beacon_color(Some(BeaconColor::Red));
        display.update(&viewer, &waypoint, &config, &mut state).unwrap();
        let calls = display.renderer().take();
        assert_eq!(calls.len(), 1);
        assert!(matches!(&calls[0], Call::Place(m) if m.color == BeaconColor::Red));

        waypoint.relocate(Location::new("world", 10.0, 0.0, 0.0)).unwrap();
        display.update(&viewer, &waypoint, &config, &mut state).unwrap();
        let calls = display.renderer().take();
        assert_eq!(calls.len(), 2);
        assert!(matches!(&calls[0], Call::Remove(m) if m.position == first.position));
        assert!(matches!(&calls[1], Call::Place(m) if m.position == BlockPos::new(10, 0, 0)));
    }

    #[test]
    fn test_other_world_hides_until_return() {
        let display = BeaconDisplay::new(Recorder::default());
        let config = ConfigResolver::default();
        let mut viewer = viewer_in("world");
        let waypoint = Waypoint::private("Home", Location::new("world", 0.0, 0.0, 0.0)).unwrap();
        let mut state = display.show(&viewer, &waypoint, &config).unwrap();
        display.renderer().take();

        viewer.location = Location::new("world_nether", 0.0, 64.0, 0.0);
        display.update(&viewer, &waypoint, &config, &mut state).unwrap();
        assert!(state.placed.is_none());
        assert!(matches!(display.renderer().take()[..], [Call::Remove(_)]));

        display.disable(viewer.id, state.clone()).unwrap();
        assert!(display.renderer().take().is_empty());

        viewer.location = Location::new("world", 0.0, 64.0, 0.0);
        display.update(&viewer, &waypoint, &config, &mut state).unwrap();
        assert!(state.placed.is_some());
        assert!(matches!(display.renderer().take()[..], [Call::Place(_)]));
    }

    #[test]
    fn test_disable_removes_placed_marker() {
        let display = BeaconDisplay::new(Recorder::default());
        let config = ConfigResolver::default();
        let viewer = viewer_in("world");
        let waypoint = Waypoint::private("Home", Location::new("world", 0.0, 0.0, 0.0)).unwrap();
        let state = display.show(&viewer, &waypoint, &config).unwrap();
        display.renderer().take();

        display.disable(viewer.id, state).unwrap();
        assert!(matches!(display.renderer().take()[..], [Call::Remove(_)]));
    }

    #[test]
    fn test_failed_recolor_keeps_marker_for_cleanup() {
        let display = BeaconDisplay::new(Recorder::default());
        let config = ConfigResolver::default();
        let viewer = viewer_in("world");
        let mut waypoint = Waypoint::private("Home", Location::new("world", 0.0, 0.0, 0.0)).unwrap();
        let mut state = display.show(&viewer, &waypoint, &config).unwrap();
        display.renderer().take();

        display.renderer().refuse_place.store(true, Ordering::SeqCst);
        waypoint.set_beacon_color(Some(BeaconColor::Red));
        assert!(display.update(&viewer, &waypoint, &config, &mut state).is_err());
        let kept = state.placed.clone().unwrap();
        assert_eq!(kept.position, BlockPos::new(0, 0, 0));

        display.disable(viewer.id, state).unwrap();
        assert_eq!(display.renderer().take(), vec![Call::Remove(kept)]);
    }

    #[test]
    fn test_failed_removal_on_move_keeps_old_marker() {
        let display = BeaconDisplay::new(Recorder::default());
        let config = ConfigResolver::default();
        let viewer = viewer_in("world");
        let mut waypoint = Waypoint::private("Home", Location::new("world", 0.0, 0.0, 0.0)).unwrap();
        let mut state = display.show(&viewer, &waypoint, &config).unwrap();
        let first = state.placed.clone().unwrap();
        display.renderer().take();

        display.renderer().refuse_remove.store(true, Ordering::SeqCst);
        waypoint.relocate(Location::new("world", 10.0, 0.0, 0.0)).unwrap();
        assert!(display.update(&viewer, &waypoint, &config, &mut state).is_err());
        assert_eq!(state.placed.as_ref(), Some(&first));

        let mut viewer = viewer;
        viewer.location = Location::new("world_nether", 0.0, 64.0, 0.0);
        assert!(display.update(&viewer, &waypoint, &config, &mut state).is_err());
        assert_eq!(state.placed.as_ref(), Some(&first));
        assert!(display.renderer().take().is_empty());
    }
}
