//! Tests for the display engine
//!
//! Covers the per-pair state machine, session teardown when viewers or
//! waypoints disappear, failure isolation within a sweep, and randomized
//! show/disable interleaving against a running sweep.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use hashbrown::HashSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;
use waypoints_types::{BeaconColor, WaypointCategory, WaypointsConfig};

use super::*;
use crate::config::{ConfigResolver, WaypointsConfigExt};
use crate::waypoint::{Location, SharedWaypoint, Waypoint, WaypointId, WaypointList, read_waypoint};

// ─────────────────────────────────────────────────────────────────────────────
// Fakes
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Show,
    Update,
    Disable,
}

/// Records every call and checks that updates only reach live sessions
#[derive(Default)]
struct FakeDisplay {
    calls: Mutex<Vec<(Op, ViewerId, WaypointId)>>,
    live: Mutex<HashSet<SessionKey>>,
    violations: AtomicUsize,
    /// Waypoint names whose updates fail
    failing: Mutex<HashSet<String>>,
    /// Waypoint names whose initial render fails
    failing_show: Mutex<HashSet<String>>,
}

impl FakeDisplay {
    fn count(&self, op: Op, viewer: ViewerId) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(o, v, _)| *o == op && *v == viewer)
            .count()
    }

    fn ops_for(&self, viewer: ViewerId, waypoint: WaypointId) -> Vec<Op> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, v, w)| *v == viewer && *w == waypoint)
            .map(|(op, _, _)| *op)
            .collect()
    }

    fn fail_updates_for(&self, name: &str) {
        self.failing.lock().unwrap().insert(name.to_string());
    }
}

impl WaypointDisplay for FakeDisplay {
    type State = WaypointId;

    fn name(&self) -> &'static str {
        "fake"
    }

    fn show(
        &self,
        viewer: &Viewer,
        waypoint: &Waypoint,
        _config: &ConfigResolver,
    ) -> Result<WaypointId, RenderError> {
        if self.failing_show.lock().unwrap().contains(waypoint.name()) {
            return Err(RenderError::new("fake", "show refused"));
        }
        self.calls
            .lock()
            .unwrap()
            .push((Op::Show, viewer.id, waypoint.id()));
        self.live
            .lock()
            .unwrap()
            .insert(SessionKey::new(viewer.id, waypoint.id()));
        Ok(waypoint.id())
    }

    fn update(
        &self,
        viewer: &Viewer,
        waypoint: &Waypoint,
        _config: &ConfigResolver,
        state: &mut WaypointId,
    ) -> Result<(), RenderError> {
        assert_eq!(*state, waypoint.id());
        if !self
            .live
            .lock()
            .unwrap()
            .contains(&SessionKey::new(viewer.id, waypoint.id()))
        {
            self.violations.fetch_add(1, Ordering::SeqCst);
        }
        self.calls
            .lock()
            .unwrap()
            .push((Op::Update, viewer.id, waypoint.id()));
        if self.failing.lock().unwrap().contains(waypoint.name()) {
            return Err(RenderError::new("fake", "backend down"));
        }
        Ok(())
    }

    fn disable(&self, viewer: ViewerId, state: WaypointId) -> Result<(), RenderError> {
        self.calls.lock().unwrap().push((Op::Disable, viewer, state));
        self.live
            .lock()
            .unwrap()
            .remove(&SessionKey::new(viewer, state));
        Ok(())
    }
}

#[derive(Default)]
struct FakePresence {
    online: Mutex<HashMap<ViewerId, Location>>,
}

impl FakePresence {
    fn join(&self, world: &str) -> ViewerId {
        let id = ViewerId::new();
        self.move_to(id, world);
        id
    }

    fn move_to(&self, id: ViewerId, world: &str) {
        self.online
            .lock()
            .unwrap()
            .insert(id, Location::new(world, 0.0, 64.0, 0.0));
    }

    fn leave(&self, id: ViewerId) {
        self.online.lock().unwrap().remove(&id);
    }
}

impl ViewerPresence for FakePresence {
    fn locate(&self, viewer: ViewerId) -> Option<Location> {
        self.online.lock().unwrap().get(&viewer).cloned()
    }
}

type FakeEngine = DisplayEngine<FakeDisplay, Arc<FakePresence>>;

fn make_engine() -> (Arc<FakeEngine>, Arc<FakePresence>) {
    let presence = Arc::new(FakePresence::default());
    let engine = DisplayEngine::new(
        FakeDisplay::default(),
        Arc::clone(&presence),
        Arc::new(ConfigResolver::default()),
        EngineConfig::default(),
    );
    (Arc::new(engine), presence)
}

fn make_waypoints(list: &mut WaypointList, names: &[&str]) -> Vec<SharedWaypoint> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let waypoint =
                Waypoint::private(*name, Location::new("world", i as f64 * 10.0, 64.0, 0.0))
                    .unwrap();
            list.add(waypoint).unwrap()
        })
        .collect()
}

fn id_of(waypoint: &SharedWaypoint) -> WaypointId {
    read_waypoint(waypoint).id()
}

// ─────────────────────────────────────────────────────────────────────────────
// State machine
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_disable_before_show_is_noop() {
    let (engine, presence) = make_engine();
    let viewer = presence.join("world");

    assert_eq!(engine.disable(viewer), 0);
    assert_eq!(engine.disable(viewer), 0);
    assert_eq!(engine.scheduled_count(), 0);
    assert!(engine.display().calls.lock().unwrap().is_empty());
}

#[test]
fn test_show_disable_update_renders_nothing() {
    let (engine, presence) = make_engine();
    let viewer = presence.join("world");
    let mut list = WaypointList::new();
    let home = &make_waypoints(&mut list, &["Home"]).remove(0);

    assert_eq!(engine.show(viewer, home), ShowOutcome::Shown);
    assert_eq!(engine.disable(viewer), 1);
    assert_eq!(engine.update(viewer, id_of(home)), UpdateOutcome::NotShown);
    assert_eq!(engine.tick(), SweepReport::default());

    assert_eq!(
        engine.display().ops_for(viewer, id_of(home)),
        vec![Op::Show, Op::Disable]
    );
}

#[test]
fn test_double_show_schedules_once() {
    let (engine, presence) = make_engine();
    let viewer = presence.join("world");
    let mut list = WaypointList::new();
    let spot = &make_waypoints(&mut list, &["P"]).remove(0);

    assert_eq!(engine.show(viewer, spot), ShowOutcome::Shown);
    assert_eq!(engine.show(viewer, spot), ShowOutcome::AlreadyShown);
    assert_eq!(engine.scheduled_count(), 1);
    assert_eq!(engine.display().count(Op::Show, viewer), 1);

    let report = engine.tick();
    assert_eq!(report.updated, 1);
    assert_eq!(engine.display().count(Op::Update, viewer), 1);
}

#[test]
fn test_disable_leaves_no_sessions_for_viewer() {
    let (engine, presence) = make_engine();
    let viewer = presence.join("world");
    let other = presence.join("world");
    let mut list = WaypointList::new();
    let waypoints = make_waypoints(&mut list, &["A", "B", "C", "D", "E"]);

    for waypoint in &waypoints {
        engine.show(viewer, waypoint);
        engine.show(viewer, waypoint);
    }
    engine.show(other, &waypoints[0]);
    assert_eq!(engine.sessions_for(viewer).len(), 5);

    assert_eq!(engine.disable(viewer), 5);
    assert!(engine.sessions_for(viewer).is_empty());
    assert_eq!(engine.scheduled_count(), 1);
    assert!(engine.is_shown(other, id_of(&waypoints[0])));
    assert_eq!(engine.display().count(Op::Disable, viewer), 5);
}

#[test]
fn test_hide_removes_single_pair() {
    let (engine, presence) = make_engine();
    let viewer = presence.join("world");
    let mut list = WaypointList::new();
    let waypoints = make_waypoints(&mut list, &["A", "B"]);
    engine.show(viewer, &waypoints[0]);
    engine.show(viewer, &waypoints[1]);

    assert_eq!(engine.hide(viewer, id_of(&waypoints[0])), 1);
    assert_eq!(engine.hide(viewer, id_of(&waypoints[0])), 0);
    assert!(!engine.is_shown(viewer, id_of(&waypoints[0])));
    assert!(engine.is_shown(viewer, id_of(&waypoints[1])));
    assert_eq!(engine.tick().updated, 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Vanishing viewers and waypoints
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_show_to_absent_viewer() {
    let (engine, _presence) = make_engine();
    let mut list = WaypointList::new();
    let spot = &make_waypoints(&mut list, &["A"]).remove(0);

    assert_eq!(engine.show(ViewerId::new(), spot), ShowOutcome::ViewerGone);
    assert_eq!(engine.scheduled_count(), 0);
}

#[test]
fn test_viewer_gone_ends_sessions_quietly() {
    let (engine, presence) = make_engine();
    let viewer = presence.join("world");
    let mut list = WaypointList::new();
    let waypoints = make_waypoints(&mut list, &["A", "B"]);
    for waypoint in &waypoints {
        engine.show(viewer, waypoint);
    }

    presence.leave(viewer);
    let report = engine.tick();
    assert_eq!(report.ended, 2);
    assert_eq!(report.failed, 0);
    assert_eq!(engine.scheduled_count(), 0);
    // No render calls to a client that is gone
    assert_eq!(engine.display().count(Op::Update, viewer), 0);
    assert_eq!(engine.display().count(Op::Disable, viewer), 0);
}

#[test]
fn test_deleted_waypoint_ends_session() {
    let (engine, presence) = make_engine();
    let viewer = presence.join("world");
    let mut list = WaypointList::new();
    let waypoints = make_waypoints(&mut list, &["Keep", "Drop"]);
    engine.show(viewer, &waypoints[0]);
    engine.show(viewer, &waypoints[1]);

    let dropped = id_of(&waypoints[1]);
    drop(waypoints);
    list.remove(dropped);

    let report = engine.tick();
    assert_eq!(report.updated, 1);
    assert_eq!(report.ended, 1);
    assert!(!engine.is_shown(viewer, dropped));
    assert_eq!(
        engine.display().ops_for(viewer, dropped),
        vec![Op::Show, Op::Disable]
    );
}

#[test]
fn test_show_weak_after_delete() {
    let (engine, presence) = make_engine();
    let viewer = presence.join("world");
    let mut list = WaypointList::new();
    let shared = make_waypoints(&mut list, &["Gone"]).remove(0);
    let weak = Arc::downgrade(&shared);
    let id = id_of(&shared);
    drop(shared);
    list.remove(id);

    assert_eq!(engine.show_weak(viewer, &weak), ShowOutcome::WaypointGone);
    assert_eq!(engine.scheduled_count(), 0);
}

#[test]
fn test_forget_waypoint_across_viewers() {
    let (engine, presence) = make_engine();
    let a = presence.join("world");
    let b = presence.join("world");
    let mut list = WaypointList::new();
    let waypoints = make_waypoints(&mut list, &["Shared", "Other"]);
    engine.show(a, &waypoints[0]);
    engine.show(b, &waypoints[0]);
    engine.show(b, &waypoints[1]);

    assert_eq!(engine.forget_waypoint(id_of(&waypoints[0])), 2);
    assert_eq!(engine.forget_waypoint(id_of(&waypoints[0])), 0);
    assert_eq!(engine.scheduled_count(), 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Failures
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_render_failure_is_isolated_and_not_retried() {
    let (engine, presence) = make_engine();
    let viewer = presence.join("world");
    let mut list = WaypointList::new();
    let waypoints = make_waypoints(&mut list, &["Fine", "Broken", "AlsoFine"]);
    for waypoint in &waypoints {
        engine.show(viewer, waypoint);
    }
    engine.display().fail_updates_for("Broken");

    let report = engine.tick();
    assert_eq!(
        report,
        SweepReport {
            updated: 2,
            ended: 0,
            failed: 1
        }
    );
    assert!(!engine.is_shown(viewer, id_of(&waypoints[1])));

    let report = engine.tick();
    assert_eq!(report.updated, 2);
    assert_eq!(report.failed, 0);

    // Explicit show retries
    engine.display().failing.lock().unwrap().clear();
    assert_eq!(engine.show(viewer, &waypoints[1]), ShowOutcome::Shown);
}

#[test]
fn test_failed_show_records_nothing() {
    let (engine, presence) = make_engine();
    let viewer = presence.join("world");
    let mut list = WaypointList::new();
    let spot = &make_waypoints(&mut list, &["Refused"]).remove(0);
    engine
        .display()
        .failing_show
        .lock()
        .unwrap()
        .insert("Refused".to_string());

    assert!(matches!(engine.show(viewer, spot), ShowOutcome::Failed(_)));
    assert_eq!(engine.scheduled_count(), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Beacon strategy through the engine
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct BeaconLog {
    placed: Mutex<Vec<BeaconMarker>>,
    removed: Mutex<Vec<BeaconMarker>>,
    refuse_place: AtomicBool,
}

impl BeaconRenderer for BeaconLog {
    fn place(&self, _: ViewerId, marker: &BeaconMarker) -> Result<(), RenderError> {
        if self.refuse_place.load(Ordering::SeqCst) {
            return Err(RenderError::new("place", "client disconnected"));
        }
        self.placed.lock().unwrap().push(marker.clone());
        Ok(())
    }

    fn remove(&self, _: ViewerId, marker: &BeaconMarker) -> Result<(), RenderError> {
        self.removed.lock().unwrap().push(marker.clone());
        Ok(())
    }
}

#[test]
fn test_beacon_recolors_after_config_reload() {
    let presence = Arc::new(FakePresence::default());
    let viewer = presence.join("world");
    let engine = DisplayEngine::new(
        BeaconDisplay::new(BeaconLog::default()),
        Arc::clone(&presence),
        Arc::new(ConfigResolver::default()),
        EngineConfig::default(),
    );
    let mut list = WaypointList::new();
    let spot = &make_waypoints(&mut list, &["Home"]).remove(0);

    engine.show(viewer, spot);
    engine.tick();
    assert_eq!(engine.display().renderer().placed.lock().unwrap().len(), 1);

    let mut raw = WaypointsConfig::default();
    raw.display
        .beacon
        .default_color
        .set(WaypointCategory::Private, BeaconColor::Purple);
    engine.reload_config(raw.resolve().unwrap());
    engine.tick();

    let placed = engine.display().renderer().placed.lock().unwrap().clone();
    assert_eq!(placed.len(), 2);
    assert_eq!(placed[1].color, BeaconColor::Purple);

    // Override wins over the reloaded default
    list.modify(id_of(spot), |w| w.set_beacon_color(Some(BeaconColor::Red)));
    engine.tick();
    assert_eq!(
        engine.display().renderer().placed.lock().unwrap()[2].color,
        BeaconColor::Red
    );

    presence.move_to(viewer, "world_nether");
    engine.tick();
    assert_eq!(engine.display().renderer().removed.lock().unwrap().len(), 1);
    assert_eq!(engine.disable(viewer), 1);
    // Nothing placed in the nether, so nothing more to remove
    assert_eq!(engine.display().renderer().removed.lock().unwrap().len(), 1);
}

#[test]
fn test_failed_beacon_recolor_still_cleans_up() {
    let presence = Arc::new(FakePresence::default());
    let viewer = presence.join("world");
    let engine = DisplayEngine::new(
        BeaconDisplay::new(BeaconLog::default()),
        Arc::clone(&presence),
        Arc::new(ConfigResolver::default()),
        EngineConfig::default(),
    );
    let mut list = WaypointList::new();
    let spot = &make_waypoints(&mut list, &["Home"]).remove(0);
    assert_eq!(engine.show(viewer, spot), ShowOutcome::Shown);

    engine
        .display()
        .renderer()
        .refuse_place
        .store(true, Ordering::SeqCst);
    list.modify(id_of(spot), |w| w.set_beacon_color(Some(BeaconColor::Red)));
    let report = engine.tick();

    assert_eq!(report.failed, 1);
    assert_eq!(engine.scheduled_count(), 0);
    let renderer = engine.display().renderer();
    assert_eq!(renderer.placed.lock().unwrap().len(), 1);
    let removed = renderer.removed.lock().unwrap();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].position, renderer.placed.lock().unwrap()[0].position);
}

// ─────────────────────────────────────────────────────────────────────────────
// Concurrency
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_randomized_show_disable_against_sweep() {
    const WORKERS: usize = 8;
    const ROUNDS: usize = 300;

    let (engine, presence) = make_engine();
    let mut list = WaypointList::new();
    let waypoints = Arc::new(make_waypoints(
        &mut list,
        &["A", "B", "C", "D", "E", "F"],
    ));

    let stop = Arc::new(AtomicBool::new(false));
    let sweeper = {
        let engine = Arc::clone(&engine);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut sweeps = 0usize;
            while !stop.load(Ordering::SeqCst) {
                engine.tick();
                sweeps += 1;
            }
            sweeps
        })
    };

    let workers: Vec<_> = (0..WORKERS)
        .map(|seed| {
            let engine = Arc::clone(&engine);
            let waypoints = Arc::clone(&waypoints);
            let viewer = presence.join("world");
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(seed as u64);
                for _ in 0..ROUNDS {
                    let waypoint = &waypoints[rng.gen_range(0..waypoints.len())];
                    match rng.gen_range(0..4) {
                        0 | 1 => {
                            engine.show(viewer, waypoint);
                        }
                        2 => {
                            engine.hide(viewer, id_of(waypoint));
                        }
                        _ => {
                            engine.disable(viewer);
                            assert!(engine.sessions_for(viewer).is_empty());
                        }
                    }
                }

                engine.disable(viewer);
                let updates = engine.display().count(Op::Update, viewer);
                thread::sleep(Duration::from_millis(20));
                assert_eq!(
                    engine.display().count(Op::Update, viewer),
                    updates,
                    "update reached viewer after disable returned"
                );
                viewer
            })
        })
        .collect();

    let viewers: Vec<ViewerId> = workers.into_iter().map(|h| h.join().unwrap()).collect();
    stop.store(true, Ordering::SeqCst);
    let sweeps = sweeper.join().unwrap();

    assert!(sweeps > 0);
    assert_eq!(engine.scheduled_count(), 0);
    assert_eq!(engine.display().violations.load(Ordering::SeqCst), 0);
    assert!(engine.display().live.lock().unwrap().is_empty());
    for viewer in viewers {
        assert!(engine.sessions_for(viewer).is_empty());
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scheduler
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_zero_interval_rejected() {
    assert!(EngineConfig::new(Duration::ZERO).is_err());
    let settings = EngineConfig::new(Duration::from_millis(5)).unwrap();
    assert_eq!(settings.update_interval(), Duration::from_millis(5));
}

#[tokio::test(start_paused = true)]
async fn test_scheduler_parks_while_table_is_empty() {
    let presence = Arc::new(FakePresence::default());
    let viewer = presence.join("world");
    let engine = Arc::new(DisplayEngine::new(
        FakeDisplay::default(),
        Arc::clone(&presence),
        Arc::new(ConfigResolver::default()),
        EngineConfig::new(Duration::from_millis(50)).unwrap(),
    ));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = spawn_scheduler(Arc::clone(&engine), shutdown_rx);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(engine.sweep_count(), 0);

    let mut list = WaypointList::new();
    let spot = &make_waypoints(&mut list, &["Home"]).remove(0);
    assert_eq!(engine.show(viewer, spot), ShowOutcome::Shown);
    tokio::time::sleep(Duration::from_millis(275)).await;
    let swept = engine.sweep_count();
    assert!(swept >= 4, "expected sweeps while shown, got {swept}");
    assert_eq!(engine.display().count(Op::Update, viewer) as u64, swept);

    // Parks again once the last session is gone
    assert_eq!(engine.disable(viewer), 1);
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(engine.sweep_count(), swept);

    // and wakes on the next show
    assert_eq!(engine.show(viewer, spot), ShowOutcome::Shown);
    tokio::time::sleep(Duration::from_millis(275)).await;
    assert!(engine.sweep_count() > swept);

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_scheduler_sweeps_and_stops() {
    let presence = Arc::new(FakePresence::default());
    let viewer = presence.join("world");
    let engine = Arc::new(DisplayEngine::new(
        FakeDisplay::default(),
        Arc::clone(&presence),
        Arc::new(ConfigResolver::default()),
        EngineConfig::new(Duration::from_millis(5)).unwrap(),
    ));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = spawn_scheduler(Arc::clone(&engine), shutdown_rx);

    // Parked on an empty table until the first show
    tokio::time::sleep(Duration::from_millis(20)).await;
    let mut list = WaypointList::new();
    let spot = &make_waypoints(&mut list, &["Home"]).remove(0);
    assert_eq!(engine.show(viewer, spot), ShowOutcome::Shown);

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(engine.display().count(Op::Update, viewer) > 0);

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap();
}
