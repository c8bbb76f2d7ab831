//! Session table and sweep

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use std::time::Duration;

use hashbrown::HashMap;
use tokio::sync::Notify;

use super::session::{RenderSession, SessionEnd, SessionKey};
use super::viewer::{Viewer, ViewerId, ViewerPresence};
use super::{RenderError, WaypointDisplay};
use crate::config::{ConfigError, ConfigResolver};
use crate::waypoint::{SharedWaypoint, Waypoint, WaypointId, read_waypoint};

/// Construction-time engine settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    update_interval: Duration,
}

impl EngineConfig {
    /// Settings with the given period between sweeps, which must be non-zero
    pub fn new(update_interval: Duration) -> Result<Self, ConfigError> {
        if update_interval.is_zero() {
            return Err(ConfigError::Invalid {
                field: "update_interval",
                reason: "must be greater than zero",
            });
        }
        Ok(Self { update_interval })
    }

    /// A resolver's interval is already validated
    pub fn from_resolver(config: &ConfigResolver) -> Self {
        Self {
            update_interval: config.update_interval(),
        }
    }

    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_resolver(&ConfigResolver::default())
    }
}

/// Result of [`DisplayEngine::show`]
#[derive(Debug, Clone, PartialEq)]
pub enum ShowOutcome {
    Shown,
    /// The pair was already Shown; nothing was rendered or scheduled
    AlreadyShown,
    ViewerGone,
    WaypointGone,
    /// Initial render failed; no session was recorded
    Failed(RenderError),
}

/// Result of a single session refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// No Shown session for the pair; nothing rendered
    NotShown,
    /// The session was ended and removed
    Ended(SessionEnd),
}

/// Counters for one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub updated: usize,
    /// Sessions ended because the viewer or waypoint disappeared
    pub ended: usize,
    /// Sessions force-disabled after a render error
    pub failed: usize,
}

type SessionTable<S> = HashMap<SessionKey, RenderSession<S>>;

/// Owns every render session and refreshes them on each sweep.
///
/// All table access goes through a single mutex. A sweep snapshots the keys
/// and then locks once per session, re-checking that the session still
/// exists before rendering, so a `hide`/`disable` that has returned can
/// never be followed by an update of the pairs it removed.
pub struct DisplayEngine<D: WaypointDisplay, P: ViewerPresence> {
    display: D,
    presence: P,
    settings: EngineConfig,
    config: RwLock<Arc<ConfigResolver>>,
    sessions: Mutex<SessionTable<D::State>>,
    wake: Notify,
    sweeps: AtomicU64,
}

impl<D: WaypointDisplay, P: ViewerPresence> DisplayEngine<D, P> {
    pub fn new(display: D, presence: P, config: Arc<ConfigResolver>, settings: EngineConfig) -> Self {
        Self {
            display,
            presence,
            settings,
            config: RwLock::new(config),
            sessions: Mutex::new(HashMap::new()),
            wake: Notify::new(),
            sweeps: AtomicU64::new(0),
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn update_interval(&self) -> Duration {
        self.settings.update_interval
    }

    /// Current configuration snapshot
    pub fn config(&self) -> Arc<ConfigResolver> {
        Arc::clone(&self.config.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Swap in a reloaded configuration. Takes effect on the next render call.
    pub fn reload_config(&self, config: ConfigResolver) {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(config);
        tracing::info!("Display configuration reloaded");
    }

    fn lock_sessions(&self) -> MutexGuard<'_, SessionTable<D::State>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn wake(&self) -> &Notify {
        &self.wake
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Hidden → Shown. Idempotent: an already Shown pair is left untouched.
    pub fn show(&self, viewer: ViewerId, waypoint: &SharedWaypoint) -> ShowOutcome {
        let key = SessionKey::new(viewer, read_waypoint(waypoint).id());

        // Lock order is table, then waypoint; the sweep takes them the same way.
        let mut sessions = self.lock_sessions();
        if sessions.contains_key(&key) {
            return ShowOutcome::AlreadyShown;
        }

        let Some(location) = self.presence.locate(viewer) else {
            tracing::debug!(%viewer, waypoint = %key.waypoint, "Show skipped, viewer gone");
            return ShowOutcome::ViewerGone;
        };
        let viewer = Viewer { id: viewer, location };

        let config = self.config();
        let result = {
            let current = read_waypoint(waypoint);
            self.display.show(&viewer, &current, &config)
        };

        match result {
            Ok(state) => {
                sessions.insert(key, RenderSession::new(waypoint, state));
                drop(sessions);
                self.wake.notify_one();
                tracing::debug!(
                    viewer = %key.viewer,
                    waypoint = %key.waypoint,
                    display = self.display.name(),
                    "Waypoint shown"
                );
                ShowOutcome::Shown
            }
            Err(e) => {
                tracing::warn!(
                    viewer = %key.viewer,
                    waypoint = %key.waypoint,
                    error = %e,
                    "Initial render failed"
                );
                ShowOutcome::Failed(e)
            }
        }
    }

    /// Show through a weak handle, e.g. one kept by a menu after the
    /// owning list may have dropped the waypoint
    pub fn show_weak(&self, viewer: ViewerId, waypoint: &Weak<RwLock<Waypoint>>) -> ShowOutcome {
        match waypoint.upgrade() {
            Some(waypoint) => self.show(viewer, &waypoint),
            None => ShowOutcome::WaypointGone,
        }
    }

    /// Refresh one Shown session.
    ///
    /// Normally driven by [`Self::tick`]. Absent sessions are ignored, so a
    /// pair removed by `hide`/`disable` is never rendered again.
    pub fn update(&self, viewer: ViewerId, waypoint: WaypointId) -> UpdateOutcome {
        let key = SessionKey::new(viewer, waypoint);
        let mut sessions = self.lock_sessions();
        let Some(shared) = sessions.get(&key).map(|session| session.waypoint.upgrade()) else {
            return UpdateOutcome::NotShown;
        };

        let Some(location) = self.presence.locate(viewer) else {
            // Nothing to clean up on a client that is gone
            sessions.remove(&key);
            tracing::debug!(%viewer, %waypoint, "Viewer gone, session disabled");
            return UpdateOutcome::Ended(SessionEnd::ViewerGone);
        };

        let Some(shared) = shared else {
            if let Some(session) = sessions.remove(&key) {
                self.teardown(key, session.state);
            }
            tracing::debug!(%viewer, %waypoint, "Waypoint deleted, session disabled");
            return UpdateOutcome::Ended(SessionEnd::WaypointGone);
        };

        let Some(session) = sessions.get_mut(&key) else {
            return UpdateOutcome::NotShown;
        };
        let viewer_now = Viewer { id: viewer, location };
        let config = self.config();
        let result = {
            let current = read_waypoint(&shared);
            self.display.update(&viewer_now, &current, &config, &mut session.state)
        };

        match result {
            Ok(()) => UpdateOutcome::Updated,
            Err(e) => {
                tracing::warn!(
                    %viewer,
                    %waypoint,
                    display = self.display.name(),
                    error = %e,
                    "Render failed, session force-disabled"
                );
                if let Some(session) = sessions.remove(&key) {
                    self.teardown(key, session.state);
                }
                UpdateOutcome::Ended(SessionEnd::RenderFailed)
            }
        }
    }

    /// Shown → Disabled for one pair. Returns the number of sessions removed.
    pub fn hide(&self, viewer: ViewerId, waypoint: WaypointId) -> usize {
        let key = SessionKey::new(viewer, waypoint);
        let mut sessions = self.lock_sessions();
        match sessions.remove(&key) {
            Some(session) => {
                self.teardown(key, session.state);
                1
            }
            None => 0,
        }
    }

    /// Disable every session of a viewer. Safe on viewers with no sessions.
    pub fn disable(&self, viewer: ViewerId) -> usize {
        self.remove_where(|key| key.viewer == viewer)
    }

    /// Disable every session showing a deleted waypoint
    pub fn forget_waypoint(&self, waypoint: WaypointId) -> usize {
        self.remove_where(|key| key.waypoint == waypoint)
    }

    fn remove_where(&self, mut pred: impl FnMut(&SessionKey) -> bool) -> usize {
        let mut sessions = self.lock_sessions();
        let removed: Vec<_> = sessions.extract_if(|key, _| pred(key)).collect();
        let count = removed.len();
        // Teardown under the lock so a concurrent show of the same pair
        // cannot interleave with the cleanup.
        for (key, session) in removed {
            self.teardown(key, session.state);
        }
        if count > 0 {
            tracing::debug!(count, remaining = sessions.len(), "Sessions disabled");
        }
        count
    }

    fn teardown(&self, key: SessionKey, state: D::State) {
        if let Err(e) = self.display.disable(key.viewer, state) {
            tracing::warn!(
                viewer = %key.viewer,
                waypoint = %key.waypoint,
                error = %e,
                "Cleanup failed while disabling session"
            );
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sweep
    // ─────────────────────────────────────────────────────────────────────────

    /// One refresh pass over every session Shown at the start of the pass.
    ///
    /// A failing session is ended and the sweep continues with the rest.
    pub fn tick(&self) -> SweepReport {
        self.sweeps.fetch_add(1, Ordering::Relaxed);
        let keys: Vec<SessionKey> = self.lock_sessions().keys().copied().collect();
        let mut report = SweepReport::default();

        for key in keys {
            match self.update(key.viewer, key.waypoint) {
                UpdateOutcome::Updated => report.updated += 1,
                UpdateOutcome::NotShown => {}
                UpdateOutcome::Ended(SessionEnd::RenderFailed) => report.failed += 1,
                UpdateOutcome::Ended(_) => report.ended += 1,
            }
        }

        if report.ended > 0 || report.failed > 0 {
            tracing::debug!(
                updated = report.updated,
                ended = report.ended,
                failed = report.failed,
                "Sweep finished"
            );
        }
        report
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Sweeps run since the engine was created
    pub fn sweep_count(&self) -> u64 {
        self.sweeps.load(Ordering::Relaxed)
    }

    /// Number of sessions the sweep will refresh
    pub fn scheduled_count(&self) -> usize {
        self.lock_sessions().len()
    }

    pub fn is_shown(&self, viewer: ViewerId, waypoint: WaypointId) -> bool {
        self.lock_sessions()
            .contains_key(&SessionKey::new(viewer, waypoint))
    }

    /// Waypoints currently Shown to a viewer
    pub fn sessions_for(&self, viewer: ViewerId) -> Vec<WaypointId> {
        self.lock_sessions()
            .keys()
            .filter(|key| key.viewer == viewer)
            .map(|key| key.waypoint)
            .collect()
    }
}
