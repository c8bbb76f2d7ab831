//! Per-(viewer, waypoint) render session records

use std::fmt;
use std::sync::{Arc, RwLock, Weak};

use super::viewer::ViewerId;
use crate::waypoint::{SharedWaypoint, Waypoint, WaypointId};

/// Key of the session table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub viewer: ViewerId,
    pub waypoint: WaypointId,
}

impl SessionKey {
    pub fn new(viewer: ViewerId, waypoint: WaypointId) -> Self {
        Self { viewer, waypoint }
    }
}

/// A Shown session. Hidden and Disabled pairs have no record.
pub(crate) struct RenderSession<S> {
    /// The owning list may drop the waypoint at any time
    pub waypoint: Weak<RwLock<Waypoint>>,
    pub state: S,
}

impl<S> RenderSession<S> {
    pub fn new(waypoint: &SharedWaypoint, state: S) -> Self {
        Self {
            waypoint: Arc::downgrade(waypoint),
            state,
        }
    }
}

/// Why the engine ended a session on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Viewer disconnected or no longer valid
    ViewerGone,
    /// Waypoint was deleted by its owner
    WaypointGone,
    /// Rendering backend failed; the session was force-disabled
    RenderFailed,
}

impl fmt::Display for SessionEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionEnd::ViewerGone => "viewer gone",
            SessionEnd::WaypointGone => "waypoint gone",
            SessionEnd::RenderFailed => "render failed",
        };
        f.write_str(s)
    }
}
