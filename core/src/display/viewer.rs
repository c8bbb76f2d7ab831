//! Viewer identity and presence lookup

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::waypoint::Location;

/// Identity of a connected player receiving indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewerId(Uuid);

impl ViewerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ViewerId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ViewerId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A present viewer at the moment of a render call
#[derive(Debug, Clone, PartialEq)]
pub struct Viewer {
    pub id: ViewerId,
    pub location: Location,
}

/// Host-side lookup of whether a viewer is still connected.
///
/// `None` means the handle is no longer valid; the engine then ends every
/// session for that viewer without treating it as a failure.
pub trait ViewerPresence: Send + Sync {
    fn locate(&self, viewer: ViewerId) -> Option<Location>;
}

impl<T: ViewerPresence + ?Sized> ViewerPresence for Arc<T> {
    fn locate(&self, viewer: ViewerId) -> Option<Location> {
        (**self).locate(viewer)
    }
}
