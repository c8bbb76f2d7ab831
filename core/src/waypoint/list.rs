//! Per-user waypoint container
//!
//! The list is the sole owner of its waypoints. Anything else (render
//! sessions in particular) holds a `Weak` and must cope with the waypoint
//! disappearing once the list drops it.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use hashbrown::HashSet;

use super::{Waypoint, WaypointError, WaypointId};
use crate::tag::{CompoundTag, Tag};

pub type SharedWaypoint = Arc<RwLock<Waypoint>>;

/// Read a shared waypoint. A poisoned lock still holds a fully written
/// waypoint (all mutations are single assignments), so the guard is reused.
pub fn read_waypoint(waypoint: &RwLock<Waypoint>) -> RwLockReadGuard<'_, Waypoint> {
    waypoint.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_waypoint(waypoint: &RwLock<Waypoint>) -> RwLockWriteGuard<'_, Waypoint> {
    waypoint.write().unwrap_or_else(PoisonError::into_inner)
}

/// A tag from a load batch that could not be turned into a waypoint
#[derive(Debug, Clone, PartialEq)]
pub struct LoadFailure {
    /// Position of the tag in the batch
    pub index: usize,
    pub error: WaypointError,
}

#[derive(Debug, Default)]
pub struct WaypointList {
    waypoints: Vec<SharedWaypoint>,
}

impl WaypointList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a batch of tags. Malformed entries are logged, reported and
    /// skipped; the rest of the batch still loads.
    pub fn from_tags<'a>(tags: impl IntoIterator<Item = &'a CompoundTag>) -> (Self, Vec<LoadFailure>) {
        let mut list = Self::new();
        let mut failures = Vec::new();
        let mut seen: HashSet<WaypointId> = HashSet::new();

        for (index, tag) in tags.into_iter().enumerate() {
            let result = Waypoint::from_tag(tag).and_then(|waypoint| {
                if seen.insert(waypoint.id()) {
                    Ok(waypoint)
                } else {
                    Err(WaypointError::DuplicateId(waypoint.id()))
                }
            });

            match result {
                Ok(waypoint) => {
                    list.waypoints.push(Arc::new(RwLock::new(waypoint)));
                }
                Err(error) => {
                    tracing::warn!(index, error = %error, "Skipping malformed waypoint");
                    failures.push(LoadFailure { index, error });
                }
            }
        }

        tracing::debug!(
            loaded = list.len(),
            skipped = failures.len(),
            "Loaded waypoint list"
        );
        (list, failures)
    }

    /// Load from a list tag of compounds. Non-compound entries count as
    /// malformed.
    pub fn from_list_tag(tag: &Tag) -> Result<(Self, Vec<LoadFailure>), WaypointError> {
        let items = tag.as_list().ok_or(WaypointError::WrongType {
            field: "waypoints",
            expected: "list",
            found: tag.type_name(),
        })?;

        let mut compounds = Vec::with_capacity(items.len());
        let mut failures = Vec::new();
        for (index, item) in items.iter().enumerate() {
            match item.as_compound() {
                Some(compound) => compounds.push((index, compound)),
                None => failures.push(LoadFailure {
                    index,
                    error: WaypointError::WrongType {
                        field: "waypoints[]",
                        expected: "compound",
                        found: item.type_name(),
                    },
                }),
            }
        }

        let (list, nested) = Self::from_tags(compounds.iter().map(|(_, c)| *c));
        // Map batch positions back to positions in the original list
        failures.extend(nested.into_iter().map(|failure| LoadFailure {
            index: compounds[failure.index].0,
            error: failure.error,
        }));
        failures.sort_by_key(|failure| failure.index);
        Ok((list, failures))
    }

    pub fn to_tags(&self) -> Vec<CompoundTag> {
        self.waypoints
            .iter()
            .map(|waypoint| read_waypoint(waypoint).to_tag())
            .collect()
    }

    pub fn to_list_tag(&self) -> Tag {
        Tag::List(self.to_tags().into_iter().map(Tag::Compound).collect())
    }

    /// Take ownership of a waypoint. Returns the shared handle.
    pub fn add(&mut self, waypoint: Waypoint) -> Result<SharedWaypoint, WaypointError> {
        if self.get(waypoint.id()).is_some() {
            return Err(WaypointError::DuplicateId(waypoint.id()));
        }
        let shared = Arc::new(RwLock::new(waypoint));
        self.waypoints.push(Arc::clone(&shared));
        Ok(shared)
    }

    pub fn get(&self, id: WaypointId) -> Option<SharedWaypoint> {
        self.waypoints
            .iter()
            .find(|waypoint| read_waypoint(waypoint).id() == id)
            .cloned()
    }

    /// Case-insensitive name lookup
    pub fn find_by_name(&self, name: &str) -> Option<SharedWaypoint> {
        self.waypoints
            .iter()
            .find(|waypoint| read_waypoint(waypoint).name().eq_ignore_ascii_case(name))
            .cloned()
    }

    /// Apply a mutation to one waypoint
    pub fn modify<R>(
        &self,
        id: WaypointId,
        f: impl FnOnce(&mut Waypoint) -> R,
    ) -> Option<R> {
        let shared = self.get(id)?;
        let mut guard = write_waypoint(&shared);
        Some(f(&mut guard))
    }

    /// Delete a waypoint. Once the returned handle (if kept) is dropped,
    /// nothing references it any more.
    pub fn remove(&mut self, id: WaypointId) -> Option<SharedWaypoint> {
        let pos = self
            .waypoints
            .iter()
            .position(|waypoint| read_waypoint(waypoint).id() == id)?;
        Some(self.waypoints.remove(pos))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SharedWaypoint> {
        self.waypoints.iter()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}
