use std::fmt;

use serde::{Deserialize, Serialize};

/// World-space position of a waypoint or viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// World / dimension identifier
    pub world: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Integral block coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Location {
    pub fn new(world: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
        }
    }

    /// Block containing this location
    pub fn block(&self) -> BlockPos {
        BlockPos {
            x: self.x.floor() as i64,
            y: self.y.floor() as i64,
            z: self.z.floor() as i64,
        }
    }

    pub fn same_world(&self, other: &Location) -> bool {
        self.world == other.world
    }

    /// Euclidean distance, `None` across worlds
    pub fn distance(&self, other: &Location) -> Option<f64> {
        if !self.same_world(other) {
            return None;
        }
        let (dx, dy, dz) = (other.x - self.x, other.y - self.y, other.z - self.z);
        Some((dx * dx + dy * dy + dz * dz).sqrt())
    }

    /// First coordinate that is NaN or infinite, by field name
    pub fn non_finite_axis(&self) -> Option<&'static str> {
        [("x", self.x), ("y", self.y), ("z", self.z)]
            .into_iter()
            .find(|(_, n)| !n.is_finite())
            .map(|(axis, _)| axis)
    }
}

impl BlockPos {
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    pub fn offset(self, dx: i64, dy: i64, dz: i64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1}, {:.1}, {:.1})", self.world, self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_floors_negative() {
        let loc = Location::new("world", -0.5, 64.9, 10.0);
        assert_eq!(loc.block(), BlockPos::new(-1, 64, 10));
    }

    #[test]
    fn test_distance_across_worlds() {
        let a = Location::new("world", 0.0, 0.0, 0.0);
        let b = Location::new("world", 3.0, 0.0, 4.0);
        let c = Location::new("world_nether", 3.0, 0.0, 4.0);
        assert_eq!(a.distance(&b), Some(5.0));
        assert_eq!(a.distance(&c), None);
    }

    #[test]
    fn test_non_finite_axis() {
        assert_eq!(Location::new("world", 1.0, 2.0, 3.0).non_finite_axis(), None);
        assert_eq!(Location::new("world", 1.0, f64::NAN, f64::INFINITY).non_finite_axis(), Some("y"));
    }
}
